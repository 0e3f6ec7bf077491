use crate::batch::SheetJob;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "museum-catalog")]
#[command(about = "博物館資料の目録テキスト一括生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力（プロンプトの先頭部分も表示）
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スプレッドシートから目録テキストを生成してExcelに出力
    Run {
        /// 処理対象（<スプレッドシート>:<開始行>-<終了行>、行は1始まり・両端含む）
        #[arg(required = true)]
        jobs: Vec<SheetJob>,

        /// 画像フォルダ（<画像フォルダ>/<年>/<ファイル>）
        #[arg(short, long, default_value = "Objektbilder")]
        images: PathBuf,

        /// 出力Excelファイル（デフォルト: object_descriptions.xlsx）
        #[arg(short, long, default_value = "object_descriptions.xlsx")]
        output: PathBuf,

        /// スプレッドシートごとの最大オブジェクト数
        #[arg(long)]
        max_objects: Option<usize>,

        /// オブジェクトごとの最大画像数
        #[arg(long)]
        max_images: Option<usize>,

        /// 生成トークン上限
        #[arg(long)]
        max_tokens: Option<u32>,

        /// 生成ごとの待機秒数
        #[arg(long)]
        api_wait: Option<u64>,

        /// モデル名
        #[arg(long)]
        model: Option<String>,

        /// 進捗バーを表示しない
        #[arg(long)]
        no_progress: bool,
    },

    /// オブジェクトIDに対応する画像を表示
    Locate {
        /// オブジェクトID（例: AK/2019-001）
        #[arg(required = true)]
        object_id: String,

        /// 画像フォルダ
        #[arg(short, long, default_value = "Objektbilder")]
        images: PathBuf,

        /// 最大画像数
        #[arg(long)]
        max_images: Option<usize>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "museum-catalog",
            "run",
            "Liste_AEG Produktsammlung.xls:3585-3650",
            "Liste_AK Kommunikation.xls:308-314",
            "--images",
            "bilder",
            "--max-objects",
            "2",
        ]);

        match cli.command {
            Commands::Run { jobs, images, output, max_objects, max_images, .. } => {
                assert_eq!(jobs.len(), 2);
                assert_eq!(jobs[1].rows.end(), 314);
                assert_eq!(images, PathBuf::from("bilder"));
                assert_eq!(output, PathBuf::from("object_descriptions.xlsx"));
                assert_eq!(max_objects, Some(2));
                assert_eq!(max_images, None);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_invalid_job_rejected() {
        let result = Cli::try_parse_from(["museum-catalog", "run", "Liste.xls"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_locate_verbose() {
        let cli = Cli::parse_from(["museum-catalog", "locate", "AK/2019-001", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Locate { ref object_id, .. } if object_id == "AK/2019-001"));
    }
}
