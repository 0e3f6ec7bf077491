use anyhow::Context;
use clap::Parser;
use museum_catalog::batch::{self, BatchOptions};
use museum_catalog::generator::GenerationClient;
use museum_catalog::pacing::TokioSleeper;
use museum_catalog::{cli, config, export, scanner};
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            jobs,
            images,
            output,
            max_objects,
            max_images,
            max_tokens,
            api_wait,
            model,
            no_progress,
        } => {
            println!("🏛 museum-catalog - 目録テキスト生成\n");

            let mut config = Config::load()?;
            if let Some(n) = max_objects {
                config.max_objects = n;
            }
            if let Some(n) = max_images {
                config.max_images = n;
            }
            if let Some(n) = max_tokens {
                config.max_tokens = n;
            }
            if let Some(secs) = api_wait {
                config.api_wait_seconds = secs;
            }
            if let Some(model) = model {
                config.model = model;
            }

            // APIキーが無ければ何も処理しない
            let api_key = config.get_api_key()?;
            let client = GenerationClient::from_config(&config, api_key)?;

            let mut options = BatchOptions::from_config(&config);
            options.show_progress = !no_progress;

            // 1. 生成
            println!("[1/2] テキスト生成中...（{}件のスプレッドシート）", jobs.len());
            let results = batch::run_jobs(&jobs, &images, &options, &client, &TokioSleeper).await?;
            let error_count = results.iter().filter(|r| r.is_error()).count();
            println!("✔ {}件を処理\n", results.len());

            // 2. 保存
            println!("[2/2] 結果を保存中...");
            let output_path = export::export_results(&results, &output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("✔ 結果を保存: {}", output_path.display());

            if error_count > 0 {
                println!("\n⚠ {}件 / エラー {}件", results.len(), error_count);
            } else {
                println!("\n✅ 完了（{}件）", results.len());
            }
        }

        Commands::Locate {
            object_id,
            images,
            max_images,
        } => {
            // 画像検索は設定が壊れていても既定値で続ける
            let max_images = max_images.unwrap_or_else(|| Config::load_or_default().max_images);
            let search = scanner::search_images(&images, &object_id, max_images)?;

            match &search.folder {
                Some(folder) => println!("フォルダ: {}", folder.display()),
                None => println!("オブジェクトIDに年が見つかりません: {}", object_id),
            }
            if !search.prefix.is_empty() {
                println!("接頭辞: {}", search.prefix);
            }
            println!("検出: {}件 / 使用: {}件", search.total_matches, search.paths.len());
            for name in search.file_names() {
                println!("  🖼 {}", name);
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = Config::load()?;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.endpoint);
                println!("  最大画像数: {}", config.max_images);
                println!("  最大トークン数: {}", config.max_tokens);
                println!("  最大オブジェクト数: {}", config.max_objects);
                println!("  待機秒数: {}", config.api_wait_seconds);
                println!("  試行回数: {}（待機 {}秒 × 試行回数）", config.max_attempts, config.backoff_seconds);
                println!(
                    "  APIキー: {}",
                    if config.get_api_key().is_ok() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let mut clog = colog::default_builder();
    clog.filter(None, level);
    clog.init();
}
