//! 一括処理
//!
//! スプレッドシート → 行範囲で絞り込み → オブジェクトIDでグルーピング →
//! オブジェクトごとに画像検索・プロンプト生成・テキスト生成 → 結果行を収集。
//!
//! 1オブジェクトの失敗はその行のエラーマーカーになり、処理は次のオブジェクトへ進む。

use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::generator::CatalogGenerator;
use crate::pacing::Sleeper;
use crate::scanner::{file_name_of, find_images_for_object};
use crate::sheet::{read_sheet, SheetRow, SheetTable};
use indicatif::{ProgressBar, ProgressStyle};
use museum_catalog_common::types::{columns, RowRange};
use museum_catalog_common::{
    build_prompt, group_stable, is_missing, normalize_value, prompt_snippet, ObjectRecord,
    ResultRecord,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// ログに出すプロンプトの最大文字数
const PROMPT_LOG_CHARS: usize = 1200;

/// 処理対象: スプレッドシートと行範囲
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetJob {
    pub path: PathBuf,
    pub rows: RowRange,
}

impl FromStr for SheetJob {
    type Err = String;

    /// `<path>:<start>-<end>` 形式（パス中の `:` は許容し、最後の `:` で分割）
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (path, rows) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("Job must look like <spreadsheet>:<start>-<end>: {}", s))?;
        if path.trim().is_empty() {
            return Err(format!("Job is missing the spreadsheet path: {}", s));
        }
        let rows = rows.parse::<RowRange>().map_err(|e| e.to_string())?;
        Ok(Self {
            path: PathBuf::from(path),
            rows,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 1スプレッドシートあたりの最大オブジェクト数
    pub max_objects: usize,
    pub max_images: usize,
    /// 生成1回ごとの待機時間
    pub api_wait: Duration,
    pub show_progress: bool,
}

impl BatchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_objects: config.max_objects,
            max_images: config.max_images,
            api_wait: config.api_wait(),
            show_progress: true,
        }
    }
}

/// 読み込み・絞り込み済みのスプレッドシート
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    /// 出力の Source 列に入るファイル名
    pub source_name: String,
    pub table: SheetTable,
}

/// スプレッドシートを読み込み、行範囲で絞り込み、グルーピング列の存在を確認
pub fn load_job(job: &SheetJob) -> Result<LoadedSheet> {
    let source_name = file_name_of(&job.path);
    let table = read_sheet(&job.path)?.slice_rows(job.rows);
    ensure_grouping_column(&table, &source_name)?;

    log::info!(
        "📄 {} を読み込みました（行 {}、対象 {}行）",
        source_name,
        job.rows,
        table.len()
    );

    Ok(LoadedSheet { source_name, table })
}

fn ensure_grouping_column(table: &SheetTable, source_name: &str) -> Result<()> {
    if table.column_index(columns::OBJECT_ID).is_none() {
        return Err(CatalogError::MissingColumn {
            column: columns::OBJECT_ID.to_string(),
            source_name: source_name.to_string(),
        });
    }
    Ok(())
}

/// 全ジョブを順に処理して結果をまとめる
///
/// 生成を始める前に全スプレッドシートを読み込んで検証する（設定エラーで途中終了しないように）。
pub async fn run_jobs<G, S>(
    jobs: &[SheetJob],
    image_root: &Path,
    options: &BatchOptions,
    generator: &G,
    sleeper: &S,
) -> Result<Vec<ResultRecord>>
where
    G: CatalogGenerator,
    S: Sleeper,
{
    let sheets = jobs.iter().map(load_job).collect::<Result<Vec<_>>>()?;

    let mut results = Vec::new();
    for sheet in &sheets {
        let sheet_results = process_table(
            &sheet.table,
            &sheet.source_name,
            image_root,
            options,
            generator,
            sleeper,
        )
        .await?;
        results.extend(sheet_results);
    }

    Ok(results)
}

/// 1つのスプレッドシートを処理
pub async fn process_workbook<G, S>(
    job: &SheetJob,
    image_root: &Path,
    options: &BatchOptions,
    generator: &G,
    sleeper: &S,
) -> Result<Vec<ResultRecord>>
where
    G: CatalogGenerator,
    S: Sleeper,
{
    let sheet = load_job(job)?;
    process_table(&sheet.table, &sheet.source_name, image_root, options, generator, sleeper).await
}

/// 絞り込み済みの表を処理
pub async fn process_table<G, S>(
    table: &SheetTable,
    source_name: &str,
    image_root: &Path,
    options: &BatchOptions,
    generator: &G,
    sleeper: &S,
) -> Result<Vec<ResultRecord>>
where
    G: CatalogGenerator,
    S: Sleeper,
{
    ensure_grouping_column(table, source_name)?;

    let groups = group_stable(table.rows().iter(), |row| {
        let id = normalize_value(table.value(row, columns::OBJECT_ID));
        (!is_missing(&id)).then_some(id)
    });

    let total = groups.len().min(options.max_objects);
    let truncated = groups.len() > options.max_objects;
    log::info!(
        "📄 {} から最大{}件を処理します（オブジェクト {}件）",
        source_name,
        options.max_objects,
        groups.len()
    );

    let progress = progress_bar(total as u64, source_name, options.show_progress);
    let mut results = Vec::with_capacity(total);

    for (object_id, rows) in groups.into_iter().take(options.max_objects) {
        progress.set_message(object_id.clone());
        log::info!("🔍 オブジェクトID: {}", object_id);

        // グループの先頭行を代表として使う
        let first_row = rows[0];
        match process_object(table, source_name, &object_id, first_row, image_root, options, generator).await {
            Ok(ObjectOutcome::Generated(record)) => {
                log::info!("✅ {} → テキスト生成", object_id);
                results.push(record);
                if !options.api_wait.is_zero() {
                    log::info!("⏳ レート制限回避のため{}秒待機...", options.api_wait.as_secs());
                }
                sleeper.sleep(options.api_wait).await;
            }
            Ok(ObjectOutcome::Skipped(record)) => {
                log::warn!("⚠ {} に有効な画像がありません", object_id);
                results.push(record);
            }
            Err(e) => {
                log::error!("❌ {} の処理に失敗: {}", object_id, e);
                results.push(ResultRecord::failed(source_name, &object_id, &e));
            }
        }

        progress.inc(1);
    }

    if truncated {
        log::info!("⏹ {}件で打ち切りました", options.max_objects);
    }
    progress.finish_and_clear();

    Ok(results)
}

enum ObjectOutcome {
    /// 生成APIを呼び出した（結果がエラーマーカーの場合も含む）
    Generated(ResultRecord),
    /// 画像が無いため生成しなかった
    Skipped(ResultRecord),
}

async fn process_object<G: CatalogGenerator>(
    table: &SheetTable,
    source_name: &str,
    object_id: &str,
    first_row: &SheetRow,
    image_root: &Path,
    options: &BatchOptions,
    generator: &G,
) -> Result<ObjectOutcome> {
    let image_paths = find_images_for_object(image_root, object_id, options.max_images)?;
    if image_paths.is_empty() {
        return Ok(ObjectOutcome::Skipped(ResultRecord::no_image(source_name, object_id)));
    }

    let record = ObjectRecord::from_fields(object_id, |code| table.value(first_row, code));
    let image_names: Vec<String> = image_paths.iter().map(|p| file_name_of(p)).collect();
    let prompt = build_prompt(&record, &image_names);
    log::debug!("📤 プロンプト:\n{}", prompt_snippet(&prompt, PROMPT_LOG_CHARS));

    let text = generator.generate(&image_paths, &prompt).await?;
    Ok(ObjectOutcome::Generated(ResultRecord::generated(
        source_name,
        object_id,
        &image_names,
        text,
    )))
}

fn progress_bar(total: u64, source_name: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(total);
    let style = ProgressStyle::with_template("{prefix} [{bar:30}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    progress.set_style(style);
    progress.set_prefix(source_name.to_string());
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_parse_job() {
        let job: SheetJob = "Liste_AK Kommunikation.xls:308-314".parse().unwrap();
        assert_eq!(job.path, PathBuf::from("Liste_AK Kommunikation.xls"));
        assert_eq!(job.rows, RowRange::new(308, 314).unwrap());
    }

    #[test]
    fn test_parse_job_with_drive_letter() {
        let job: SheetJob = r"C:\Listen\AEG.xls:3585-3650".parse().unwrap();
        assert_eq!(job.path, Path::new(r"C:\Listen\AEG.xls"));
        assert_eq!(job.rows.start(), 3585);
    }

    #[test]
    fn test_parse_job_invalid() {
        assert!("Liste.xls".parse::<SheetJob>().is_err());
        assert!(":1-2".parse::<SheetJob>().is_err());
        assert!("Liste.xls:5-1".parse::<SheetJob>().is_err());
    }

    #[test]
    fn test_missing_grouping_column() {
        let table = SheetTable::new(&["t10"], vec![]);
        let err = ensure_grouping_column(&table, "Liste.xls").unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn { .. }));
        assert!(err.to_string().contains("'t1'"));
    }
}
