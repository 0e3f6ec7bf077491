//! Excel出力（CLI版）
//!
//! 共通ライブラリで生成したバッファをファイルに書き出す。

use crate::error::Result;
use museum_catalog_common::export::excel_core::generate_results_buffer;
use museum_catalog_common::ResultRecord;
use std::path::Path;

pub fn generate_excel(results: &[ResultRecord], output_path: &Path) -> Result<()> {
    let buffer = generate_results_buffer(results)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;
    Ok(())
}
