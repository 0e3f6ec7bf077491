//! 結果表のExcel生成（共通ライブラリ）
//!
//! ResultRecord の一覧を1シートのxlsxとしてバッファに書き出す。

use crate::error::{Error, Result};
use crate::types::ResultRecord;
use rust_xlsxwriter::*;

/// Excelのセルに格納できる最大文字数
const MAX_CELL_CHARS: usize = 32_767;

const SHEET_NAME: &str = "Descriptions";

/// 列幅（Source, Object ID, Images, Description）
const COLUMN_WIDTHS: [f64; 4] = [28.0, 18.0, 40.0, 100.0];

/// 結果表をバッファに生成
pub fn generate_results_buffer(results: &[ResultRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_align(FormatAlign::Top)
        .set_text_wrap();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| Error::Excel(format!("sheet name: {}", e)))?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width)
            .map_err(|e| Error::Excel(format!("column width: {}", e)))?;
    }

    for (col, header) in ResultRecord::HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| Error::Excel(format!("header: {}", e)))?;
    }
    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| Error::Excel(format!("freeze panes: {}", e)))?;

    for (i, record) in results.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in record.cells().iter().enumerate() {
            worksheet
                .write_string_with_format(row, col as u16, clamp_cell(value), &value_format)
                .map_err(|e| Error::Excel(format!("row {}: {}", row, e)))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| Error::Excel(format!("save: {}", e)))
}

/// セル上限を超える文字列を切り詰める
fn clamp_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => &value[..cut],
        None => value,
    }
}
