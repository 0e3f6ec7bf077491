//! スプレッドシート読み込み
//!
//! 先頭シートの1行目をヘッダーとして読み、列名を正規化（前後空白除去・小文字化）した表にする。
//! セル値は文字列として保持し、空セル・エラーセルは `None`。

use crate::error::{CatalogError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::Timelike;
use museum_catalog_common::types::RowRange;
use std::path::Path;

/// 1行分のセル値
pub type SheetRow = Vec<Option<String>>;

#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    columns: Vec<String>,
    rows: Vec<SheetRow>,
}

impl SheetTable {
    /// ヘッダーとデータ行から表を作る（列名はここで正規化）
    pub fn new<S: AsRef<str>>(headers: &[S], rows: Vec<SheetRow>) -> Self {
        Self {
            columns: headers.iter().map(|h| normalize_column(h.as_ref())).collect(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 正規化済みの列名で列番号を引く（重複時は先頭）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = normalize_column(name);
        self.columns.iter().position(|c| *c == name)
    }

    /// 行の中の指定列の値
    pub fn value<'a>(&self, row: &'a SheetRow, column: &str) -> Option<&'a str> {
        let index = self.column_index(column)?;
        row.get(index).and_then(|v| v.as_deref())
    }

    /// データ行を範囲（1始まり・両端含む）に絞る
    pub fn slice_rows(mut self, range: RowRange) -> Self {
        let indices = range.to_index_range(self.rows.len());
        let kept: Vec<SheetRow> = self.rows.drain(indices).collect();
        self.rows = kept;
        self
    }
}

/// 列名の正規化（前後空白除去＋小文字化）
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

/// スプレッドシート（xls/xlsx/ods）の先頭シートを読み込む
pub fn read_sheet(path: &Path) -> Result<SheetTable> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CatalogError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CatalogError::Spreadsheet(format!("{}: no worksheet", path.display())))?
        .map_err(|e| CatalogError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(SheetTable::default());
    };

    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| cell_text(cell).unwrap_or_else(|| format!("unnamed: {}", i)))
        .collect();

    let data_rows: Vec<SheetRow> = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(SheetTable::new(&headers, data_rows))
}

/// セル値を文字列に変換（空セル・エラーセルは None）
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(format_float(*f)),
        Data::Bool(b) => Some(if *b { "True".into() } else { "False".into() }),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.time().num_seconds_from_midnight() == 0 => {
                Some(value.format("%Y-%m-%d").to_string())
            }
            Some(value) => Some(value.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Some(format_float(dt.as_f64())),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

/// 整数値の浮動小数は小数点なしで表記（年や番号が "1954.0" にならないように）
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use museum_catalog_common::{normalize_value, MISSING};

    fn row(values: &[Option<&str>]) -> SheetRow {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_columns_normalized() {
        let table = SheetTable::new(&[" T1 ", "t10", "T2"], vec![]);
        assert_eq!(table.columns(), &["t1", "t10", "t2"]);
        assert_eq!(table.column_index("t1"), Some(0));
        assert_eq!(table.column_index(" T10"), Some(1));
        assert_eq!(table.column_index("t14"), None);
    }

    #[test]
    fn test_value_lookup() {
        let table = SheetTable::new(&["T1", "T10"], vec![row(&[Some("AK/1"), None])]);
        let r = &table.rows()[0];
        assert_eq!(table.value(r, "t1"), Some("AK/1"));
        assert_eq!(table.value(r, "t10"), None);
        assert_eq!(table.value(r, "t2"), None);
    }

    #[test]
    fn test_value_short_row() {
        let table = SheetTable::new(&["t1", "t10"], vec![row(&[Some("AK/1")])]);
        assert_eq!(table.value(&table.rows()[0], "t10"), None);
    }

    #[test]
    fn test_slice_rows() {
        let rows = (1..=10).map(|i| row(&[Some(i.to_string().as_str())])).collect();
        let table = SheetTable::new(&["t1"], rows).slice_rows(RowRange::new(3, 5).unwrap());
        let ids: Vec<&str> = table.rows().iter().map(|r| r[0].as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["3", "4", "5"]);
    }

    #[test]
    fn test_slice_rows_beyond_end() {
        let rows = (1..=3).map(|i| row(&[Some(i.to_string().as_str())])).collect();
        let table = SheetTable::new(&["t1"], rows).slice_rows(RowRange::new(3, 50).unwrap());
        assert_eq!(table.len(), 1);
        let table = table.slice_rows(RowRange::new(5, 6).unwrap());
        assert!(table.is_empty());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("Telefon".into())).as_deref(), Some("Telefon"));
        assert_eq!(cell_text(&Data::Int(7)).as_deref(), Some("7"));
        assert_eq!(cell_text(&Data::Float(1954.0)).as_deref(), Some("1954"));
        assert_eq!(cell_text(&Data::Float(12.5)).as_deref(), Some("12.5"));
        assert_eq!(cell_text(&Data::Bool(true)).as_deref(), Some("True"));
        assert_eq!(cell_text(&Data::Error(CellErrorType::NA)), None);
    }

    #[test]
    fn test_error_cell_normalizes_to_missing() {
        let table = SheetTable::new(&["t1", "t14"], vec![vec![
            Some("AK/2019-001".into()),
            cell_text(&Data::Error(CellErrorType::Div0)),
        ]]);
        let row = &table.rows()[0];
        assert_eq!(normalize_value(table.value(row, "t14")), MISSING);
    }

    #[test]
    fn test_read_sheet_missing_file() {
        let err = read_sheet(Path::new("/nonexistent/liste.xlsx")).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound(_)));
    }
}
