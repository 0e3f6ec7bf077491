//! カタログ処理の型定義
//!
//! - ObjectRecord: 1オブジェクト分の正規化済みメタデータ
//! - ResultRecord: 出力表の1行
//! - RowRange: 処理対象行（1始まり・両端含む）

use crate::error::{Error, Result};
use crate::markers;
use crate::normalize::{normalize_value, MISSING};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// 入力スプレッドシートの列コード（正規化後の小文字名）
pub mod columns {
    /// オブジェクトID（グルーピングキー）
    pub const OBJECT_ID: &str = "t1";
    pub const MANUFACTURER: &str = "t2";
    pub const MATERIAL: &str = "t3";
    pub const DIMENSIONS: &str = "t5";
    pub const TITLE: &str = "t10";
    pub const YEAR: &str = "t14";
}

/// 1オブジェクト分のメタデータ（全フィールド正規化済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub object_id: String,
    pub title: String,
    pub manufacturer: String,
    pub material: String,
    pub dimensions: String,
    pub year: String,
}

impl ObjectRecord {
    /// 列コードから値を引くクロージャでレコードを構築
    ///
    /// 列が存在しない場合は `None` を返せばよい（欠損扱い）。
    pub fn from_fields<'a, F>(object_id: &str, mut field: F) -> Self
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let object_id = object_id.trim();
        Self {
            object_id: if object_id.is_empty() {
                MISSING.to_string()
            } else {
                object_id.to_string()
            },
            title: normalize_value(field(columns::TITLE)),
            manufacturer: normalize_value(field(columns::MANUFACTURER)),
            material: normalize_value(field(columns::MATERIAL)),
            dimensions: normalize_value(field(columns::DIMENSIONS)),
            year: normalize_value(field(columns::YEAR)),
        }
    }
}

/// 出力表の1行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRecord {
    /// 入力スプレッドシートのファイル名
    pub source: String,
    pub object_id: String,
    /// 使用した画像ファイル名（", " 区切り）
    pub images: String,
    /// 生成テキスト、またはエラーマーカー
    pub description: String,
}

impl ResultRecord {
    /// 出力表のヘッダー
    pub const HEADERS: [&'static str; 4] = ["Source", "Object ID", "Images", "Description"];

    pub fn generated(source: &str, object_id: &str, image_names: &[String], text: String) -> Self {
        Self {
            source: source.to_string(),
            object_id: display_id(object_id),
            images: image_names.join(", "),
            description: text,
        }
    }

    pub fn no_image(source: &str, object_id: &str) -> Self {
        Self {
            source: source.to_string(),
            object_id: display_id(object_id),
            images: String::new(),
            description: markers::NO_IMAGE.to_string(),
        }
    }

    pub fn failed(source: &str, object_id: &str, error: &dyn fmt::Display) -> Self {
        Self {
            source: source.to_string(),
            object_id: display_id(object_id),
            images: String::new(),
            description: markers::processing_error(error),
        }
    }

    /// 説明欄がエラーマーカーかどうか
    pub fn is_error(&self) -> bool {
        markers::is_error_text(&self.description)
    }

    /// ヘッダー順のセル値
    pub fn cells(&self) -> [&str; 4] {
        [&self.source, &self.object_id, &self.images, &self.description]
    }
}

fn display_id(object_id: &str) -> String {
    let trimmed = object_id.trim();
    if trimmed.is_empty() {
        MISSING.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 処理対象行の範囲（データ行の1始まり、両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    start: usize,
    end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start == 0 {
            return Err(Error::Config(format!(
                "row range must start at 1 or later (got {}-{})",
                start, end
            )));
        }
        if end < start {
            return Err(Error::Config(format!(
                "row range end is before start (got {}-{})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// `len` 行のデータに対する0始まりのインデックス範囲（範囲外は切り詰め）
    pub fn to_index_range(&self, len: usize) -> Range<usize> {
        let from = (self.start - 1).min(len);
        let to = self.end.min(len);
        from..to
    }
}

impl FromStr for RowRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| Error::Config(format!("row range must look like START-END: {}", s)))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<usize>()
                .map_err(|_| Error::Config(format!("invalid row number '{}' in {}", v.trim(), s)))
        };
        Self::new(parse(start)?, parse(end)?)
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
