//! 画像検索モジュール
//!
//! `<base>/<年>/<接頭辞>*.{jpg,jpeg,png}` の配置から、オブジェクトIDに対応する画像を探す。

use crate::error::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// 1オブジェクト分の検索結果
#[derive(Debug, Clone, Default)]
pub struct ImageSearch {
    /// 検索した年フォルダ（年が取れなかった場合は None）
    pub folder: Option<PathBuf>,
    pub prefix: String,
    /// 接頭辞に一致した画像の総数（上限適用前）
    pub total_matches: usize,
    /// 使用する画像（ファイル名順、上限適用後）
    pub paths: Vec<PathBuf>,
}

impl ImageSearch {
    pub fn file_names(&self) -> Vec<String> {
        self.paths.iter().map(|p| file_name_of(p)).collect()
    }
}

/// オブジェクトIDから年（4桁の区切り要素）を取り出す
///
/// `/`、`-`、空白で区切った要素のうち、最初に現れる4桁の数字列。
pub fn year_segment(object_id: &str) -> Option<&str> {
    lazy_static::lazy_static! {
        static ref SEGMENT_SEPARATOR: Regex = Regex::new(r"[/\-\s]+").unwrap();
    }

    SEGMENT_SEPARATOR
        .split(object_id)
        .find(|s| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()))
}

/// ファイル名の接頭辞（`/` → `-`、最初の空白まで）
pub fn image_prefix(object_id: &str) -> Option<String> {
    object_id
        .replace('/', "-")
        .split_whitespace()
        .next()
        .map(str::to_string)
}

/// オブジェクトIDに対応する画像を検索
///
/// 年が取れない、または年フォルダが無い場合は空の結果（エラーではない）。
pub fn search_images(base_folder: &Path, object_id: &str, max_images: usize) -> Result<ImageSearch> {
    let Some(year) = year_segment(object_id) else {
        log::warn!("⚠ オブジェクトIDに年が見つかりません: {}", object_id);
        return Ok(ImageSearch::default());
    };

    let folder = base_folder.join(year);
    if !folder.is_dir() {
        log::warn!("⚠ フォルダが見つかりません: {}", folder.display());
        return Ok(ImageSearch {
            folder: Some(folder),
            ..Default::default()
        });
    }

    let Some(prefix) = image_prefix(object_id) else {
        return Ok(ImageSearch {
            folder: Some(folder),
            ..Default::default()
        });
    };

    let mut matches = Vec::new();
    for entry in WalkDir::new(&folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();

        if !path.is_file() || !is_image_file(path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(&prefix) {
            matches.push(name.to_string());
        }
    }

    matches.sort();
    let total_matches = matches.len();
    let paths: Vec<PathBuf> = matches
        .iter()
        .take(max_images)
        .map(|name| folder.join(name))
        .collect();

    log::info!(
        "🔎 {} を接頭辞 '{}' で検索 → 検出: {} → 使用: {}",
        folder.display(),
        prefix,
        total_matches,
        paths.len()
    );
    if !paths.is_empty() {
        log::info!("   🖼 {}", matches[..paths.len()].join(", "));
    }

    Ok(ImageSearch {
        folder: Some(folder),
        prefix,
        total_matches,
        paths,
    })
}

/// 使用する画像パスだけを返す
pub fn find_images_for_object(base_folder: &Path, object_id: &str, max_images: usize) -> Result<Vec<PathBuf>> {
    Ok(search_images(base_folder, object_id, max_images)?.paths)
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}
