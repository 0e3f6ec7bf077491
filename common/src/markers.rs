//! 出力表に埋め込むエラーマーカー
//!
//! 失敗はすべて説明欄の文字列として記録される。呼び出し側は `is_error_text` で判定する。

use std::fmt::Display;

/// エラーマーカーの共通接頭辞
pub const ERROR_PREFIX: &str = "Error: ";

/// 画像が見つからなかった
pub const NO_IMAGE: &str = "Error: No valid image found";

/// レート制限で再試行を使い切った
pub const ABORTED: &str = "Error: Aborted after too many failed attempts";

/// 429以外のHTTPエラー
pub fn api_error(detail: impl Display) -> String {
    format!("{}API error: {}", ERROR_PREFIX, detail)
}

/// 通信エラー（接続失敗・タイムアウト等）
pub fn connection_error(detail: impl Display) -> String {
    format!("{}Connection error: {}", ERROR_PREFIX, detail)
}

/// オブジェクト処理中の想定外エラー
pub fn processing_error(detail: impl Display) -> String {
    format!("{}Processing error: {}", ERROR_PREFIX, detail)
}

pub fn is_error_text(text: &str) -> bool {
    text.starts_with(ERROR_PREFIX)
}
