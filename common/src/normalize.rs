//! セル値の正規化
//!
//! スプレッドシートのセル値を「値あり」の文字列か、欠損を表す `MISSING` に揃える。

/// 欠損値を表す文字列（プロンプト中でもこの文字列のまま扱う）
pub const MISSING: &str = "Empty Cell";

/// セル値を正規化
///
/// - `None`、空文字、空白のみ、大文字小文字を問わず `"nan"` → `MISSING`
/// - それ以外 → 前後の空白を除去した文字列
pub fn normalize_value(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return MISSING.to_string();
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        MISSING.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 正規化済みの値が欠損かどうか
pub fn is_missing(value: &str) -> bool {
    value == MISSING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_inputs() {
        assert_eq!(normalize_value(None), MISSING);
        assert_eq!(normalize_value(Some("")), MISSING);
        assert_eq!(normalize_value(Some("   \t ")), MISSING);
        assert_eq!(normalize_value(Some("nan")), MISSING);
        assert_eq!(normalize_value(Some("NaN")), MISSING);
        assert_eq!(normalize_value(Some("  NAN ")), MISSING);
    }

    #[test]
    fn test_present_values_are_trimmed() {
        assert_eq!(normalize_value(Some("  Telefon ")), "Telefon");
        assert_eq!(normalize_value(Some("10x20cm")), "10x20cm");
        assert_eq!(normalize_value(Some("Nano")), "Nano");
        assert_eq!(normalize_value(Some("1954")), "1954");
    }

    #[test]
    fn test_idempotent() {
        for raw in [None, Some(""), Some(" nan "), Some(" AEG "), Some("Messing, vernickelt")] {
            let once = normalize_value(raw);
            let twice = normalize_value(Some(&once));
            assert_eq!(once, twice, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(&normalize_value(Some(" "))));
        assert!(!is_missing("Acme"));
    }
}
