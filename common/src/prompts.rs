//! プロンプト生成モジュール
//!
//! - build_list_sentences: 「Angaben laut Liste」/「According to the list」の事実文
//! - build_prompt: 1オブジェクト分の生成指示（テンプレートに値をそのまま埋め込む）
//!
//! 値はエスケープも言い換えもしない。生成側に一覧の値を逐語で転記させるため。

use crate::normalize::{is_missing, MISSING};
use crate::types::ObjectRecord;

/// 事実文の項目（ドイツ語ラベル, 英語ラベル）
const LIST_LABELS: [(&str, &str); 4] = [
    ("Hersteller", "Manufacturer"),
    ("Material", "Material"),
    ("Maße", "Dimensions"),
    ("Jahr", "Year"),
];

/// 事実文を生成（ドイツ語, 英語）
///
/// 製造者・素材・寸法・年の順に、欠損でない項目だけを `"; "` で連結する。
/// 全項目が欠損の場合は空文字列になる（テンプレートにはそのまま入る）。
pub fn build_list_sentences(
    manufacturer: &str,
    material: &str,
    dimensions: &str,
    year: &str,
) -> (String, String) {
    let values = [manufacturer, material, dimensions, year];

    let mut parts_de = Vec::new();
    let mut parts_en = Vec::new();
    for ((label_de, label_en), value) in LIST_LABELS.iter().zip(values) {
        if is_missing(value) {
            continue;
        }
        parts_de.push(format!("{}: {}", label_de, value));
        parts_en.push(format!("{}: {}", label_en, value));
    }

    (parts_de.join("; "), parts_en.join("; "))
}

/// 生成指示プロンプトを構築
///
/// # Arguments
/// * `record` - 正規化済みのオブジェクトメタデータ
/// * `image_names` - 添付する画像のファイル名（パスではなく名前のみ）
pub fn build_prompt(record: &ObjectRecord, image_names: &[String]) -> String {
    let image_list = if image_names.is_empty() {
        MISSING.to_string()
    } else {
        image_names.join(", ")
    };

    let (de_list_sentence, en_list_sentence) = build_list_sentences(
        &record.manufacturer,
        &record.material,
        &record.dimensions,
        &record.year,
    );

    format!(
        r#"
You are a museum cataloguer for the Technisches Museum Berlin.
Describe only what the images justify; be conservative; no speculation.
The input includes metadata from an Excel row.
If any field value equals the literal string "{missing}", treat it as missing/absent. 

Object ID: {object_id} 
Title: {title} 
Image List (local selection): {image_list} 
Manufacturer: {manufacturer} 
Material: {material} 
Dimensions: {dimensions} 
Year: {year} 

Use title to choose the plain object type and function wording in Paragraph 1 if consistent with the images. 
Facts from manufacturer, material, dimensions, year are authoritative list data and must be included in Paragraph 2 as a clearly labeled sentence beginning with „Angaben laut Liste:“ (German) and “According to the list:” (English). 
Copy their values verbatim; do not rephrase. 
Never invent missing values. If a field is absent or equals "{missing}", omit it entirely from that list sentence. 
Do not state date, maker, materials, or dimensions as if they are visibly inscribed. For visible inscriptions, transcribe verbatim in quotes; use […] for illegible parts. 
Ban hedging/guessing: avoid vermutlich, wahrscheinlich, wohl, offenbar, anscheinend, möglicherweise, könnte, dürfte, early/late, typical, domestic, etc. 

OUTPUT (exactly three parts, in this order) 
One sentence (≤35 Wörter) suitable for a label: Objekttyp, Funktion/Zweck, sichtbares Material/Finish, datierungslos. Do not include maker/date/provenance here unless they are visibly inscribed; Excel facts remain only in the “Angaben laut Liste” sentence within the description.

Write 3 short paragraphs in German, then provide an English translation with the same constraints. The German paragraphs should have one title above the first paragraph called "Deutsche Beschreibung". Then provide the EN translation of the title mirroring the placement used for the German title.
Content of the paragraph 1: Name the object type in plain words and its function/purpose (use title if it matches the images). 
Content of the paragraph 2: Strictly image-based description: form and construction (shape, handles, openings, moving parts, connectors); colours/finish; materials only if visually evident; transcribe any visible labels/marks verbatim (use […] for gaps). At the end of Paragraph 2, add ONE sentence with Excel facts using EXACT formatting, but include only the fields that exist (omit any that are "{missing}"): 
Angaben laut Liste: {de_list_sentence}. 
Content of the paragraph 3: Condition notes only (e.g., Kratzer, Korrosion, Abplatzungen, fehlende Teile). No usage scenarios or history. Then provide the EN translation mirroring the structure above. In the English version of Paragraph 2, reproduce the list sentence as: According to the list: {en_list_sentence}.
"#,
        missing = MISSING,
        object_id = record.object_id,
        title = record.title,
        image_list = image_list,
        manufacturer = record.manufacturer,
        material = record.material,
        dimensions = record.dimensions,
        year = record.year,
        de_list_sentence = de_list_sentence,
        en_list_sentence = en_list_sentence,
    )
}

/// ログ用にプロンプトを先頭 `max_chars` 文字で切り詰める
pub fn prompt_snippet(prompt: &str, max_chars: usize) -> String {
    match prompt.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{} ...[truncated]", &prompt[..cut]),
        None => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(manufacturer: &str, material: &str, dimensions: &str, year: &str) -> ObjectRecord {
        ObjectRecord {
            object_id: "AK/2019-001".to_string(),
            title: "Telefon".to_string(),
            manufacturer: manufacturer.to_string(),
            material: material.to_string(),
            dimensions: dimensions.to_string(),
            year: year.to_string(),
        }
    }

    #[test]
    fn test_list_sentences_skip_missing() {
        let (de, en) = build_list_sentences("Acme", MISSING, "10x20cm", MISSING);
        assert_eq!(de, "Hersteller: Acme; Maße: 10x20cm");
        assert_eq!(en, "Manufacturer: Acme; Dimensions: 10x20cm");
    }

    #[test]
    fn test_list_sentences_all_present_in_fixed_order() {
        let (de, en) = build_list_sentences("AEG", "Bakelit", "20 x 15 x 12 cm", "1931");
        assert_eq!(de, "Hersteller: AEG; Material: Bakelit; Maße: 20 x 15 x 12 cm; Jahr: 1931");
        assert_eq!(
            en,
            "Manufacturer: AEG; Material: Bakelit; Dimensions: 20 x 15 x 12 cm; Year: 1931"
        );
    }

    #[test]
    fn test_list_sentences_all_missing() {
        let (de, en) = build_list_sentences(MISSING, MISSING, MISSING, MISSING);
        assert_eq!(de, "");
        assert_eq!(en, "");
    }

    #[test]
    fn test_build_prompt_interpolates_fields() {
        let names = vec!["AK-2019-001_a.jpg".to_string(), "AK-2019-001_b.jpg".to_string()];
        let prompt = build_prompt(&record("Acme", MISSING, "10x20cm", MISSING), &names);

        assert!(prompt.starts_with("\nYou are a museum cataloguer"));
        assert!(prompt.contains("Object ID: AK/2019-001 \n"));
        assert!(prompt.contains("Title: Telefon \n"));
        assert!(prompt.contains("Image List (local selection): AK-2019-001_a.jpg, AK-2019-001_b.jpg \n"));
        assert!(prompt.contains("Material: Empty Cell \n"));
        assert!(prompt.contains("Angaben laut Liste: Hersteller: Acme; Maße: 10x20cm. \n"));
        assert!(prompt.contains(
            "According to the list: Manufacturer: Acme; Dimensions: 10x20cm.\n"
        ));
    }

    #[test]
    fn test_build_prompt_keeps_values_verbatim() {
        let prompt = build_prompt(&record("{title} & <Söhne>", MISSING, MISSING, "ca. 1900"), &[]);
        assert!(prompt.contains("Manufacturer: {title} & <Söhne> \n"));
        assert!(prompt.contains("Hersteller: {title} & <Söhne>; Jahr: ca. 1900."));
        assert!(prompt.contains("Image List (local selection): Empty Cell \n"));
    }

    #[test]
    fn test_build_prompt_all_missing_leaves_empty_sentence() {
        let prompt = build_prompt(&record(MISSING, MISSING, MISSING, MISSING), &[]);
        assert!(prompt.contains("Angaben laut Liste: . \n"));
        assert!(prompt.contains("According to the list: .\n"));
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        let names = vec!["x.jpg".to_string()];
        let r = record("Acme", "Holz", MISSING, "1920");
        assert_eq!(build_prompt(&r, &names), build_prompt(&r, &names));
    }

    #[test]
    fn test_build_prompt_keeps_template_whitespace() {
        let prompt = build_prompt(&record("Acme", "Holz", "10x20cm", "1920"), &["x.jpg".to_string()]);
        let lines: Vec<&str> = prompt.split('\n').collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines.len(), 30);
        assert_eq!(lines[12], "Year: 1920 ");
        assert_eq!(lines[21], "OUTPUT (exactly three parts, in this order) ");
        assert_eq!(lines[27], "Angaben laut Liste: Hersteller: Acme; Material: Holz; Maße: 10x20cm; Jahr: 1920. ");
        assert!(lines[28].ends_with("According to the list: Manufacturer: Acme; Material: Holz; Dimensions: 10x20cm; Year: 1920."));
        assert_eq!(lines[29], "");
        assert_eq!(lines.iter().filter(|l| l.ends_with(' ')).count(), 18);
    }

    #[test]
    fn test_prompt_snippet() {
        assert_eq!(prompt_snippet("short", 10), "short");
        assert_eq!(prompt_snippet("Maße und mehr", 4), "Maße ...[truncated]");
        assert_eq!(prompt_snippet("abcd", 4), "abcd");
    }
}
