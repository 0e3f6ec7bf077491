pub mod excel;

use crate::error::Result;
use museum_catalog_common::ResultRecord;
use std::path::{Path, PathBuf};

/// 出力ファイル名の既定値
pub const DEFAULT_OUTPUT_NAME: &str = "object_descriptions.xlsx";

/// 出力先がディレクトリ（または拡張子なし）の場合は既定のファイル名を付ける
pub fn output_path_for(output: &Path) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(DEFAULT_OUTPUT_NAME)
    } else {
        output.to_path_buf()
    }
}

pub fn export_results(results: &[ResultRecord], output: &Path) -> Result<PathBuf> {
    let output_path = output_path_for(output);
    excel::generate_excel(results, &output_path)?;
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_path_for_directory() {
        let dir = tempdir().unwrap();
        assert_eq!(output_path_for(dir.path()), dir.path().join(DEFAULT_OUTPUT_NAME));
    }

    #[test]
    fn test_output_path_for_file() {
        let path = Path::new("out/katalog.xlsx");
        assert_eq!(output_path_for(path), path.to_path_buf());
    }

    #[test]
    fn test_output_path_without_extension() {
        let path = Path::new("ergebnisse");
        assert_eq!(output_path_for(path), Path::new("ergebnisse").join(DEFAULT_OUTPUT_NAME));
    }
}
