use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("No API key configured. Set OPENAI_API_KEY (environment or .env) or run `museum-catalog config --set-api-key YOUR_KEY`")]
    MissingApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Expected column '{column}' not found in {source_name} (after normalization)")]
    MissingColumn { column: String, source_name: String },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("API response could not be parsed: {0}")]
    ApiParse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] museum_catalog_common::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
