use crate::error::{CatalogError, Result};
use museum_catalog_common::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// APIキーを読む環境変数
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    /// 1オブジェクトあたりの最大画像数
    pub max_images: usize,
    /// 生成トークン上限
    pub max_tokens: u32,
    /// 1スプレッドシートあたりの最大オブジェクト数
    pub max_objects: usize,
    /// 生成後の待機秒数（レート制限対策）
    pub api_wait_seconds: u64,
    pub timeout_seconds: u64,
    pub max_attempts: u32,
    /// レート制限時の待機秒数（× 試行回数）
    pub backoff_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".into(),
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
            max_images: 3,
            max_tokens: 1200,
            max_objects: 5,
            api_wait_seconds: 10,
            timeout_seconds: 120,
            max_attempts: 3,
            backoff_seconds: 5,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 設定を読めなければ警告を出して既定値を使う
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => {
                log::warn!("⚠ 設定ファイルの場所を決められません（既定値を使用）: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from_or_default(config_path: &Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            log::warn!(
                "⚠ 設定ファイルを読めません（既定値を使用）: {}: {}",
                config_path.display(),
                e
            );
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CatalogError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("museum-catalog").join("config.json"))
    }

    /// APIキーを取得（環境変数を優先）
    pub fn get_api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        resolve_api_key(from_env, self.api_key.as_deref())
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::linear(self.max_attempts, Duration::from_secs(self.backoff_seconds))
    }

    pub fn api_wait(&self) -> Duration {
        Duration::from_secs(self.api_wait_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn resolve_api_key(from_env: Option<String>, from_file: Option<&str>) -> Result<String> {
    from_env
        .into_iter()
        .chain(from_file.map(str::to_string))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .ok_or(CatalogError::MissingApiKey)
}
