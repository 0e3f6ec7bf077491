//! 目録テキスト生成クライアント
//!
//! 画像をBase64で埋め込み、プロンプトと一緒に1リクエストで送る。
//! レート制限（429）は RetryPolicy に従って待機・再試行し、それ以外の失敗は
//! エラーマーカー付きの文字列として返す（呼び出し側は文字列を見るだけでよい）。

mod openai;

pub use openai::{ChatMessage, ChatRequest, ContentPart, HttpTransport, ImageUrl};

use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::pacing::{Sleeper, TokioSleeper};
use async_trait::async_trait;
use base64::Engine;
use museum_catalog_common::markers;
use museum_catalog_common::{RetryDecision, RetryPolicy, Retryable};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// API呼び出しのエラー
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited")]
    RateLimited,
}

impl Retryable for LlmError {
    fn is_retryable(&self) -> bool {
        matches!(self, LlmError::RateLimited)
    }
}

/// リクエスト送信の抽象（HTTP実装とテスト用の差し替え）
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> std::result::Result<String, LlmError>;
}

/// 1オブジェクト分のテキスト生成
///
/// `Err` は画像の読み込み失敗などオブジェクト処理自体の失敗。
/// APIの失敗は `Ok` のエラーマーカー文字列で返る。
#[async_trait]
pub trait CatalogGenerator: Send + Sync {
    async fn generate(&self, image_paths: &[PathBuf], prompt: &str) -> Result<String>;
}

/// 生成リクエストの設定
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub retry: RetryPolicy,
}

impl GenerationSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            retry: config.retry_policy(),
        }
    }
}

pub struct GenerationClient<T, S> {
    transport: T,
    sleeper: S,
    settings: GenerationSettings,
}

impl GenerationClient<HttpTransport, TokioSleeper> {
    /// 設定とAPIキーからHTTPクライアントを構築
    pub fn from_config(config: &Config, api_key: String) -> Result<Self> {
        let transport = HttpTransport::new(config.endpoint.clone(), api_key, config.timeout())?;
        Ok(Self::new(transport, TokioSleeper, GenerationSettings::from_config(config)))
    }
}

impl<T: ChatTransport, S: Sleeper> GenerationClient<T, S> {
    pub fn new(transport: T, sleeper: S, settings: GenerationSettings) -> Self {
        Self {
            transport,
            sleeper,
            settings,
        }
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// プロンプトと画像から1件のリクエストを組み立てる
    pub fn build_request(&self, image_paths: &[PathBuf], prompt: &str) -> Result<ChatRequest> {
        let mut content = vec![ContentPart::Text {
            text: prompt.to_string(),
        }];
        for path in image_paths {
            content.push(ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: encode_image(path)?,
                },
            });
        }

        Ok(ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
            max_tokens: self.settings.max_tokens,
        })
    }

    /// リトライ方針に従って送信
    pub async fn send_with_retry(&self, request: &ChatRequest) -> Result<String> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let error = match self.transport.send(request).await {
                Ok(text) => return Ok(text),
                Err(e) => e,
            };

            match self.settings.retry.decide(attempt, &error) {
                RetryDecision::Retry(wait) => {
                    log::warn!(
                        "⏳ レート制限（{}回目）、{}秒待機します...",
                        attempt,
                        wait.as_secs()
                    );
                    self.sleeper.sleep(wait).await;
                }
                RetryDecision::Exhausted => {
                    log::error!("❌ {}回試行しても成功しませんでした", attempt);
                    return Ok(markers::ABORTED.to_string());
                }
                RetryDecision::Stop => return error_text(error),
            }
        }
    }
}

#[async_trait]
impl<T: ChatTransport, S: Sleeper> CatalogGenerator for GenerationClient<T, S> {
    async fn generate(&self, image_paths: &[PathBuf], prompt: &str) -> Result<String> {
        let request = self.build_request(image_paths, prompt)?;
        self.send_with_retry(&request).await
    }
}

/// 再試行しないエラーを出力用の文字列に変換
fn error_text(error: LlmError) -> Result<String> {
    match error {
        LlmError::ApiError { status, message } => {
            log::error!("❌ API error: HTTP {}: {}", status, message);
            Ok(markers::api_error(format!("HTTP {}: {}", status, message)))
        }
        LlmError::RequestFailed(message) => {
            log::error!("❌ Connection error: {}", message);
            Ok(markers::connection_error(message))
        }
        LlmError::ParseError(message) => Err(CatalogError::ApiParse(message)),
        LlmError::RateLimited => Ok(markers::ABORTED.to_string()),
    }
}

/// 画像ファイルを読み込んでData URLに変換
pub fn encode_image(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| CatalogError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    let data = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{}", mime_type_for(path), data))
}

fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}
