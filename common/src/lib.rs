//! Museum Catalog Common Library
//!
//! CLIから利用される、I/Oを持たない共通ロジック:
//! セル値の正規化、オブジェクト/結果の型、プロンプト生成、グルーピング、リトライ方針

pub mod types;
pub mod normalize;
pub mod markers;
pub mod prompts;
pub mod grouping;
pub mod retry;
pub mod error;
pub mod export;

pub use types::{columns, ObjectRecord, ResultRecord};
pub use normalize::{is_missing, normalize_value, MISSING};
pub use prompts::{build_list_sentences, build_prompt, prompt_snippet};
pub use grouping::group_stable;
pub use retry::{RetryDecision, RetryPolicy, Retryable};
pub use error::{Error, Result};
