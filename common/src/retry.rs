//! リトライ方針
//!
//! 最大試行回数・待機時間の計算・再試行可否の判定を、制御フローから切り離して持つ。

use std::time::Duration;

/// 再試行してよいエラーかどうかを判定
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// 1回の失敗に対する判断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// 指定時間待ってから再試行
    Retry(Duration),
    /// 再試行対象外のエラー
    Stop,
    /// 試行回数を使い切った
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 初回を含む試行回数の上限
    pub max_attempts: u32,
    /// 待機時間は `step * 試行回数`
    pub step: Duration,
}

impl RetryPolicy {
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self { max_attempts, step }
    }

    /// `attempt` 回目（1始まり）の失敗後に待つ時間
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt)
    }

    /// `attempt` 回目（1始まり）が `error` で失敗したときの判断
    pub fn decide<E: Retryable + ?Sized>(&self, attempt: u32, error: &E) -> RetryDecision {
        if !error.is_retryable() {
            RetryDecision::Stop
        } else if attempt >= self.max_attempts {
            RetryDecision::Exhausted
        } else {
            RetryDecision::Retry(self.delay_for(attempt))
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::linear(3, Duration::from_secs(5))
    }
}
