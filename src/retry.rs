//! 批次重试策略
//!
//! 默认不重试：失败批次直接丢弃，对应行保留原文。

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::api_constants::service_config;

/// 重试配置
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// 首次失败后的额外尝试次数
    pub max_retries: usize,
    /// 第一次重试前的延迟
    pub initial_delay: Duration,
    /// 延迟上限
    pub max_delay: Duration,
    /// 指数退避倍数
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub fn new(max_retries: usize, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay: Duration::from_millis(service_config::RETRY_DELAY_MAX_MS),
            backoff_multiplier: 2.0,
        }
    }

    /// 批量翻译预设：1s 起步，每次翻倍，上限 10s
    pub fn batch(max_retries: usize) -> Self {
        Self::new(
            max_retries,
            Duration::from_millis(service_config::RETRY_DELAY_BASE_MS),
        )
    }

    /// 不等待的重试，用于测试
    pub fn immediate(max_retries: usize) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// 第 `attempt` 次尝试（从0开始）前的等待时间
    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        Duration::from_millis(delay_ms as u64).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::batch(service_config::DEFAULT_MAX_RETRIES)
    }
}

/// 执行异步操作，`should_retry` 返回 false 的错误立即返回
pub async fn with_retry_if<T, E, F, Fut, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let total_attempts = config.max_retries + 1;
    let mut attempt = 0;

    loop {
        let delay = config.delay_for_attempt(attempt);
        if !delay.is_zero() {
            debug!(
                "{}: 第 {}/{} 次尝试，等待 {:?}",
                operation_name,
                attempt + 1,
                total_attempts,
                delay
            );
            sleep(delay).await;
        }

        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("{}: 第 {}/{} 次尝试成功", operation_name, attempt + 1, total_attempts);
                }
                return Ok(result);
            }
            Err(e) => {
                let remaining = total_attempts - attempt - 1;
                if remaining == 0 || !should_retry(&e) {
                    return Err(e);
                }
                warn!(
                    "{}: 第 {}/{} 次尝试失败 ({})，剩余 {} 次重试",
                    operation_name,
                    attempt + 1,
                    total_attempts,
                    e,
                    remaining
                );
            }
        }

        attempt += 1;
    }
}
