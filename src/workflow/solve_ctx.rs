//! 求解上下文
//!
//! 封装"我正在求解哪个 URL、还剩多少时间"这一信息

use std::fmt::Display;
use std::time::{Duration, Instant};

use crate::config::Config;

/// 求解上下文
///
/// 每次求解调用都新建一份，结束后整体丢弃；
/// 不同求解之间不共享任何状态。
#[derive(Debug, Clone)]
pub struct SolveCtx {
    /// 请求的目标 URL
    pub request_url: String,

    /// 提交身份（缺省时以 null 透传给提交端点）
    pub email: Option<String>,
    pub secret: Option<String>,

    /// 流程起点
    started: Instant,

    /// 总时限（附件收集阶段逐链接检查）
    total_timeout: Duration,
}

impl SolveCtx {
    /// 创建新的求解上下文
    pub fn new(request_url: impl Into<String>, config: &Config) -> Self {
        Self {
            request_url: request_url.into(),
            email: config.submit_email.clone(),
            secret: config.submit_secret.clone(),
            started: Instant::now(),
            total_timeout: config.total_timeout(),
        }
    }

    /// 指定时限的上下文（测试用）
    pub fn with_timeout(request_url: impl Into<String>, total_timeout: Duration) -> Self {
        Self {
            request_url: request_url.into(),
            email: None,
            secret: None,
            started: Instant::now(),
            total_timeout,
        }
    }

    /// 流程已耗时
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// 流程已耗时（秒，用于结果填充）
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// 是否已超过总时限
    pub fn deadline_exceeded(&self) -> bool {
        self.started.elapsed() > self.total_timeout
    }
}

impl Display for SolveCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[求解 {} 已耗时 {:.1}s]",
            self.request_url,
            self.elapsed_secs()
        )
    }
}
