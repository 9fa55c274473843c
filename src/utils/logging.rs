//! 日志工具模块
//!
//! 提供 tracing 初始化与日志格式化的辅助函数

use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 过滤级别由 `RUST_LOG` 环境变量控制，默认 `info`。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
    }
}
