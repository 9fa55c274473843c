//! 答案提取服务 - 业务能力层
//!
//! 从 LLM 的自由文本输出（可能为空、畸形或夹在闲聊里）中分层恢复
//! 结构化答案。本服务**永不失败**：任何一层解析出错都静默回退到
//! 返回修剪后的原文。
//!
//! 层级顺序是刻意保留的启发式，不可调整：
//! 1. 贪婪匹配第一个 `{` 到最后一个 `}`，按 JSON 解析取 "answer" 键；
//!    匹配到但解析失败时直接回退原文（**不再**扫描数字）
//! 2. 第一个数字形状的 token：带小数点转浮点，否则转整数
//! 3. 修剪后的原文

use regex::Regex;
use serde_json::Value as JsonValue;

use crate::models::AnswerValue;

/// 模型被要求返回的 JSON 键
const ANSWER_KEY: &str = "answer";

/// 答案提取服务
pub struct AnswerExtractor;

impl AnswerExtractor {
    /// 分层提取答案
    ///
    /// 只有在 JSON 对象成功解析但缺少 "answer" 键（或键值为 null）
    /// 时返回 `None`，其余路径总会给出某个答案值。
    pub fn extract(raw: &str) -> Option<AnswerValue> {
        // ---- 层 1: JSON 对象 ----
        if let Some(candidate) = find_json_candidate(raw) {
            return match serde_json::from_str::<JsonValue>(candidate) {
                Ok(value) => value
                    .get(ANSWER_KEY)
                    .cloned()
                    .and_then(AnswerValue::from_json),
                // 解析失败直接回退原文，不进入数字扫描层
                Err(_) => Some(AnswerValue::Text(raw.trim().to_string())),
            };
        }

        // ---- 层 2: 数字 token ----
        if let Some(token) = find_number_token(raw) {
            let parsed = if token.contains('.') {
                token.parse::<f64>().ok().map(AnswerValue::Float)
            } else {
                token.parse::<i64>().ok().map(AnswerValue::Integer)
            };
            // 溢出等解析失败同样回退原文
            return Some(parsed.unwrap_or_else(|| AnswerValue::Text(raw.trim().to_string())));
        }

        // ---- 层 3: 原文 ----
        Some(AnswerValue::Text(raw.trim().to_string()))
    }
}

/// 第一个 `{` 到最后一个 `}`（贪婪）
fn find_json_candidate(raw: &str) -> Option<&str> {
    let re = Regex::new(r"(?s)\{.*\}").ok()?;
    re.find(raw).map(|m| m.as_str())
}

/// 第一个数字形状的 token：可选负号、数字、可选小数点
fn find_number_token(raw: &str) -> Option<String> {
    let re = Regex::new(r"-?\d+\.?\d*").ok()?;
    re.find(raw).map(|m| m.as_str().to_string())
}
