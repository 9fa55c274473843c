//! 求解请求与结果模型

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 求解请求：核心只需要一个 URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub url: String,
}

impl SolveRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// 答案值：整数 / 浮点 / 文本
///
/// 类型由成功的解析路径决定，不预先声明。
/// tier-1 解析出的非标量 JSON 值（数组、对象、布尔）原样保留在
/// `Json` 分支中。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Json(JsonValue),
}

impl AnswerValue {
    /// 从 JSON 值转换，保留原始类型
    ///
    /// `null` 视为"没有答案"，与缺少 "answer" 键同义。
    pub fn from_json(value: JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => None,
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(AnswerValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Some(AnswerValue::Float(f))
                } else {
                    Some(AnswerValue::Json(JsonValue::Number(n)))
                }
            }
            JsonValue::String(s) => Some(AnswerValue::Text(s)),
            other => Some(AnswerValue::Json(other)),
        }
    }

    /// 转回 JSON 值（用于提交载荷）
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

/// 求解结果：在流程推进过程中逐步填充的累加器
///
/// 不变式：`solved` 只在流程到达终态后置为 true（即使中途有阶段
/// 降级）；`answer` 在模型没有产出可解析内容时可以为 null。
#[derive(Debug, Serialize)]
pub struct SolveResult {
    pub solved: bool,
    pub answer: Option<AnswerValue>,
    pub submit_url: Option<String>,
    pub submit_response: Option<JsonValue>,
    pub log: Vec<String>,
    pub duration_sec: f64,
}

impl SolveResult {
    pub fn new() -> Self {
        Self {
            solved: false,
            answer: None,
            submit_url: None,
            submit_response: None,
            log: Vec::new(),
            duration_sec: 0.0,
        }
    }

    /// 追加一条诊断日志
    pub fn push_log(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
    }
}

impl Default for SolveResult {
    fn default() -> Self {
        Self::new()
    }
}
