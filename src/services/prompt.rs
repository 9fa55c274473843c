//! 提示词构建服务 - 业务能力层
//!
//! 按固定顺序拼接：System 前导 → User 前导 → 任务文本 →
//! 证据包的 JSON 序列化 → 单键 JSON 输出指令与示例。
//!
//! 除上游已经截断的正文外，这里不再做任何截断：证据包的 JSON
//! 可以任意大，这是一个已接受的设计取舍。

use crate::config::Config;
use crate::models::EvidenceBundle;

/// 提示词构建服务
pub struct PromptBuilder {
    system_prompt: String,
    user_prompt: String,
}

impl PromptBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            system_prompt: config.system_prompt.clone(),
            user_prompt: config.user_prompt.clone(),
        }
    }

    /// 拼接完整提示词
    ///
    /// `task_text` 是页面正文或评测方直接给的题目文本。
    pub fn build(&self, task_text: &str, bundle: &EvidenceBundle) -> String {
        let parsed_data =
            serde_json::to_string_pretty(bundle).unwrap_or_else(|_| "{}".to_string());

        format!(
            "System: {system}\n\n\
             User: {user}\n\n\
             Task:\n{task}\n\n\
             ParsedData:\n{parsed}\n\n\
             Return ONLY a JSON object containing the key \"answer\" with the value.\n\
             Example:\n\
             {{\"answer\": 12345}}\n",
            system = self.system_prompt,
            user = self.user_prompt,
            task = task_text,
            parsed = parsed_data,
        )
    }
}
