//! 音频转写服务 - 业务能力层
//!
//! 调用 OpenAI 兼容的 /audio/transcriptions 接口把音频转成文字。
//! 只负责"转写"这一件事，失败如何降级由调用方（证据提取服务）决定。

use std::time::Duration;

use anyhow::Result;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::Config;

/// 音频转写服务
pub struct Transcriber {
    client: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
    timeout: Duration,
}

impl Transcriber {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.clone(),
            model_name: config.transcribe_model_name.clone(),
            timeout: config.request_timeout(),
        }
    }

    /// 转写一段音频，返回文字
    ///
    /// 凭证缺失在这里立刻报错，而不是静默跳过。
    pub async fn transcribe(&self, bytes: Vec<u8>, filename_hint: &str) -> Result<String> {
        if self.api_key.is_empty() {
            anyhow::bail!("LLM_API_KEY 未设置，无法调用转写接口");
        }

        debug!(
            "转写音频: {} ({} 字节)，模型: {}",
            filename_hint,
            bytes.len(),
            self.model_name
        );

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename_hint.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model_name.clone());

        let endpoint = format!(
            "{}/audio/transcriptions",
            self.api_base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                warn!("转写接口调用失败: {}", e);
                anyhow::anyhow!("转写接口调用失败: {}", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("转写接口返回 HTTP {}", status.as_u16());
        }

        let value: JsonValue = response.json().await?;
        value
            .get("text")
            .and_then(|t| t.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("转写响应缺少 text 字段"))
    }
}
