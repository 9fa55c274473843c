//! LLM 网关 - 业务能力层
//!
//! 只负责"一次文本补全"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::StageError;

/// LLM 网关
///
/// 职责：
/// - 把一段完整的提示词发给模型，拿回原始文本
/// - 凭证缺失在首次真正调用时报错，不做静默空转
/// - 不认识证据包，也不解析模型输出
pub struct LlmGateway {
    client: Client<OpenAIConfig>,
    model_name: String,
    has_credentials: bool,
}

impl LlmGateway {
    /// 创建新的 LLM 网关
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            has_credentials: !config.llm_api_key.is_empty(),
        }
    }

    /// 单次文本补全调用
    ///
    /// 提示词本身已经包含 System/User 前导（由提示词构建服务拼好），
    /// 这里作为单条用户消息发送。
    pub async fn complete(&self, prompt: &str) -> Result<String, StageError> {
        if !self.has_credentials {
            return Err(StageError::gateway(&self.model_name, "LLM_API_KEY 未设置"));
        }

        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| StageError::gateway(&self.model_name, format!("构建请求失败: {}", e)))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(0.3)
            .max_tokens(1024u32)
            .build()
            .map_err(|e| StageError::gateway(&self.model_name, format!("构建请求失败: {}", e)))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            StageError::gateway(&self.model_name, format!("LLM API 调用失败: {}", e))
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| StageError::gateway(&self.model_name, "LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }
}
