//! 提交分发服务 - 业务能力层
//!
//! 把求出的答案 POST 回页面上发现的提交端点。尽力而为：
//! 响应不是 JSON 就记录 {status_code, text}，传输失败交给
//! 流程层降级成 {error} 记录，绝不让提交失败影响终态。

use std::time::Duration;

use serde_json::{json, Value as JsonValue};
use tracing::{debug, info};

use crate::error::StageError;
use crate::models::AnswerValue;
use crate::workflow::SolveCtx;

/// 提交分发服务
pub struct SubmissionDispatcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl SubmissionDispatcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// POST 答案到提交端点
    ///
    /// 载荷固定为 `{email, secret, url, answer}`，身份缺省时以 null
    /// 透传。响应体尽量按 JSON 记录。
    pub async fn submit(
        &self,
        submit_url: &str,
        ctx: &SolveCtx,
        answer: Option<&AnswerValue>,
    ) -> Result<JsonValue, StageError> {
        let payload = json!({
            "email": ctx.email,
            "secret": ctx.secret,
            "url": ctx.request_url,
            "answer": answer.map(|a| a.to_json()).unwrap_or(JsonValue::Null),
        });

        info!("📤 提交答案到: {}", submit_url);
        debug!("提交载荷: {}", payload);

        let response = self
            .client
            .post(submit_url)
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| StageError::submission(submit_url, format!("提交请求失败: {}", e)))?;

        let status_code = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| StageError::submission(submit_url, format!("读取提交响应失败: {}", e)))?;

        // 响应是 JSON 就原样记录，否则退到 {status_code, text}
        match serde_json::from_str::<JsonValue>(&text) {
            Ok(value) => Ok(value),
            Err(_) => Ok(json!({"status_code": status_code, "text": text})),
        }
    }
}
