//! 求解流程 - 流程层
//!
//! 核心职责：定义"一个 URL"的完整求解流程
//!
//! 流程顺序：
//! 1. 导航 → 2. 附件收集 → 3. 构建提示词 → 4. 调用 LLM →
//! 5. 提取答案 → 6. 发现提交端点（表单兜底） → 7. 提交 → 终态
//!
//! 流程没有失败状态：每个阶段独立捕获自己的错误并写入
//! `SolveResult.log`，然后无条件推进。终态一定是
//! `solved = true` + 耗时测量，即使所有子阶段都降级了。

use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::infrastructure::JsExecutor;
use crate::models::{EvidenceBundle, SolveResult};
use crate::services::{
    AnswerExtractor, AttachmentFetcher, EvidenceExtractor, LlmGateway, PageNavigator,
    PromptBuilder, SubmissionDispatcher, Transcriber,
};
use crate::workflow::solve_ctx::SolveCtx;

/// 求解流程
///
/// - 编排完整的求解流程
/// - 决定何时收集、何时问模型、何时兜底
/// - 不持有任何资源（page / browser）
/// - 只依赖业务能力（services）
pub struct SolveFlow {
    navigator: PageNavigator,
    fetcher: AttachmentFetcher,
    extractor: EvidenceExtractor,
    prompt_builder: PromptBuilder,
    llm: LlmGateway,
    submitter: SubmissionDispatcher,
}

impl SolveFlow {
    /// 创建新的求解流程
    pub fn new(config: &Config) -> Self {
        Self {
            navigator: PageNavigator::new(config.nav_timeout()),
            fetcher: AttachmentFetcher::new(config.request_timeout()),
            extractor: EvidenceExtractor::new(
                config.max_attachment_bytes,
                Transcriber::new(config),
            ),
            prompt_builder: PromptBuilder::new(config),
            llm: LlmGateway::new(config),
            submitter: SubmissionDispatcher::new(config.request_timeout()),
        }
    }

    /// 运行完整流程，产出填充好的求解结果
    pub async fn run(&self, executor: &JsExecutor, ctx: &SolveCtx) -> SolveResult {
        let mut result = SolveResult::new();

        // ========== 阶段 1: 导航 ==========
        info!("🌐 正在导航: {}", ctx.request_url);
        let snapshot = self.navigator.navigate(executor, &ctx.request_url).await;
        for note in &snapshot.notes {
            result.push_log(note.to_string());
        }

        // 正则扫描得到的提交端点候选先记下，表单兜底在答案之后
        result.submit_url = snapshot.submit_url_guess.clone();

        // ========== 阶段 2: 附件收集 ==========
        let bundle = self
            .harvest_attachments(&snapshot.links, ctx, &mut result)
            .await;

        // ========== 阶段 3: 构建提示词 ==========
        let prompt = self.prompt_builder.build(&snapshot.body_text, &bundle);
        debug!("提示词长度: {} 字符", prompt.len());

        // ========== 阶段 4: 调用 LLM ==========
        let llm_output = match self.llm.complete(&prompt).await {
            Ok(output) => output,
            Err(e) => {
                warn!("⚠️ {}", e);
                result.push_log(e.to_string());
                // 网关失败按空输出处理，流程继续
                String::new()
            }
        };

        // ========== 阶段 5: 提取答案 ==========
        result.answer = AnswerExtractor::extract(&llm_output);

        // ========== 阶段 6: 发现提交端点（表单兜底） ==========
        if result.submit_url.is_none() {
            result.submit_url = self
                .navigator
                .form_action_fallback(executor, &ctx.request_url)
                .await;
        }

        // ========== 阶段 7: 提交 ==========
        if let Some(submit_url) = result.submit_url.clone() {
            match self
                .submitter
                .submit(&submit_url, ctx, result.answer.as_ref())
                .await
            {
                Ok(response) => result.submit_response = Some(response),
                Err(e) => {
                    result.push_log(e.to_string());
                    result.submit_response = Some(json!({"error": e.message()}));
                }
            }
        }

        // ========== 终态 ==========
        result.solved = true;
        result.duration_sec = ctx.elapsed_secs();
        info!(
            "✅ 求解完成，耗时 {:.2} 秒，日志 {} 条",
            result.duration_sec,
            result.log.len()
        );
        result
    }

    /// 逐个下载并解析附件链接
    ///
    /// 每个链接下载前都检查总时限：超时后立刻停止收集剩余链接，
    /// 已收集的记录原样保留。单个链接的失败降级为 error 记录。
    async fn harvest_attachments(
        &self,
        links: &[String],
        ctx: &SolveCtx,
        result: &mut SolveResult,
    ) -> EvidenceBundle {
        let mut bundle = EvidenceBundle::default();

        for link in links {
            if ctx.deadline_exceeded() {
                warn!("⏰ 已超过总时限，停止收集剩余附件 {}", ctx);
                result.push_log("附件收集因超时提前结束");
                break;
            }

            let record = match self.fetcher.fetch(link).await {
                Ok((bytes, hint)) => self.extractor.extract(&bytes, &hint).await,
                Err(e) => {
                    result.push_log(e.to_string());
                    json!({"error": e.message()})
                }
            };
            bundle.insert(link.clone(), record);
        }

        if !bundle.is_empty() {
            info!("📎 收集到 {} 个附件", bundle.len());
        }
        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_harvest_skips_all_fetches_when_deadline_already_passed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a,b\n1,2\n"))
            .expect(0)
            .mount(&server)
            .await;

        let flow = SolveFlow::new(&Config::default());
        let ctx = SolveCtx::with_timeout("https://quiz.example/q/1", Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(5)).await;

        let mut result = SolveResult::new();
        let links = vec![format!("{}/a.csv", server.uri())];
        let bundle = flow.harvest_attachments(&links, &ctx, &mut result).await;

        assert!(bundle.is_empty());
        assert!(result.log.iter().any(|entry| entry.contains("超时")));
    }

    #[tokio::test]
    async fn test_harvest_keeps_collected_records_after_deadline_trips() {
        let server = MockServer::start().await;
        // 第一个附件的响应拖过总时限，第二个附件必须再也收不到请求
        Mock::given(method("GET"))
            .and(path("/a.csv"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("a,b\n1,2\n")
                    .set_delay(Duration::from_millis(80)),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("c,d\n3,4\n"))
            .expect(0)
            .mount(&server)
            .await;

        let flow = SolveFlow::new(&Config::default());
        let ctx = SolveCtx::with_timeout("https://quiz.example/q/1", Duration::from_millis(40));

        let mut result = SolveResult::new();
        let links = vec![
            format!("{}/a.csv", server.uri()),
            format!("{}/b.csv", server.uri()),
        ];
        let bundle = flow.harvest_attachments(&links, &ctx, &mut result).await;

        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.files[&links[0]]["type"], "csv");
        assert!(result.log.iter().any(|entry| entry.contains("超时")));
    }
}
