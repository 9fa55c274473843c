//! 页面导航服务 - 业务能力层
//!
//! 驱动无头浏览器访问目标页面，并从渲染结果中收集：
//! - 原始 HTML
//! - 可见正文（硬截断到 20000 字符，约束提示词大小）
//! - 附件下载链接（相对链接会绝对化）
//! - 提交端点的候选 URL（正则扫描）
//!
//! 导航失败、等待超时都是**非致命**的：记入 notes 后继续提取
//! 已经到手的内容，绝不让一次失败中断整个求解。

use std::time::Duration;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::StageError;
use crate::infrastructure::JsExecutor;
use crate::models::evidence::DOWNLOAD_EXTENSIONS;
use crate::utils::logging::truncate_text;

/// 正文截断上限（字符数，约束提示词大小）
const BODY_TEXT_CAP: usize = 20_000;

/// 网络静默后的渲染窗口，等 load 之后的 XHR 把内容写进 DOM
const SETTLE_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// 页面快照：一次导航的全部产出
#[derive(Debug, Default)]
pub struct PageSnapshot {
    pub html: String,
    pub body_text: String,
    /// 识别出的附件下载链接（已绝对化）
    pub links: Vec<String>,
    /// 正则扫描 HTML 得到的提交端点候选
    pub submit_url_guess: Option<String>,
    /// 导航过程中发生的非致命错误
    pub notes: Vec<StageError>,
}

/// 页面导航服务
///
/// 职责：
/// - 带超时的导航与加载等待
/// - 正文 / HTML / 链接 / 提交端点的提取
/// - 不持有 Page（通过 JsExecutor 借用能力）
/// - 不关心流程顺序
pub struct PageNavigator {
    nav_timeout: Duration,
}

impl PageNavigator {
    pub fn new(nav_timeout: Duration) -> Self {
        Self { nav_timeout }
    }

    /// 导航到目标 URL 并提取页面内容
    pub async fn navigate(&self, executor: &JsExecutor, url: &str) -> PageSnapshot {
        let mut snapshot = PageSnapshot::default();
        let page = executor.page();

        // ---- 导航（带超时） ----
        match tokio::time::timeout(self.nav_timeout, page.goto(url)).await {
            Ok(Ok(_)) => debug!("页面导航成功: {}", url),
            Ok(Err(e)) => {
                warn!("导航失败: {}", e);
                snapshot
                    .notes
                    .push(StageError::navigation(url, format!("导航失败: {}", e)));
            }
            Err(_) => {
                warn!("导航超时 ({:?})", self.nav_timeout);
                snapshot.notes.push(StageError::navigation(url, "导航超时"));
            }
        }

        // ---- 等待网络静默（带超时，超时只记日志） ----
        // wait_for_navigation 等的是生命周期事件里的网络静默信号，
        // 不是更早触发的 load 事件
        match tokio::time::timeout(self.nav_timeout, page.wait_for_navigation()).await {
            Ok(Ok(_)) => {
                debug!("页面网络已静默");
                // 留一个渲染窗口给 load 之后才发起的 XHR
                tokio::time::sleep(SETTLE_QUIET_PERIOD).await;
            }
            Ok(Err(e)) => {
                warn!("等待网络静默失败: {}", e);
                snapshot
                    .notes
                    .push(StageError::navigation(url, format!("等待网络静默失败: {}", e)));
            }
            Err(_) => {
                warn!("等待网络静默超时 ({:?})", self.nav_timeout);
                snapshot
                    .notes
                    .push(StageError::navigation(url, "等待网络静默超时"));
            }
        }

        // ---- 原始 HTML ----
        match page.content().await {
            Ok(html) => snapshot.html = html,
            Err(e) => snapshot
                .notes
                .push(StageError::navigation(url, format!("读取页面 HTML 失败: {}", e))),
        }

        // ---- 可见正文（失败时回退到压扁的 HTML） ----
        let body_text = match executor.eval_as::<String>("document.body.innerText").await {
            Ok(text) => text,
            Err(e) => {
                debug!("读取正文失败，回退到 HTML: {}", e);
                collapse_whitespace(&snapshot.html)
            }
        };
        snapshot.body_text = body_text.chars().take(BODY_TEXT_CAP).collect();
        debug!("正文预览: {}", truncate_text(&snapshot.body_text, 80));

        // ---- 附件链接 ----
        let page_url = self.page_url_or(executor, url).await;
        let hrefs: Vec<Option<String>> = match executor
            .eval_as("Array.from(document.querySelectorAll('a')).map(a => a.getAttribute('href'))")
            .await
        {
            Ok(hrefs) => hrefs,
            Err(e) => {
                snapshot
                    .notes
                    .push(StageError::navigation(url, format!("链接发现失败: {}", e)));
                Vec::new()
            }
        };
        snapshot.links = filter_attachment_hrefs(&page_url, hrefs);
        if !snapshot.links.is_empty() {
            info!("🔗 发现 {} 个附件链接", snapshot.links.len());
        }

        // ---- 提交端点候选 ----
        snapshot.submit_url_guess = extract_submit_url(&snapshot.html);

        snapshot
    }

    /// 表单 action 兜底：正则没扫到提交端点时，取第一个 <form> 的
    /// action 属性并绝对化
    pub async fn form_action_fallback(
        &self,
        executor: &JsExecutor,
        request_url: &str,
    ) -> Option<String> {
        let js = "(() => { const f = document.querySelector('form'); \
                  return f ? f.getAttribute('action') : null; })()";
        let action: Option<String> = executor.eval_as(js).await.ok()?;
        let action = action?;
        if action.is_empty() {
            return None;
        }
        let base = self.page_url_or(executor, request_url).await;
        Some(resolve_against(&base, &action))
    }

    /// 页面实际 URL，取不到时退回请求 URL
    async fn page_url_or(&self, executor: &JsExecutor, request_url: &str) -> String {
        executor
            .current_url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| request_url.to_string())
    }
}

/// 正则扫描 HTML 中第一个形如 `https?://.../submit...` 的子串
///
/// 这是一个刻意保留的启发式：包含 `/submit` 路径段的无关 URL
/// 也会命中，层级顺序不可调整。
pub(crate) fn extract_submit_url(html: &str) -> Option<String> {
    let re = Regex::new(r#"https?://[^\s'"<>]+/submit[^\s'"<>]*"#).ok()?;
    re.find(html).map(|m| m.as_str().to_string())
}

/// 过滤出附件链接并绝对化
pub(crate) fn filter_attachment_hrefs(page_url: &str, hrefs: Vec<Option<String>>) -> Vec<String> {
    let mut links = Vec::new();
    for href in hrefs.into_iter().flatten() {
        if href.is_empty() {
            continue;
        }
        let lower = href.to_lowercase();
        if DOWNLOAD_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            links.push(resolve_against(page_url, &href));
        }
    }
    links
}

/// 相对链接绝对化：基准去掉尾部斜杠，相对路径去掉头部斜杠再拼接
pub(crate) fn resolve_against(base: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

/// 把 HTML 压扁成单行文本（正文提取失败时的回退路径）
pub(crate) fn collapse_whitespace(html: &str) -> String {
    match Regex::new(r"\s+") {
        Ok(re) => re.replace_all(html, " ").into_owned(),
        Err(_) => html.to_string(),
    }
}
