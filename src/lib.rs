//! # Quiz Solver
//!
//! 一个用于自动求解网页测验的 Rust 应用程序：导航到目标页面，
//! 收集证据（可见正文 + 附件文件），交给 LLM 计算答案，
//! 并尽力把答案提交回页面上发现的提交端点。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 无头浏览器的启动与事件处理
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理一次求解中的单个环节
//! - `PageNavigator` - 页面导航与内容收集能力
//! - `AttachmentFetcher` - 附件下载能力
//! - `EvidenceExtractor` - 附件解码能力（永不失败）
//! - `PromptBuilder` / `LlmGateway` / `AnswerExtractor` - LLM 问答能力
//! - `SubmissionDispatcher` - 答案提交能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个 URL"的完整求解流程
//! - `SolveCtx` - 上下文封装（请求 URL + 身份 + 截止时间）
//! - `SolveFlow` - 流程编排（导航 → 收集 → LLM → 提取 → 提交）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 浏览器生命周期管理，单次求解入口
//!
//! ## 降级原则
//!
//! 流程没有失败状态：每个阶段独立捕获自己的错误并写入
//! `SolveResult.log`，然后无条件推进到下一个阶段。
//! 终态一定产出 `solved = true` 的结果，即使所有子阶段都降级了。

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::launch_headless_browser;
pub use config::Config;
pub use error::StageError;
pub use infrastructure::JsExecutor;
pub use models::{AnswerValue, EvidenceBundle, SolveRequest, SolveResult};
pub use orchestrator::Solver;
pub use workflow::{SolveCtx, SolveFlow};
