//! 求解编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块是单次求解的入口，负责浏览器资源的完整生命周期。
//!
//! ## 核心功能
//!
//! 1. **资源获取**：每次求解启动独立的无头浏览器（隔离会话）
//! 2. **流程委托**：构建 SolveCtx / SolveFlow 并运行
//! 3. **资源释放**：无论流程如何退出都关闭浏览器、回收事件任务
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有 Browser 的模块
//! - **无业务逻辑**：只做生命周期管理，不做求解判断
//! - **并发隔离**：并发调用 solve 时各自拥有独立的浏览器进程

use anyhow::Result;
use tracing::{info, warn};

use crate::browser::launch_headless_browser;
use crate::config::Config;
use crate::infrastructure::JsExecutor;
use crate::models::{SolveRequest, SolveResult};
use crate::workflow::{SolveCtx, SolveFlow};

/// 求解编排器
pub struct Solver {
    config: Config,
}

impl Solver {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 求解单个 URL
    ///
    /// 流程内部不抛错（所有阶段都降级），能到达这里的 Err 只有
    /// 浏览器拉起失败之类的环境问题。
    pub async fn solve(&self, request: &SolveRequest) -> Result<SolveResult> {
        info!("{}", "=".repeat(60));
        info!("🚀 开始求解: {}", request.url);
        info!(
            "开始时间: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        info!("{}", "=".repeat(60));

        let (mut browser, page, handler_task) =
            launch_headless_browser(self.config.chrome_executable.as_deref()).await?;
        let executor = JsExecutor::new(page);

        let ctx = SolveCtx::new(&request.url, &self.config);
        let flow = SolveFlow::new(&self.config);

        // 流程永不失败，资源释放不依赖流程结果
        let result = flow.run(&executor, &ctx).await;

        // 释放浏览器资源（所有退出路径都会走到这里）
        if let Err(e) = browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        handler_task.abort();
        let _ = handler_task.await;

        Ok(result)
    }
}
