use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 启动无头浏览器并打开一个空白页面
///
/// 每次调用都是全新的浏览器进程与独立的用户目录：不同求解之间
/// 不共享任何 cookie / 会话状态。导航本身由上层控制（带超时），
/// 这里只负责把浏览器拉起来。
///
/// 返回的 JoinHandle 是后台事件处理任务，浏览器关闭后由调用方回收。
pub async fn launch_headless_browser(
    chrome_executable: Option<&str>,
) -> Result<(Browser, Page, JoinHandle<()>)> {
    info!("🚀 启动无头浏览器...");

    // 配置无头浏览器
    let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
        "--disable-gpu",             // 无头模式禁用 GPU
        "--no-sandbox",              // 禁用沙盒，防止权限问题导致的崩溃
        "--disable-dev-shm-usage",   // 防止共享内存不足
        "--remote-debugging-port=0", // 让浏览器自动选择端口
    ]);
    if let Some(path) = chrome_executable {
        debug!("使用指定的浏览器: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }
    let config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        anyhow::anyhow!("配置无头浏览器失败: {}", e)
    })?;

    // 启动浏览器
    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        anyhow::anyhow!("启动无头浏览器失败: {}", e)
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    // 创建空白页面，真正的导航带超时在导航服务中进行
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        anyhow::anyhow!("创建页面失败: {}", e)
    })?;

    Ok((browser, page, handler_task))
}
