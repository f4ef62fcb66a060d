//! 浏览器启动
//!
//! 启动一个浏览器实例并配置下载目录。
//! 整个批次只用这一个实例、一个页面，所有导航共享同一份登录态。

use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{AppError, BrowserError};

/// 启动浏览器并创建空白页面
pub async fn launch_browser(config: &Config) -> Result<(Browser, Page)> {
    info!("🚀 正在启动浏览器...");
    debug!("无头模式: {}", config.headless);

    let mut builder = BrowserConfig::builder().args(vec![
        "--disable-gpu",
        "--no-sandbox",
        "--disable-dev-shm-usage",
        "--remote-debugging-port=0",
    ]);
    if config.headless {
        builder = builder.new_headless_mode();
    } else {
        builder = builder.with_head();
    }

    let browser_config = builder.build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        anyhow::anyhow!("配置浏览器失败: {}", e)
    })?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::Browser(BrowserError::LaunchFailed {
            source: Box::new(e),
        })
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        AppError::Browser(BrowserError::PageCreationFailed {
            source: Box::new(e),
        })
    })?;

    info!("✅ 浏览器已就绪");
    Ok((browser, page))
}

/// 让浏览器把下载写进指定目录
///
/// 对应原生的 Browser.setDownloadBehavior CDP 命令
pub async fn set_download_directory(page: &Page, download_dir: &str) -> Result<()> {
    debug!("配置下载目录: {}", download_dir);

    let params = SetDownloadBehaviorParams::builder()
        .behavior(SetDownloadBehaviorBehavior::Allow)
        .download_path(download_dir)
        .build()
        .map_err(|message| AppError::Browser(BrowserError::DownloadBehaviorFailed { message }))?;

    page.execute(params).await?;

    info!("✓ 下载目录已配置: {}", download_dir);
    Ok(())
}
