//! 单词页面驱动 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露流程层需要的四个能力：
//! 导航、取页面 HTML、等待下载按钮、点击下载按钮。
//! 不认识 WorkItem / FetchOutcome，不处理业务流程。

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::Page;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::AppError;

/// Forvo 页面上下载按钮的选择器
const DOWNLOAD_SELECTOR: &str = ".download";

/// 轮询下载按钮的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 浏览器能力抽象
///
/// 流程层只通过这个 trait 操作浏览器，方便在测试里替换成假实现
#[async_trait]
pub trait WordPageDriver: Send + Sync {
    /// 在共享会话里打开单词页面
    async fn navigate(&self, url: &str) -> Result<()>;

    /// 当前页面的完整 HTML
    async fn page_html(&self) -> Result<String>;

    /// 等待下载按钮出现并可点击，返回是否在超时前等到
    async fn wait_for_download_control(&self, timeout: Duration) -> Result<bool>;

    /// 点击下载按钮
    async fn click_download(&self) -> Result<()>;
}

/// 基于 chromiumoxide 的驱动实现
///
/// 职责：
/// - 持有唯一的 Page 资源（整个批次共用一个已登录会话）
/// - 把 CDP 细节挡在流程层外面
pub struct PageDriver {
    page: Page,
}

impl PageDriver {
    /// 创建新的页面驱动
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于登录等启动期操作）
    pub fn page(&self) -> &Page {
        &self.page
    }
}

#[async_trait]
impl WordPageDriver for PageDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::navigation_failed(url, e))?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    async fn page_html(&self) -> Result<String> {
        let html = self.page.content().await?;
        Ok(html)
    }

    async fn wait_for_download_control(&self, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.page.find_element(DOWNLOAD_SELECTOR).await.is_ok() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                debug!("等待 {} 超时 ({:?})", DOWNLOAD_SELECTOR, timeout);
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click_download(&self) -> Result<()> {
        let element = self.page.find_element(DOWNLOAD_SELECTOR).await?;
        element.click().await?;
        Ok(())
    }
}
