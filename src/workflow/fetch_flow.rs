//! 单词抓取流程 - 流程层
//!
//! 核心职责：定义"一个单词"的完整抓取流程：
//!
//! 1. 导航到单词页面
//! 2. 从页面标题提取 Forvo 规范词形
//! 3. 查重：已有音频 → 直接返回已有路径，不等待不点击
//! 4. 没有音频 → 抖动延迟 → 有界等待下载按钮 → 抖动延迟 → 点击
//!    → 抖动延迟 → 带重试地复查文件系统
//!
//! 每个终止分支都产出一个完整的 FetchOutcome；
//! 词形提取失败、等待超时、点击后文件未出现都只影响当前单词（Missing），
//! 不会中断整个批次。

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::delay::JitterDelay;
use crate::infrastructure::WordPageDriver;
use crate::services::{canonical_label, DuplicateResolver};
use crate::workflow::word_ctx::WordCtx;

/// 单词抓取结果
///
/// 每个输入行恰好对应一个结果，顺序与输入一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 拿到了音频文件（预先存在或刚下载的）
    Found(PathBuf),
    /// 没拿到（提取失败 / 等待超时 / 点击后文件未出现）
    Missing,
}

impl FetchOutcome {
    /// 转成输出表格里的路径字符串（Missing 为空串）
    pub fn into_path_string(self) -> String {
        match self {
            FetchOutcome::Found(path) => path.to_string_lossy().into_owned(),
            FetchOutcome::Missing => String::new(),
        }
    }
}

/// 单词抓取流程
///
/// - 编排完整的单词抓取状态机
/// - 决定何时等待、何时点击、何时放弃
/// - 不持有浏览器资源，只依赖 WordPageDriver 能力
/// - 每次调用之间无状态（共享的只有会话和延迟源）
pub struct FetchFlow {
    resolver: DuplicateResolver,
    delay: JitterDelay,
    affordance_wait: Duration,
    post_click_attempts: usize,
}

impl FetchFlow {
    /// 创建新的抓取流程
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            resolver: DuplicateResolver::new(config.download_directory.clone()),
            delay: JitterDelay::new(
                config.delay_mean,
                config.delay_sd,
                config.delay_low,
                config.delay_upp,
            )?,
            affordance_wait: Duration::from_secs(config.audio_element_wait_secs),
            post_click_attempts: config.post_click_poll_attempts,
        })
    }

    /// 跑完一个单词的完整流程
    pub async fn run(&self, driver: &dyn WordPageDriver, ctx: &WordCtx) -> Result<FetchOutcome> {
        // ========== 状态 1: 导航 ==========
        info!("{} 正在打开 {} ...", ctx, ctx.forvo_url);
        driver.navigate(&ctx.forvo_url).await?;

        // ========== 状态 2: 提取规范词形 ==========
        let html = driver.page_html().await?;
        let Some(label) = canonical_label(&html) else {
            // 单个页面格式不对只影响这一行，继续处理后面的单词
            warn!("{} ⚠️ 页面上找不到 \"Translation of\" 标题，标记为缺失", ctx);
            return Ok(FetchOutcome::Missing);
        };

        // ========== 状态 3: 查重分支 ==========
        if let Some(existing) = self.resolver.resolve(&label) {
            info!("{} ⏭️ 音频已存在，跳过下载: {}", ctx, existing.display());
            return Ok(FetchOutcome::Found(existing));
        }

        // ========== 状态 4: 等待下载按钮 ==========
        // 别太急，伪装成人
        self.delay.pause().await;

        if !driver.wait_for_download_control(self.affordance_wait).await? {
            warn!("{} ⚠️ 等待下载按钮超时，跳过", ctx);
            return Ok(FetchOutcome::Missing);
        }

        // ========== 状态 5: 点击并复查 ==========
        self.delay.pause().await;
        driver.click_download().await?;
        self.delay.pause().await;

        // 下载在浏览器侧异步完成，只能靠轮询文件系统来确认
        match self
            .resolver
            .resolve_with_retry(&label, self.post_click_attempts, &self.delay)
            .await
        {
            Some(path) => {
                info!("{} ✓ 音频已下载: {}", ctx, path.display());
                Ok(FetchOutcome::Found(path))
            }
            None => {
                warn!("{} ⚠️ 点击后未发现音频文件，标记为缺失", ctx);
                Ok(FetchOutcome::Missing)
            }
        }
    }
}
