//! 批次处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一整个批次的抓取和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、启动浏览器、配置下载目录、登录（只做一次）
//! 2. **加载工作表**：读入 CSV 工作列表（`WorkList`）
//! 3. **顺序处理**：严格按输入顺序逐行处理，单会话内不允许并发导航
//! 4. **结果累积**：每行恰好一个结果，位置与输入行对齐
//! 5. **一次性落盘**：全部处理完后把追加了音频路径列的表写出去
//! 6. **资源管理**：唯一持有 Browser，退出路径上保证关闭
//!
//! ## 设计特点
//!
//! - **单会话顺序执行**：同一个浏览器页面里并发导航会互相踩页面状态，
//!   所以这里刻意不做并发
//! - **幂等重跑**：已下载的音频由查重服务直接命中，重跑整个批次得到相同结果
//! - **向下委托**：单个单词的细节交给 workflow 层的 FetchFlow

use anyhow::Result;
use chromiumoxide::Browser;
use std::fs;
use tracing::{debug, error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::WorkList;
use crate::workflow::{FetchFlow, FetchOutcome, WordCtx};

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    driver: PageDriver,
}

impl App {
    /// 初始化应用：浏览器 + 下载目录 + 登录
    ///
    /// 登录失败对整个批次是致命的，但浏览器仍然会被关掉
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config)?;

        log_startup(&config);

        // 下载目录不存在就先建出来
        fs::create_dir_all(&config.download_directory)?;

        // 启动浏览器
        let (mut browser, page) = browser::launch_browser(&config).await?;

        // 配置下载目录 + 登录，任何一步失败都要先收回浏览器
        let setup = async {
            browser::set_download_directory(&page, &config.download_directory).await?;
            browser::login(&page, &config).await?;
            Ok::<(), anyhow::Error>(())
        }
        .await;

        if let Err(e) = setup {
            error!("❌ 启动期失败，正在关闭浏览器: {}", e);
            let _ = browser.close().await;
            let _ = browser.wait().await;
            return Err(e);
        }

        Ok(Self {
            config,
            browser,
            driver: PageDriver::new(page),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载工作表
        let work_list = WorkList::load(&self.config.csv_path)?;

        // 空表也要走完整条流程：输出文件（只有表头 + 新列）照样要写出来
        if work_list.is_empty() {
            warn!("⚠️ 工作表是空的，只会写出表头");
        }

        let total = work_list.len();
        log_work_loaded(total, &self.config);

        // 顺序处理所有单词
        let stats = self.process_all_words(&work_list).await?;

        // 输出最终统计
        print_final_stats(&stats, &self.config);

        Ok(())
    }

    /// 按输入顺序处理所有单词并写出结果表
    async fn process_all_words(&self, work_list: &WorkList) -> Result<FetchStats> {
        let flow = FetchFlow::new(&self.config)?;
        let total = work_list.len();

        let mut stats = FetchStats {
            total,
            ..Default::default()
        };
        let mut audio_paths = Vec::with_capacity(total);

        for (index, item) in work_list.items().into_iter().enumerate() {
            let ctx = WordCtx::new(index + 1, item.word, item.forvo_url);
            log_word_start(&ctx, total);

            // 可恢复的条件（超时、下载缺失、提取失败）在流程层内部消化；
            // 这里兜底剩下的驱动错误，同样只影响当前行
            let outcome = match flow.run(&self.driver, &ctx).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("{} ❌ 处理过程中发生错误: {}", ctx, e);
                    FetchOutcome::Missing
                }
            };

            match &outcome {
                FetchOutcome::Found(_) => stats.found += 1,
                FetchOutcome::Missing => stats.missing += 1,
            }
            audio_paths.push(outcome.into_path_string());
        }

        // 全部跑完才落盘，半途崩溃不会留下半个输出文件
        work_list.save_with_audio(&audio_paths)?;

        Ok(stats)
    }

    /// 关闭浏览器
    pub async fn shutdown(mut self) {
        info!("🛑 正在关闭浏览器...");
        if let Err(e) = self.browser.close().await {
            debug!("关闭浏览器时出错: {}", e);
        }
        let _ = self.browser.wait().await;
    }
}

/// 批次统计
#[derive(Debug, Default)]
struct FetchStats {
    found: usize,
    missing: usize,
    total: usize,
}

// ========== 日志辅助函数 ==========

fn init_log_file(config: &Config) -> Result<()> {
    let log_header = format!(
        "{}\nForvo 发音抓取日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(&config.output_log_file, log_header)?;
    Ok(())
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - Forvo 发音抓取模式");
    info!("📋 工作表: {}", config.csv_path);
    info!("📂 下载目录: {}", config.download_directory);
    info!("{}", "=".repeat(60));
}

fn log_work_loaded(total: usize, config: &Config) {
    info!("✓ 找到 {} 个待处理的单词", total);
    info!(
        "💡 单会话顺序处理，下载按钮最多等 {} 秒\n",
        config.audio_element_wait_secs
    );
}

fn log_word_start(ctx: &WordCtx, total: usize) {
    info!("\n{}", "─".repeat(30));
    info!("{} 处理第 {}/{} 个单词", ctx, ctx.row_index, total);
}

fn print_final_stats(stats: &FetchStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 拿到音频: {}/{}", stats.found, stats.total);
    info!("❌ 缺失: {}", stats.missing);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
}
