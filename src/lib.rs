//! # Forvo Audio Fetch
//!
//! 一个用于批量抓取 Forvo 单词发音音频的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `WordPageDriver` - 浏览器能力抽象（导航 / 取页面 / 等待下载按钮 / 点击）
//! - `PageDriver` - 唯一的 page owner，基于 chromiumoxide 实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个单词
//! - `label_extract` - 从页面标题提取 Forvo 规范词形
//! - `DuplicateResolver` - 判断音频文件是否已经下载过
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个单词"的完整抓取流程
//! - `WordCtx` - 上下文封装（第几行 + 单词 + URL）
//! - `FetchFlow` - 状态机编排（导航 → 提取词形 → 查重 → 等待 → 点击 → 复查）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/run_processor` - 整个批次的处理器，管理浏览器资源、
//!   按输入顺序逐行处理并写出结果表格
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod delay;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use delay::JitterDelay;
pub use error::{AppError, AppResult};
pub use infrastructure::{PageDriver, WordPageDriver};
pub use models::{WorkItem, WorkList};
pub use orchestrator::App;
pub use services::DuplicateResolver;
pub use workflow::{FetchFlow, FetchOutcome, WordCtx};
