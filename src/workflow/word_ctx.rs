//! 单词处理上下文
//!
//! 封装"我正在处理第几行的哪个单词"这一信息

use std::fmt::Display;

/// 单词处理上下文
#[derive(Debug, Clone)]
pub struct WordCtx {
    /// 行号（从1开始，仅用于日志显示）
    pub row_index: usize,

    /// 输入表里的单词（已去掉首尾空白）
    pub word: String,

    /// 单词对应的 Forvo 页面 URL
    pub forvo_url: String,
}

impl WordCtx {
    /// 创建新的单词上下文
    pub fn new(row_index: usize, word: String, forvo_url: String) -> Self {
        Self {
            row_index,
            word,
            forvo_url,
        }
    }
}

impl Display for WordCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[单词 {}: {}]", self.row_index, self.word)
    }
}
