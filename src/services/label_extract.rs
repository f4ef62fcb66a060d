//! 规范词形提取 - 业务能力层
//!
//! Forvo 页面标题里的词形是站点自己的规范写法，可能和我们搜索的词不一致。
//! 这里只做纯字符串提取：拿到词形返回 Some，拿不到返回 None，不抛错误，
//! 让流程层的分支逻辑保持完整。

use regex::Regex;
use scraper::{Html, Selector};

/// 从整页 HTML 中提取 Forvo 规范词形
///
/// 取第一个 `<h2>` 的文本，按固定模式 "Translation of X" 匹配（忽略大小写）
pub fn canonical_label(html: &str) -> Option<String> {
    let heading = first_heading(html)?;
    label_from_heading(&heading)
}

/// 取第一个 `<h2>` 的纯文本
fn first_heading(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("h2").ok()?;
    let element = document.select(&selector).next()?;
    Some(element.text().collect::<String>())
}

/// 从标题文本中匹配 "Translation of X"
fn label_from_heading(heading: &str) -> Option<String> {
    let pattern = Regex::new(r"(?i)translation of (.+)").ok()?;
    let captures = pattern.captures(heading)?;
    let label = captures.get(1)?.as_str().trim();

    if label.is_empty() {
        return None;
    }
    Some(label.to_string())
}
