//! 音频查重 - 业务能力层
//!
//! 下载是否成功，唯一可观察的信号就是文件系统。
//! 本模块在下载目录里按固定的文件名形状
//! `pronunciation_*_{规范词形}.mp3` 查找已有音频：
//! - 下载前调用：命中则跳过等待和点击
//! - 点击后调用：发现刚刚落盘的文件

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::delay::JitterDelay;

/// 下载文件名的固定前缀（完整形状：`pronunciation_*_{词形}.mp3`）
const FILE_PREFIX: &str = "pronunciation_";

/// 音频查重服务
///
/// 职责：
/// - 只认识"下载目录 + 规范词形 → 文件路径"这一件事
/// - 目录枚举顺序由文件系统决定，多个候选时取第一个
/// - 不持有浏览器资源，不关心流程顺序
#[derive(Debug, Clone)]
pub struct DuplicateResolver {
    download_dir: PathBuf,
}

impl DuplicateResolver {
    /// 创建新的查重服务
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
        }
    }

    /// 下载目录
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// 查找词形对应的已有音频文件
    ///
    /// 目录读不到（不存在、无权限）一律视为没有音频
    pub fn resolve(&self, canonical_label: &str) -> Option<PathBuf> {
        let suffix = format!("_{}.mp3", canonical_label);

        let entries = std::fs::read_dir(&self.download_dir).ok()?;
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            // 长度下限保证前缀和后缀各占各的，"pronunciation_logos.mp3" 这种
            // 两头重叠的名字不算命中
            if name.len() >= FILE_PREFIX.len() + suffix.len()
                && name.starts_with(FILE_PREFIX)
                && name.ends_with(&suffix)
            {
                debug!("查重命中: {} -> {}", canonical_label, name);
                return Some(entry.path());
            }
        }
        None
    }

    /// 带重试的查找
    ///
    /// 浏览器端的下载是异步完成的，没有完成回调；
    /// 这里用"抖动间隔 + 有界次数"的轮询代替单次固定等待，降低网络波动下的漏检
    pub async fn resolve_with_retry(
        &self,
        canonical_label: &str,
        attempts: usize,
        delay: &JitterDelay,
    ) -> Option<PathBuf> {
        for attempt in 1..=attempts.max(1) {
            if let Some(path) = self.resolve(canonical_label) {
                return Some(path);
            }
            if attempt < attempts {
                debug!(
                    "第 {}/{} 次轮询未发现音频: {}",
                    attempt, attempts, canonical_label
                );
                delay.pause().await;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// 在系统临时目录下建一个独立的测试目录
    fn make_test_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "forvo_resolver_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_resolve_finds_matching_file() {
        let dir = make_test_dir("hit");
        let file = dir.join("pronunciation_1_logos.mp3");
        fs::write(&file, b"mp3").unwrap();

        let resolver = DuplicateResolver::new(&dir);
        assert_eq!(resolver.resolve("logos"), Some(file));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_resolve_requires_exact_label_suffix() {
        let dir = make_test_dir("suffix");
        fs::write(dir.join("pronunciation_1_logos2.mp3"), b"mp3").unwrap();
        fs::write(dir.join("pronunciation_1_logos.ogg"), b"ogg").unwrap();
        fs::write(dir.join("other_1_logos.mp3"), b"mp3").unwrap();

        let resolver = DuplicateResolver::new(&dir);
        assert_eq!(resolver.resolve("logos"), None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_resolve_rejects_overlapping_markers() {
        let dir = make_test_dir("overlap");
        // 缺少中间段：前缀的 "_" 和后缀的 "_" 是同一个字符
        fs::write(dir.join("pronunciation_logos.mp3"), b"mp3").unwrap();

        let resolver = DuplicateResolver::new(&dir);
        assert_eq!(resolver.resolve("logos"), None);

        // 中间段为空但两个 "_" 都在，仍然符合文件名形状
        let ok = dir.join("pronunciation__logos.mp3");
        fs::write(&ok, b"mp3").unwrap();
        assert_eq!(resolver.resolve("logos"), Some(ok));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_resolve_missing_directory_is_none() {
        let resolver = DuplicateResolver::new("/nonexistent/forvo_test_dir");
        assert_eq!(resolver.resolve("logos"), None);
    }

    #[test]
    fn test_resolve_any_numbering_between_markers() {
        let dir = make_test_dir("glob");
        let file = dir.join("pronunciation_48120391_logos.mp3");
        fs::write(&file, b"mp3").unwrap();

        let resolver = DuplicateResolver::new(&dir);
        assert_eq!(resolver.resolve("logos"), Some(file));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_resolve_with_retry_sees_late_file() {
        let dir = make_test_dir("retry");
        let file = dir.join("pronunciation_1_logos.mp3");

        // 模拟浏览器稍后才落盘
        let file_clone = file.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(30)).await;
            fs::write(&file_clone, b"mp3").unwrap();
        });

        let resolver = DuplicateResolver::new(&dir);
        let delay = JitterDelay::new(0.02, 0.005, 0.01, 0.05).unwrap();
        let found = resolver.resolve_with_retry("logos", 10, &delay).await;
        assert_eq!(found, Some(file));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_resolve_with_retry_gives_up() {
        let dir = make_test_dir("giveup");

        let resolver = DuplicateResolver::new(&dir);
        let delay = JitterDelay::new(0.02, 0.005, 0.01, 0.05).unwrap();
        assert_eq!(resolver.resolve_with_retry("logos", 3, &delay).await, None);

        fs::remove_dir_all(&dir).unwrap();
    }
}
