//! 工作列表 - 表格数据模型
//!
//! 输入是一张至少包含 `Word` 和 `Forvo URL` 两列的 CSV 表，一行一个单词，
//! 行顺序就是处理顺序。输出是同一张表追加一列 `Audio Path`，
//! 写到"原文件名 + With Audio"的新文件里。
//!
//! 为了让输入表里我们不认识的列原样通过，这里按 StringRecord 整行保留，
//! 不做结构化反序列化。

use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use csv::StringRecord;
use tracing::info;

use crate::error::{AppError, FileError};

/// 单词列的列名
pub const WORD_COLUMN: &str = "Word";
/// 页面 URL 列的列名
pub const URL_COLUMN: &str = "Forvo URL";
/// 输出时追加的音频路径列名
pub const AUDIO_COLUMN: &str = "Audio Path";

/// 输出文件名后缀（插在扩展名之前）
const OUTPUT_SUFFIX: &str = " With Audio";

/// 一个待抓取的单词：去掉首尾空白的词 + 对应的 Forvo 页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub word: String,
    pub forvo_url: String,
}

/// 整张工作表
///
/// 持有原始表头和所有原始行，保证输出时行数、顺序、未知列全部不变
#[derive(Debug, Clone)]
pub struct WorkList {
    source_path: PathBuf,
    headers: StringRecord,
    records: Vec<StringRecord>,
    word_idx: usize,
    url_idx: usize,
}

impl WorkList {
    /// 从 CSV 文件加载工作列表
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| AppError::csv_parse_failed(path.display().to_string(), e))?;

        let headers = reader
            .headers()
            .map_err(|e| AppError::csv_parse_failed(path.display().to_string(), e))?
            .clone();
        let word_idx = find_column(&headers, WORD_COLUMN, path)?;
        let url_idx = find_column(&headers, URL_COLUMN, path)?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| AppError::csv_parse_failed(path.display().to_string(), e))?;
            records.push(record);
        }

        info!("✓ 加载了 {} 个待处理的单词", records.len());

        Ok(Self {
            source_path: path.to_path_buf(),
            headers,
            records,
            word_idx,
            url_idx,
        })
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否为空表
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 按输入顺序取出所有待抓取的单词
    pub fn items(&self) -> Vec<WorkItem> {
        self.records
            .iter()
            .map(|record| WorkItem {
                word: record.get(self.word_idx).unwrap_or("").trim().to_string(),
                forvo_url: record.get(self.url_idx).unwrap_or("").to_string(),
            })
            .collect()
    }

    /// 输出文件路径：原文件名 + " With Audio"，扩展名不变
    pub fn output_path(&self) -> PathBuf {
        let stem = self
            .source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .source_path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "csv".to_string());

        self.source_path
            .with_file_name(format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext))
    }

    /// 把原表 + 音频路径列写到输出文件
    ///
    /// `audio_paths` 必须与行数一一对应（缺失的条目是空字符串）
    pub fn save_with_audio(&self, audio_paths: &[String]) -> Result<PathBuf> {
        ensure!(
            audio_paths.len() == self.records.len(),
            "音频路径数量 {} 与表格行数 {} 不一致",
            audio_paths.len(),
            self.records.len()
        );

        let output_path = self.output_path();
        let mut writer = csv::Writer::from_path(&output_path)
            .map_err(|e| AppError::file_write_failed(output_path.display().to_string(), e))?;

        let mut out_headers = self.headers.clone();
        out_headers.push_field(AUDIO_COLUMN);
        writer.write_record(&out_headers)?;

        for (record, audio_path) in self.records.iter().zip(audio_paths) {
            let mut row = record.clone();
            row.push_field(audio_path);
            writer.write_record(&row)?;
        }
        writer.flush()?;

        info!("✓ 结果已写入: {}", output_path.display());
        Ok(output_path)
    }
}

/// 在表头里定位必需的列
fn find_column(headers: &StringRecord, column: &str, path: &Path) -> Result<usize> {
    headers.iter().position(|h| h == column).ok_or_else(|| {
        AppError::File(FileError::MissingColumn {
            column: column.to_string(),
            path: path.display().to_string(),
        })
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_test_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "forvo_worklist_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_sample_csv(dir: &Path) -> PathBuf {
        let path = dir.join("words.csv");
        fs::write(
            &path,
            "Word,Forvo URL,Notes\n\
             λόγος ,https://example/word/logos,greek\n\
             kairos,https://example/word/kairos,timing\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_load_preserves_order_and_trims_word() {
        let dir = make_test_dir("load");
        let path = write_sample_csv(&dir);

        let list = WorkList::load(&path).unwrap();
        assert_eq!(list.len(), 2);

        let items = list.items();
        assert_eq!(items[0].word, "λόγος");
        assert_eq!(items[0].forvo_url, "https://example/word/logos");
        assert_eq!(items[1].word, "kairos");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_rejects_missing_column() {
        let dir = make_test_dir("missing");
        let path = dir.join("bad.csv");
        fs::write(&path, "Word,Link\nlogos,https://example\n").unwrap();

        let err = WorkList::load(&path).unwrap_err();
        assert!(err.to_string().contains("Forvo URL"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_reports_malformed_csv_with_path() {
        let dir = make_test_dir("malformed");
        let path = dir.join("broken.csv");
        // 第二行比表头多一个字段
        fs::write(
            &path,
            "Word,Forvo URL\nlogos,https://example,extra,field\n",
        )
        .unwrap();

        let err = WorkList::load(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("CSV解析失败"), "意外的错误信息: {}", msg);
        assert!(msg.contains("broken.csv"), "错误信息应带上文件路径: {}", msg);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_output_path_inserts_suffix_before_extension() {
        let dir = make_test_dir("suffix");
        let path = write_sample_csv(&dir);

        let list = WorkList::load(&path).unwrap();
        assert_eq!(list.output_path(), dir.join("words With Audio.csv"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_appends_audio_column_and_keeps_rows() {
        let dir = make_test_dir("save");
        let path = write_sample_csv(&dir);

        let list = WorkList::load(&path).unwrap();
        let paths = vec!["/dl/pronunciation_1_logos.mp3".to_string(), String::new()];
        let output = list.save_with_audio(&paths).unwrap();

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["Word", "Forvo URL", "Notes", "Audio Path"]
        );

        let rows: Vec<StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        // 原始列原样通过，包括词列的首尾空白
        assert_eq!(rows[0].get(0), Some("λόγος "));
        assert_eq!(rows[0].get(2), Some("greek"));
        assert_eq!(rows[0].get(3), Some("/dl/pronunciation_1_logos.mp3"));
        assert_eq!(rows[1].get(3), Some(""));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_empty_table_still_writes_output() {
        let dir = make_test_dir("empty");
        let path = dir.join("words.csv");
        fs::write(&path, "Word,Forvo URL\n").unwrap();

        let list = WorkList::load(&path).unwrap();
        assert!(list.is_empty());

        // 零行也必须落盘：输出文件存在，表头带上新列
        let output = list.save_with_audio(&[]).unwrap();
        assert!(output.exists());

        let mut reader = csv::Reader::from_path(&output).unwrap();
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            vec!["Word", "Forvo URL", "Audio Path"]
        );
        assert_eq!(reader.records().count(), 0);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_rejects_length_mismatch() {
        let dir = make_test_dir("mismatch");
        let path = write_sample_csv(&dir);

        let list = WorkList::load(&path).unwrap();
        assert!(list.save_with_audio(&["one".to_string()]).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
