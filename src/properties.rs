//! .properties 行处理模块
//!
//! 此模块负责：
//! - 将文件内容拆分为按行号索引的 `PropertiesLine`
//! - 识别可翻译的 `key=value` 行
//! - 按批次大小切分可翻译条目
//! - 根据翻译结果重组输出行

use std::collections::BTreeMap;

use crate::api_constants::file_config::COMMENT_PREFIX;
use crate::unicode::escape_non_ascii;

/// 文件中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesLine {
    /// 行号（从0开始）
    pub index: usize,
    /// 原始行内容（不含换行符）
    pub raw_text: String,
    /// 可翻译行的键值对
    pub entry: Option<Entry>,
}

/// 可翻译的键值对，均已去除首尾空白
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl PropertiesLine {
    /// 解析单行
    pub fn parse(index: usize, raw_text: &str) -> Self {
        Self {
            index,
            raw_text: raw_text.to_string(),
            entry: split_entry(raw_text),
        }
    }

    pub fn is_translatable(&self) -> bool {
        self.entry.is_some()
    }
}

/// 在第一个 `=` 处拆分键值，空行、注释、无值的行返回 `None`
pub fn split_entry(line: &str) -> Option<Entry> {
    let stripped = line.trim();
    if stripped.is_empty() || stripped.starts_with(COMMENT_PREFIX) {
        return None;
    }

    let (key, value) = stripped.split_once('=')?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    Some(Entry {
        key: key.trim().to_string(),
        value: value.to_string(),
    })
}

/// 解析后的 .properties 文档
#[derive(Debug, Clone, Default)]
pub struct PropertiesDocument {
    lines: Vec<PropertiesLine>,
    trailing_newline: bool,
}

impl PropertiesDocument {
    /// 按行解析文件内容，`\r\n` 与 `\n` 均视为换行
    pub fn parse(content: &str) -> Self {
        let lines = content
            .lines()
            .enumerate()
            .map(|(index, line)| PropertiesLine::parse(index, line))
            .collect();

        Self {
            lines,
            trailing_newline: content.ends_with('\n'),
        }
    }

    pub fn lines(&self) -> &[PropertiesLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 可翻译行，保持原始顺序
    pub fn translatable(&self) -> impl Iterator<Item = &PropertiesLine> {
        self.lines.iter().filter(|line| line.is_translatable())
    }

    pub fn translatable_count(&self) -> usize {
        self.translatable().count()
    }

    /// 将可翻译行切分为批次
    pub fn batches(&self, batch_size: usize) -> Vec<TranslationBatch> {
        let entries: Vec<&PropertiesLine> = self.translatable().collect();
        entries
            .chunks(batch_size.max(1))
            .enumerate()
            .map(|(number, chunk)| TranslationBatch {
                number: number + 1,
                entries: chunk
                    .iter()
                    .filter_map(|line| {
                        line.entry
                            .as_ref()
                            .map(|entry| (line.index, entry.value.clone()))
                    })
                    .collect(),
            })
            .collect()
    }

    /// 根据翻译结果重组输出内容
    ///
    /// 有翻译结果的行输出 `key=译文`，其余行原样保留；译文中的换行写成 `\n`
    /// 转义，保证输出行数与输入一致。`escape_unicode` 为真时对每一行做非 ASCII 转义。
    pub fn reassemble(&self, translations: &BTreeMap<usize, String>, escape_unicode: bool) -> String {
        let mut output = self
            .lines
            .iter()
            .map(|line| {
                let text = match translations.get(&line.index) {
                    Some(translated) => match line.raw_text.split_once('=') {
                        Some((key, _)) => {
                            format!("{}={}", key.trim(), escape_line_breaks(translated))
                        }
                        None => line.raw_text.clone(),
                    },
                    None => line.raw_text.clone(),
                };
                if escape_unicode {
                    escape_non_ascii(&text)
                } else {
                    text
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        if self.trailing_newline && !self.lines.is_empty() {
            output.push('\n');
        }
        output
    }
}

/// 将换行符写成 `.properties` 转义形式
fn escape_line_breaks(value: &str) -> String {
    value
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// 一次翻译请求的批次，键为行号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationBatch {
    /// 批次序号（从1开始）
    pub number: usize,
    pub entries: BTreeMap<usize, String>,
}

impl TranslationBatch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    /// 序列化为 `{"行号": "原文"}` 形式的 JSON，保留非 ASCII 字符
    pub fn to_json(&self) -> serde_json::Result<String> {
        let payload: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(index, value)| (index.to_string(), serde_json::Value::String(value.clone())))
            .collect();
        serde_json::to_string(&payload)
    }
}
