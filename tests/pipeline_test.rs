use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use i18n_props::config::PropsConfig;
use i18n_props::error::{Result, TranslationError};
use i18n_props::pipeline::PropsPipeline;
use i18n_props::properties::TranslationBatch;
use i18n_props::retry::RetryConfig;
use i18n_props::stats::LanguageStatus;
use i18n_props::translator::BatchTranslator;

const SOURCE: &str = "\
# 应用程序文字
app.title = 我的应用

app.greeting=你好，{0}
app.empty=
url = https://example.com/?a=b
   # 缩进的注释 = 不翻译
app.farewell=再见
";

/// 按批次序号返回预设结果的翻译器
///
/// 译文格式为 `[语言] 原文`；`fail_batches` 中的批次返回错误，
/// `flaky_batches` 中的批次第一次调用失败、之后成功。
#[derive(Default)]
struct ScriptedTranslator {
    fail_batches: Vec<(String, usize)>,
    flaky_batches: Vec<usize>,
    calls: RefCell<HashMap<usize, usize>>,
}

impl ScriptedTranslator {
    fn calls_for(&self, batch: usize) -> usize {
        self.calls.borrow().get(&batch).copied().unwrap_or(0)
    }
}

impl BatchTranslator for ScriptedTranslator {
    async fn translate_batch(
        &self,
        batch: &TranslationBatch,
        language: &str,
    ) -> Result<BTreeMap<usize, String>> {
        let attempt = {
            let mut calls = self.calls.borrow_mut();
            let count = calls.entry(batch.number).or_insert(0);
            *count += 1;
            *count
        };

        if self
            .fail_batches
            .iter()
            .any(|(lang, n)| lang == language && *n == batch.number)
        {
            return Err(TranslationError::ResponseParse {
                details: "expected value at line 1 column 1".to_string(),
                raw: "I'm sorry, I can't do that.".to_string(),
            });
        }

        if self.flaky_batches.contains(&batch.number) && attempt == 1 {
            return Err(TranslationError::Network {
                message: "connection reset".to_string(),
                status_code: None,
            });
        }

        Ok(batch
            .entries
            .iter()
            .map(|(index, value)| (*index, format!("  [{}] {}  ", language, value)))
            .collect())
    }
}

/// 每个值都译成两行文字
struct MultilineTranslator;

impl BatchTranslator for MultilineTranslator {
    async fn translate_batch(
        &self,
        batch: &TranslationBatch,
        _language: &str,
    ) -> Result<BTreeMap<usize, String>> {
        Ok(batch
            .entries
            .keys()
            .map(|index| (*index, "Line one\nLine two".to_string()))
            .collect())
    }
}

/// 翻译期间把输出文件替换成同名目录，使清空成功后的写入失败
struct BlockingTranslator {
    language: &'static str,
    blocked: PathBuf,
}

impl BatchTranslator for BlockingTranslator {
    async fn translate_batch(
        &self,
        batch: &TranslationBatch,
        language: &str,
    ) -> Result<BTreeMap<usize, String>> {
        if language == self.language && self.blocked.is_file() {
            fs::remove_file(&self.blocked).unwrap();
            fs::create_dir(&self.blocked).unwrap();
        }
        Ok(batch
            .entries
            .iter()
            .map(|(index, value)| (*index, format!("[{}] {}", language, value)))
            .collect())
    }
}

fn write_source(dir: &Path) -> PathBuf {
    let path = dir.join("messages.properties");
    fs::write(&path, SOURCE).unwrap();
    path
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_output_preserves_line_structure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path());
    let config = PropsConfig::new(&input);
    let translator = ScriptedTranslator::default();

    let report = PropsPipeline::new(&translator, &config).run().await.unwrap();
    assert_eq!(report.written(), 2);

    let source_lines: Vec<&str> = SOURCE.lines().collect();
    for lang in ["en", "zh-CN"] {
        let output = read_lines(&dir.path().join(format!("messages_{}.properties", lang)));
        assert_eq!(output.len(), source_lines.len());

        // 空行、注释、空值行保持不变
        for i in [0, 2, 4, 6] {
            assert_eq!(output[i], source_lines[i], "line {} changed", i);
        }

        assert_eq!(output[1], format!("app.title=[{}] 我的应用", lang));
        assert_eq!(output[3], format!("app.greeting=[{}] 你好，{{0}}", lang));
        assert_eq!(output[5], format!("url=[{}] https://example.com/?a=b", lang));
        assert_eq!(output[7], format!("app.farewell=[{}] 再见", lang));
    }

    let en = report.find("en").unwrap();
    assert_eq!(en.total_lines, 8);
    assert_eq!(en.translatable_lines, 4);
    assert_eq!(en.translated_lines, 4);
    assert_eq!(en.batches, 1);
}

#[tokio::test]
async fn test_failed_batch_keeps_original_values() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path());
    let config = PropsConfig::new(&input)
        .with_languages(vec!["en".to_string()])
        .with_batch_size(2);
    let translator = ScriptedTranslator {
        fail_batches: vec![("en".to_string(), 1)],
        ..Default::default()
    };

    let report = PropsPipeline::new(&translator, &config).run().await.unwrap();
    let en = report.find("en").unwrap();
    assert_eq!(en.status, LanguageStatus::Written);
    assert_eq!(en.batches, 2);
    assert_eq!(en.failed_batches, 1);
    assert_eq!(en.translated_lines, 2);

    let output = read_lines(&dir.path().join("messages_en.properties"));
    let source_lines: Vec<&str> = SOURCE.lines().collect();

    // 第一批（第1、3行）保留原文，第二批照常翻译
    assert_eq!(output[1], source_lines[1]);
    assert_eq!(output[3], source_lines[3]);
    assert_eq!(output[5], "url=[en] https://example.com/?a=b");
    assert_eq!(output[7], "app.farewell=[en] 再见");
}

#[tokio::test]
async fn test_language_failure_does_not_block_next_language() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path());

    // 输出路径被目录占用，无法清空
    fs::create_dir(dir.path().join("messages_ja.properties")).unwrap();

    let config = PropsConfig::new(&input).with_languages(vec!["ja".to_string(), "en".to_string()]);
    let translator = ScriptedTranslator::default();

    let report = PropsPipeline::new(&translator, &config).run().await.unwrap();

    assert!(matches!(
        report.find("ja").unwrap().status,
        LanguageStatus::Skipped(_)
    ));
    assert!(report.find("en").unwrap().is_written());
    assert_eq!(report.written(), 1);
    assert_eq!(report.skipped(), 1);

    let output = read_lines(&dir.path().join("messages_en.properties"));
    assert_eq!(output[1], "app.title=[en] 我的应用");
}

#[tokio::test]
async fn test_retry_recovers_flaky_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path());
    let config = PropsConfig::new(&input)
        .with_languages(vec!["en".to_string()])
        .with_batch_size(2)
        .with_retry(RetryConfig::immediate(1));
    let translator = ScriptedTranslator {
        flaky_batches: vec![2],
        ..Default::default()
    };

    let report = PropsPipeline::new(&translator, &config).run().await.unwrap();
    let en = report.find("en").unwrap();
    assert_eq!(en.failed_batches, 0);
    assert_eq!(en.translated_lines, 4);
    assert_eq!(translator.calls_for(1), 1);
    assert_eq!(translator.calls_for(2), 2);
}

#[tokio::test]
async fn test_without_retry_flaky_batch_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path());
    let config = PropsConfig::new(&input)
        .with_languages(vec!["en".to_string()])
        .with_batch_size(2);
    let translator = ScriptedTranslator {
        flaky_batches: vec![2],
        ..Default::default()
    };

    let report = PropsPipeline::new(&translator, &config).run().await.unwrap();
    assert_eq!(report.find("en").unwrap().failed_batches, 1);
    assert_eq!(translator.calls_for(2), 1);

    let output = read_lines(&dir.path().join("messages_en.properties"));
    assert_eq!(output[7], "app.farewell=再见");
}

#[tokio::test]
async fn test_unicode_escaped_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("labels.properties");
    fs::write(&input, "# \\u6a19\\u984c\nlabel=\\u4f60\\u597d\n").unwrap();

    let out_dir = dir.path().join("dist");
    let config = PropsConfig::new(&input)
        .with_languages(vec!["zh-CN".to_string()])
        .with_output_dir(&out_dir)
        .escape_unicode(true);
    let translator = ScriptedTranslator::default();

    PropsPipeline::new(&translator, &config).run().await.unwrap();

    let output = fs::read_to_string(out_dir.join("labels_zh-CN.properties")).unwrap();
    assert_eq!(
        output,
        "# \\u6a19\\u984c\nlabel=[zh-CN] \\u4f60\\u597d\n"
    );
    assert!(output.is_ascii());
}

#[tokio::test]
async fn test_missing_input_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = PropsConfig::new(dir.path().join("missing.properties"));
    let translator = ScriptedTranslator::default();

    let err = PropsPipeline::new(&translator, &config).run().await.unwrap_err();
    assert!(matches!(err, TranslationError::FileOperation { .. }));
    assert!(!dir.path().join("missing_en.properties").exists());
}

#[tokio::test]
async fn test_multiline_translation_keeps_line_count() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("short.properties");
    fs::write(&input, "a=one\n# c\nb=two\n").unwrap();
    let config = PropsConfig::new(&input).with_languages(vec!["en".to_string()]);

    PropsPipeline::new(&MultilineTranslator, &config).run().await.unwrap();

    let output = read_lines(&dir.path().join("short_en.properties"));
    assert_eq!(output.len(), 3);
    assert_eq!(output[0], "a=Line one\\nLine two");
    assert_eq!(output[1], "# c");
    assert_eq!(output[2], "b=Line one\\nLine two");
}

#[tokio::test]
async fn test_write_failure_after_reset_skips_language() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(dir.path());
    let blocked = dir.path().join("messages_ja.properties");
    let config = PropsConfig::new(&input).with_languages(vec!["ja".to_string(), "en".to_string()]);
    let translator = BlockingTranslator {
        language: "ja",
        blocked: blocked.clone(),
    };

    let report = PropsPipeline::new(&translator, &config).run().await.unwrap();

    let ja = report.find("ja").unwrap();
    assert!(matches!(&ja.status, LanguageStatus::Skipped(reason) if reason.contains("写入")));
    assert_eq!(ja.translated_lines, 4);
    assert!(blocked.is_dir());

    assert!(report.find("en").unwrap().is_written());
    let output = read_lines(&dir.path().join("messages_en.properties"));
    assert_eq!(output[1], "app.title=[en] 我的应用");
}
