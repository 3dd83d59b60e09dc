//! .properties 翻译流水线
//!
//! 对每个目标语言依次执行：清空输出文件 → 分批翻译 → 重组 → 一次性写入。
//! 批次失败只影响本批次，语言失败不影响后续语言。

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::PropsConfig;
use crate::error::{Result, TranslationError};
use crate::properties::{PropertiesDocument, TranslationBatch};
use crate::retry::with_retry_if;
use crate::stats::{LanguageReport, LanguageStatus, RunReport};
use crate::translation_error;
use crate::translator::{raw_response, BatchTranslator};
use crate::unicode::unescape_unicode;
use crate::utils::ensure_parent_dir;

/// 单个语言的翻译结果
#[derive(Debug, Default)]
pub struct LanguageTranslation {
    /// 行号 → 译文
    pub translations: BTreeMap<usize, String>,
    pub batches: usize,
    pub failed_batches: usize,
}

/// 读取输入文件并还原其中的 `\uXXXX` 转义
pub fn load_document(path: &Path) -> Result<PropertiesDocument> {
    let content = fs::read_to_string(path)
        .map_err(|e| translation_error!(file_op, path.display(), "读取", e))?;
    Ok(PropertiesDocument::parse(&unescape_unicode(&content)))
}

/// 创建或清空输出文件
fn reset_output_file(path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::File::create(path).map_err(|e| translation_error!(file_op, path.display(), "清空", e))?;
    Ok(())
}

/// .properties 翻译流水线
pub struct PropsPipeline<'a, T: BatchTranslator> {
    translator: &'a T,
    config: &'a PropsConfig,
}

impl<'a, T: BatchTranslator> PropsPipeline<'a, T> {
    pub fn new(translator: &'a T, config: &'a PropsConfig) -> Self {
        Self { translator, config }
    }

    /// 执行全部语言的翻译
    ///
    /// 只有读取输入文件失败会返回错误；语言级与批次级错误记录在报告中。
    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        let document = load_document(self.config.input_path())?;

        info!(
            "📄 共 {} 行，其中 {} 行需要翻译",
            document.len(),
            document.translatable_count()
        );

        let mut report = RunReport::new();
        for language in self.config.languages() {
            let language_report = self.process_language(&document, language).await;
            report.languages.push(language_report);
        }
        report.total_duration = started.elapsed();

        info!(
            "🏁 翻译完成: {} 个语言成功, {} 个跳过",
            report.written(),
            report.skipped()
        );
        Ok(report)
    }

    /// 处理单个语言，失败时记录原因并返回
    async fn process_language(&self, document: &PropertiesDocument, language: &str) -> LanguageReport {
        let started = Instant::now();
        let output_path = self.config.output_path_for(language);
        let mut report = LanguageReport::new(language, output_path.clone());
        report.total_lines = document.len();
        report.translatable_lines = document.translatable_count();

        info!("--- 🌐 开始翻译为 {} ---", language);

        if let Err(e) = reset_output_file(&output_path) {
            error!("❌ {}，跳过语言 {}", e, language);
            report.status = LanguageStatus::Skipped(e.to_string());
            report.elapsed = started.elapsed();
            return report;
        }
        debug!("已清空文件: {}", output_path.display());

        let outcome = self.translate_document(document, language).await;
        report.batches = outcome.batches;
        report.failed_batches = outcome.failed_batches;
        report.translated_lines = outcome.translations.len();

        let content = document.reassemble(&outcome.translations, self.config.is_unicode_escaped());
        match fs::write(&output_path, content) {
            Ok(()) => {
                info!("✅ 翻译结果已保存至 {}", output_path.display());
                report.status = LanguageStatus::Written;
            }
            Err(e) => {
                let err = translation_error!(file_op, output_path.display(), "写入", e);
                error!("❌ {}", err);
                report.status = LanguageStatus::Skipped(err.to_string());
            }
        }

        report.elapsed = started.elapsed();
        report
    }

    /// 逐批翻译文档中的可翻译行
    pub async fn translate_document(
        &self,
        document: &PropertiesDocument,
        language: &str,
    ) -> LanguageTranslation {
        let mut outcome = LanguageTranslation::default();

        for batch in document.batches(self.config.batch_size()) {
            if batch.is_empty() {
                continue;
            }
            outcome.batches += 1;

            info!("  正在处理批次 {} (共 {} 项)...", batch.number, batch.len());

            match self.translate_batch(&batch, language).await {
                Ok(translations) => {
                    if translations.len() < batch.len() {
                        warn!(
                            "⚠️  批次 {} 仅返回 {}/{} 项译文",
                            batch.number,
                            translations.len(),
                            batch.len()
                        );
                    }
                    outcome.translations.extend(
                        translations
                            .into_iter()
                            .map(|(index, text)| (index, text.trim().to_string())),
                    );
                }
                Err(e) => {
                    outcome.failed_batches += 1;
                    error!("❌ 批次 {} 翻译失败: {}", batch.number, e);
                    if let Some(raw) = raw_response(&e) {
                        error!("   API 返回内容: {}", raw);
                    }
                }
            }
        }

        outcome
    }

    async fn translate_batch(
        &self,
        batch: &TranslationBatch,
        language: &str,
    ) -> Result<BTreeMap<usize, String>> {
        let operation_name = format!("批次 {}", batch.number);
        with_retry_if(
            self.config.retry(),
            &operation_name,
            || self.translator.translate_batch(batch, language),
            TranslationError::is_recoverable,
        )
        .await
    }
}
