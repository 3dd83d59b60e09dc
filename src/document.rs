//! 整份文档翻译
//!
//! 每个目标语言发送一次请求，译文原样写入 `{文件名}_{语言}{副档名}`。

use std::fs;
use std::time::Instant;

use tracing::{error, info};

use crate::config::DocConfig;
use crate::error::Result;
use crate::stats::{LanguageReport, LanguageStatus, RunReport};
use crate::translation_error;
use crate::translator::TextTranslator;
use crate::utils::ensure_parent_dir;

/// 文档翻译流水线
pub struct DocumentPipeline<'a, T: TextTranslator> {
    translator: &'a T,
    config: &'a DocConfig,
}

impl<'a, T: TextTranslator> DocumentPipeline<'a, T> {
    pub fn new(translator: &'a T, config: &'a DocConfig) -> Self {
        Self { translator, config }
    }

    /// 读取输入文件后逐个语言翻译，单个语言失败不影响其他语言
    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        let input_path = self.config.input_path();
        let content = fs::read_to_string(input_path)
            .map_err(|e| translation_error!(file_op, input_path.display(), "读取", e))?;

        info!("📏 文件大小: {} 字节", content.len());

        let mut report = RunReport::new();
        for language in self.config.languages() {
            report.languages.push(self.process_language(&content, language).await);
        }
        report.total_duration = started.elapsed();

        info!(
            "🏁 所有翻译任务已完成: {} 个成功, {} 个跳过",
            report.written(),
            report.skipped()
        );
        Ok(report)
    }

    async fn process_language(&self, content: &str, language: &str) -> LanguageReport {
        let started = Instant::now();
        let output_path = self.config.output_path_for(language);
        let mut report = LanguageReport::new(language, output_path.clone());
        report.total_lines = content.lines().count();

        info!("--- 🌐 开始翻译为 {} ---", language);

        let outcome = match self.translator.translate_text(content, language).await {
            Ok(translated) => ensure_parent_dir(&output_path).and_then(|()| {
                fs::write(&output_path, translated)
                    .map_err(|e| translation_error!(file_op, output_path.display(), "写入", e))
            }),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                info!("✅ 翻译内容已保存至 {}", output_path.display());
                report.status = LanguageStatus::Written;
            }
            Err(e) => {
                error!("❌ 翻译为 {} 时发生错误: {}", language, e);
                report.status = LanguageStatus::Skipped(e.to_string());
            }
        }

        report.elapsed = started.elapsed();
        report
    }
}
