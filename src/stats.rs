use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};

/// 单个语言的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageStatus {
    /// 输出文件已写入
    Written,
    /// 该语言被跳过（原因）
    Skipped(String),
}

/// 单个语言的翻译统计
#[derive(Debug, Clone)]
pub struct LanguageReport {
    pub language: String,
    pub output_path: PathBuf,
    pub status: LanguageStatus,
    pub total_lines: usize,
    pub translatable_lines: usize,
    pub translated_lines: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub elapsed: Duration,
}

impl LanguageReport {
    pub fn new(language: &str, output_path: PathBuf) -> Self {
        Self {
            language: language.to_string(),
            output_path,
            status: LanguageStatus::Skipped("未开始".to_string()),
            total_lines: 0,
            translatable_lines: 0,
            translated_lines: 0,
            batches: 0,
            failed_batches: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_written(&self) -> bool {
        self.status == LanguageStatus::Written
    }
}

/// 一次运行的汇总
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub languages: Vec<LanguageReport>,
    pub total_duration: Duration,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Local::now(),
            languages: Vec::new(),
            total_duration: Duration::ZERO,
        }
    }

    pub fn written(&self) -> usize {
        self.languages.iter().filter(|r| r.is_written()).count()
    }

    pub fn skipped(&self) -> usize {
        self.languages.len() - self.written()
    }

    pub fn find(&self, language: &str) -> Option<&LanguageReport> {
        self.languages.iter().find(|r| r.language == language)
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// 打印翻译统计
pub fn print_report(report: &RunReport) {
    println!("\n📊 翻译统计报告:");
    println!("═══════════════════════════════════════");
    println!(
        "🕒 开始时间: {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("⏱️  总耗时: {}", format_duration(report.total_duration));

    for lang in &report.languages {
        println!("\n🌐 {}:", lang.language);
        match &lang.status {
            LanguageStatus::Written => println!("   状态: ✅ 已写入 {}", lang.output_path.display()),
            LanguageStatus::Skipped(reason) => println!("   状态: ⚠️  已跳过 ({})", reason),
        }
        if lang.batches > 0 {
            println!("   总行数: {}", lang.total_lines);
            println!(
                "   已翻译: {}/{} 项",
                lang.translated_lines, lang.translatable_lines
            );
            println!(
                "   批次: {} 个 (失败 {} 个)",
                lang.batches, lang.failed_batches
            );
        }
        println!("   耗时: {}", format_duration(lang.elapsed));
    }

    println!(
        "\n📁 输出: {} 个成功, {} 个跳过",
        report.written(),
        report.skipped()
    );
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}
