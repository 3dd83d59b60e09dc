use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::translation_error;

/// 初始化日志系统
///
/// 静默模式只输出错误，详细模式输出调试信息
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// 解析输入路径
///
/// `extension` 不为空时视为不含副档名的前缀，自动补上副档名；相对路径转换为绝对路径。
pub fn resolve_input_path(input: &str, extension: Option<&str>) -> Result<PathBuf> {
    if input.trim().is_empty() {
        return Err(translation_error!(input_validation, input, "输入文件名称为空"));
    }

    let path = match extension {
        Some(ext) => PathBuf::from(format!("{}.{}", input, ext)),
        None => PathBuf::from(input),
    };

    if path.is_absolute() {
        return Ok(path);
    }

    let cwd = std::env::current_dir()
        .map_err(|e| translation_error!(file_op, ".", "读取工作目录", e))?;
    Ok(cwd.join(path))
}

/// 验证输入文件
pub fn validate_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(translation_error!(
            input_validation,
            path.display(),
            "输入文件不存在"
        ));
    }

    if !path.is_file() {
        return Err(translation_error!(
            input_validation,
            path.display(),
            "输入路径不是文件"
        ));
    }

    Ok(())
}

/// 确保输出文件所在目录存在
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| translation_error!(file_op, parent.display(), "创建目录", e))?;
    }
    Ok(())
}

/// 生成输出文件路径: `{目录}/{文件名}_{语言}.{副档名}`
///
/// 未指定输出目录时与输入文件同目录。
pub fn generate_output_path(input: &Path, output_dir: Option<&Path>, lang: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();

    let output_name = match input.extension() {
        Some(ext) => format!("{}_{}.{}", stem, lang, ext.to_string_lossy()),
        None => format!("{}_{}", stem, lang),
    };

    match output_dir.or_else(|| input.parent()) {
        Some(dir) => dir.join(output_name),
        None => PathBuf::from(output_name),
    }
}
