//! 配置管理模块
//!
//! 提供CLI参数解析、Gemini连接配置和翻译任务配置

// 标准库导入
use std::fmt;
use std::path::{Path, PathBuf};

// 第三方crate导入
use clap::{Args, Parser, Subcommand};

// 本地模块导入
use crate::api_constants::{api_config, file_config, get_model, is_valid_api_url, service_config};
use crate::error::Result;
use crate::retry::RetryConfig;
use crate::translation_error;
use crate::utils::{generate_output_path, resolve_input_path, validate_input_file};

/// Gemini 连接配置
#[derive(Clone)]
pub struct GeminiSettings {
    /// API密钥
    pub api_key: String,
    /// 模型名称
    pub model: String,
    /// API根地址
    pub api_base: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiSettings {
    /// 从进程环境变量读取配置，CLI参数优先
    pub fn from_env(cli: &Cli) -> Result<Self> {
        Self::from_lookup(cli, |name| std::env::var(name).ok())
    }

    /// 通过查找函数读取配置，便于测试时注入环境
    pub fn from_lookup<F>(cli: &Cli, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(api_config::API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                translation_error!(
                    config,
                    api_config::API_KEY_ENV,
                    "找不到环境变量，请确认 .env 文件存在且包含该设置"
                )
            })?;

        let env_model = lookup(api_config::MODEL_ENV);
        let model = get_model(cli.model.as_deref(), env_model.as_deref());

        let api_base = cli
            .api_base
            .clone()
            .or_else(|| lookup(api_config::API_BASE_ENV))
            .unwrap_or_else(|| api_config::DEFAULT_API_BASE.to_string());

        if !is_valid_api_url(&api_base) {
            return Err(translation_error!(config, "api_base", format!("无效的API地址: {}", api_base)));
        }

        if cli.timeout == 0 {
            return Err(translation_error!(config, "timeout", "超时时间必须大于0"));
        }

        Ok(Self {
            api_key,
            model,
            api_base,
            timeout_secs: cli.timeout,
        })
    }
}

/// 解析逗号分隔的语言列表，去除空项并保持首次出现的顺序去重
pub fn parse_languages(list: &str) -> Result<Vec<String>> {
    let mut languages: Vec<String> = Vec::new();
    for lang in list.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        if !languages.iter().any(|existing| existing == lang) {
            languages.push(lang.to_string());
        }
    }

    if languages.is_empty() {
        return Err(translation_error!(input_validation, list, "目标语言列表为空"));
    }
    Ok(languages)
}

/// .properties 翻译任务配置
///
/// 支持Builder模式进行链式配置。
///
/// # Examples
///
/// ```rust
/// use i18n_props::config::PropsConfig;
///
/// let config = PropsConfig::new("messages.properties")
///     .with_languages(vec!["en".to_string(), "ja".to_string()])
///     .with_batch_size(50)
///     .escape_unicode(true);
///
/// assert_eq!(config.batch_size(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct PropsConfig {
    /// 输入文件
    input_path: PathBuf,
    /// 输出目录（默认为输入文件所在目录）
    output_dir: Option<PathBuf>,
    /// 目标语言列表
    languages: Vec<String>,
    /// 批处理大小
    batch_size: usize,
    /// 失败批次的重试策略
    retry: RetryConfig,
    /// 输出是否转义非ASCII字符
    escape_unicode: bool,
}

impl PropsConfig {
    /// 创建新的配置实例
    ///
    /// 默认值：
    /// - 目标语言: en, zh-CN
    /// - 批处理大小: 100
    /// - 不重试
    /// - 不转义非ASCII字符
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: None,
            languages: service_config::DEFAULT_LANGUAGES
                .split(',')
                .map(str::to_string)
                .collect(),
            batch_size: service_config::DEFAULT_BATCH_SIZE,
            retry: RetryConfig::batch(service_config::DEFAULT_MAX_RETRIES),
            escape_unicode: false,
        }
    }

    /// 从命令行参数构建，校验输入文件与各项参数
    pub fn from_args(args: &PropsArgs) -> Result<Self> {
        let input_path = resolve_input_path(&args.filename, Some(file_config::PROPERTIES_EXTENSION))?;
        validate_input_file(&input_path)?;

        if args.batch_size == 0 {
            return Err(translation_error!(config, "batch_size", "批处理大小必须大于0"));
        }

        let mut config = Self::new(input_path)
            .with_languages(parse_languages(&args.lang)?)
            .with_batch_size(args.batch_size)
            .with_max_retries(args.max_retries)
            .escape_unicode(args.unicode);
        config.output_dir = args.output_dir.clone();

        Ok(config)
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    pub fn is_unicode_escaped(&self) -> bool {
        self.escape_unicode
    }

    /// 指定语言的输出文件路径
    pub fn output_path_for(&self, language: &str) -> PathBuf {
        generate_output_path(&self.input_path, self.output_dir.as_deref(), language)
    }

    /// 设置输出目录
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// 设置目标语言列表
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    /// 设置批处理大小
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// 设置最大重试次数
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.retry = RetryConfig::batch(retries);
        self
    }

    /// 设置完整的重试策略
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// 设置是否转义非ASCII字符
    pub fn escape_unicode(mut self, enable: bool) -> Self {
        self.escape_unicode = enable;
        self
    }
}

/// 整份文档翻译任务配置
#[derive(Debug, Clone)]
pub struct DocConfig {
    input_path: PathBuf,
    output_dir: Option<PathBuf>,
    languages: Vec<String>,
}

impl DocConfig {
    pub fn new(input_path: impl Into<PathBuf>, languages: Vec<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: None,
            languages,
        }
    }

    pub fn from_args(args: &DocArgs) -> Result<Self> {
        let input_path = resolve_input_path(&args.file, None)?;
        validate_input_file(&input_path)?;

        let mut config = Self::new(input_path, parse_languages(&args.lang)?);
        config.output_dir = args.output_dir.clone();
        Ok(config)
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn output_path_for(&self, language: &str) -> PathBuf {
        generate_output_path(&self.input_path, self.output_dir.as_deref(), language)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}

/// CLI参数结构
#[derive(Parser, Debug)]
#[command(
    name = "i18n-props",
    author,
    version,
    about = "多语言翻译CLI工具 - 批量翻译 .properties 文件与文档",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 静默模式 (仅输出错误)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// 使用的模型 (默认读取 GEMINI_MODEL，否则 gemini-2.0-flash)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Gemini API 根地址 (默认读取 GEMINI_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// 请求超时时间（秒）
    #[arg(long, global = true, default_value_t = service_config::REQUEST_TIMEOUT_SECONDS)]
    pub timeout: u64,
}

/// 子命令
#[derive(Subcommand, Debug)]
pub enum Command {
    /// 翻译 .properties 文件
    Props(PropsArgs),
    /// 翻译整份文档 (如 README.md)
    Doc(DocArgs),
}

/// `props` 子命令参数
#[derive(Args, Debug)]
pub struct PropsArgs {
    /// .properties 文件名称（不含副档名）
    #[arg(value_name = "FILENAME")]
    pub filename: String,

    /// 输出时将非ASCII字符转为 \uXXXX
    #[arg(short, long)]
    pub unicode: bool,

    /// 输出目录 (默认为输入文件所在目录)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// 以逗号分隔的目标语言清单
    #[arg(short, long, default_value = service_config::DEFAULT_LANGUAGES)]
    pub lang: String,

    /// 每个请求包含的条目数
    #[arg(long, default_value_t = service_config::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// 失败批次的最大重试次数
    #[arg(long, default_value_t = service_config::DEFAULT_MAX_RETRIES)]
    pub max_retries: usize,

    /// 显示翻译统计
    #[arg(long)]
    pub stats: bool,
}

/// `doc` 子命令参数
#[derive(Args, Debug)]
pub struct DocArgs {
    /// 输入文件路径
    #[arg(value_name = "FILE")]
    pub file: String,

    /// 输出目录 (默认为输入文件所在目录)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// 以逗号分隔的目标语言清单
    #[arg(short, long, default_value = service_config::DEFAULT_LANGUAGES)]
    pub lang: String,

    /// 显示翻译统计
    #[arg(long)]
    pub stats: bool,
}
