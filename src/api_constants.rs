/// 翻译API配置常量
///
/// 该文件定义了所有翻译服务相关的常量配置，方便统一管理和维护

/// Gemini API配置
pub mod api_config {
    /// 默认Gemini API地址
    pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

    /// 默认模型
    pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

    /// API密钥环境变量
    pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

    /// 模型环境变量
    pub const MODEL_ENV: &str = "GEMINI_MODEL";

    /// API地址环境变量
    pub const API_BASE_ENV: &str = "GEMINI_API_BASE";

    /// API密钥请求头
    pub const API_KEY_HEADER: &str = "x-goog-api-key";
}

/// 翻译服务配置
pub mod service_config {
    /// 默认目标语言列表（逗号分隔）
    pub const DEFAULT_LANGUAGES: &str = "en,zh-CN";

    /// 默认批处理大小
    pub const DEFAULT_BATCH_SIZE: usize = 100;

    /// 默认最大重试次数（0 表示失败批次直接丢弃）
    pub const DEFAULT_MAX_RETRIES: usize = 0;

    /// 请求超时时间（秒）
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 120;

    /// .properties 批量翻译的 temperature
    pub const PROPS_TEMPERATURE: f32 = 0.3;

    /// 整份文档翻译的 temperature
    pub const DOCUMENT_TEMPERATURE: f32 = 0.5;

    /// 重试初始延迟（毫秒）
    pub const RETRY_DELAY_BASE_MS: u64 = 1000;

    /// 重试最大延迟（毫秒）
    pub const RETRY_DELAY_MAX_MS: u64 = 10_000;
}

/// 文件格式配置
pub mod file_config {
    /// .properties 扩展名
    pub const PROPERTIES_EXTENSION: &str = "properties";

    /// 注释前缀
    pub const COMMENT_PREFIX: char = '#';
}

/// 提示词模板
pub mod prompts {
    /// .properties 批量翻译指令，`{language}` 为目标语系
    pub const BATCH_TRANSLATION_TEMPLATE: &str = r#"
请将以下 JSON 对象中的值翻译成 {language} 语系。根据目标语系的语言习惯调整描述，确保翻译内容自然且符合当地文化与用语规范。
请以 JSON 格式返回翻译结果，格式为一个对象，其中 key 为原文的索引（字符串），value 为翻译后的内容。
例如：
输入:
{
  "0": "Hello",
  "1": "World"
}
输出:
{
  "0": "你好",
  "1": "世界"
}

以下是要翻译的 JSON 对象：
"#;

    /// 整份文档翻译指令，`{language}` 为目标语系
    pub const DOCUMENT_TRANSLATION_TEMPLATE: &str = r#"
请将以下文字翻译成 {language} 语系，保留原文中的 URL 网址不进行翻译，
根据目标语系的语言习惯调整描述，确保翻译内容自然且符合当地文化与用语规范。
仅返回翻译后的内容，不包含开场白、说明或其他多余文字:
"#;

    /// 填充模板中的目标语系
    pub fn render(template: &str, language: &str) -> String {
        template.replace("{language}", language)
    }
}

/// 获取模型名称，CLI参数优先于环境变量
pub fn get_model(cli_model: Option<&str>, env_model: Option<&str>) -> String {
    cli_model
        .or(env_model)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(api_config::DEFAULT_MODEL)
        .trim()
        .to_string()
}

/// 验证API地址是否有效（仅允许 http/https）
pub fn is_valid_api_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}
