//! 统一错误处理模块
//!
//! 提供 i18n-props 项目的统一错误类型定义和处理机制

// 标准库导入
use std::fmt;

/// i18n-props 统一错误类型
///
/// 区分启动阶段的致命错误（配置、输入文件）与批次级可恢复错误（网络、API、响应解析）
#[derive(Debug)]
pub enum TranslationError {
    /// 网络请求相关错误
    Network {
        /// 错误消息
        message: String,
        /// HTTP状态码（如果适用）
        status_code: Option<u16>,
    },

    /// 翻译API相关错误
    TranslationApi {
        /// API响应状态码
        status_code: u16,
        /// 错误消息（通常为响应体）
        message: String,
        /// 请求的模型名称
        model: String,
    },

    /// 翻译响应无法解析（非JSON、缺少候选结果等）
    ResponseParse {
        /// 具体错误信息
        details: String,
        /// 原始响应文本
        raw: String,
    },

    /// 文件操作相关错误
    FileOperation {
        /// 文件路径
        path: String,
        /// 操作类型（读取、写入、清空等）
        operation: String,
        /// 底层错误信息
        source: String,
    },

    /// 配置相关错误
    Configuration {
        /// 配置项名称
        field: String,
        /// 错误原因
        reason: String,
    },

    /// 输入验证错误
    InputValidation {
        /// 输入值
        input: String,
        /// 验证失败原因
        reason: String,
    },
}

impl TranslationError {
    /// 是否属于批次级可恢复错误
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TranslationError::Network { .. }
                | TranslationError::TranslationApi { .. }
                | TranslationError::ResponseParse { .. }
        )
    }
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::Network { message, status_code } => {
                if let Some(code) = status_code {
                    write!(f, "网络请求失败 [{}]: {}", code, message)
                } else {
                    write!(f, "网络请求失败: {}", message)
                }
            }
            TranslationError::TranslationApi { status_code, message, model } => {
                write!(f, "翻译API错误 [{}] {}: {}", status_code, model, message)
            }
            TranslationError::ResponseParse { details, .. } => {
                write!(f, "翻译响应解析失败: {}", details)
            }
            TranslationError::FileOperation { path, operation, source } => {
                write!(f, "文件{}操作失败 [{}]: {}", operation, path, source)
            }
            TranslationError::Configuration { field, reason } => {
                write!(f, "配置错误 [{}]: {}", field, reason)
            }
            TranslationError::InputValidation { input, reason } => {
                write!(f, "输入验证失败 [{}]: {}", input, reason)
            }
        }
    }
}

impl std::error::Error for TranslationError {}

/// i18n-props 结果类型别名
pub type Result<T> = std::result::Result<T, TranslationError>;

/// 便捷的错误创建宏
#[macro_export]
macro_rules! translation_error {
    (translation_api, $code:expr, $msg:expr, $model:expr) => {
        $crate::error::TranslationError::TranslationApi {
            status_code: $code,
            message: $msg.to_string(),
            model: $model.to_string(),
        }
    };
    (response_parse, $details:expr, $raw:expr) => {
        $crate::error::TranslationError::ResponseParse {
            details: $details.to_string(),
            raw: $raw.to_string(),
        }
    };
    (file_op, $path:expr, $op:expr, $source:expr) => {
        $crate::error::TranslationError::FileOperation {
            path: $path.to_string(),
            operation: $op.to_string(),
            source: $source.to_string(),
        }
    };
    (config, $field:expr, $reason:expr) => {
        $crate::error::TranslationError::Configuration {
            field: $field.to_string(),
            reason: $reason.to_string(),
        }
    };
    (input_validation, $input:expr, $reason:expr) => {
        $crate::error::TranslationError::InputValidation {
            input: $input.to_string(),
            reason: $reason.to_string(),
        }
    };
}

/// 从reqwest::Error转换为TranslationError
impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        TranslationError::Network {
            message: error.to_string(),
            status_code,
        }
    }
}

/// 从serde_json::Error转换为TranslationError
impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::ResponseParse {
            details: error.to_string(),
            raw: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TranslationError::Network {
            message: "Connection failed".to_string(),
            status_code: Some(500),
        };

        assert_eq!(format!("{}", err), "网络请求失败 [500]: Connection failed");

        let err = translation_error!(config, "GOOGLE_API_KEY", "环境变量未设置");
        assert_eq!(format!("{}", err), "配置错误 [GOOGLE_API_KEY]: 环境变量未设置");
    }

    #[test]
    fn test_error_macro() {
        let err = translation_error!(translation_api, 429, "quota exceeded", "gemini-2.0-flash");
        match err {
            TranslationError::TranslationApi { status_code, message, model } => {
                assert_eq!(status_code, 429);
                assert_eq!(message, "quota exceeded");
                assert_eq!(model, "gemini-2.0-flash");
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_recoverable_classification() {
        let timeout = TranslationError::Network {
            message: "timeout".to_string(),
            status_code: None,
        };
        assert!(timeout.is_recoverable());
        assert!(translation_error!(response_parse, "not json", "oops").is_recoverable());
        assert!(!translation_error!(file_op, "/tmp/x", "写入", "denied").is_recoverable());
        assert!(!translation_error!(input_validation, "", "empty").is_recoverable());
    }

    #[test]
    fn test_serde_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: TranslationError = json_err.into();
        assert!(matches!(err, TranslationError::ResponseParse { .. }));
    }
}
