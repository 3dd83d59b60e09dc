//! i18n-props - 多语言翻译工具库
//!
//! 这个库提供了 .properties 文件解析、批量索引翻译、Unicode 转义处理和整份文档翻译等核心功能。

pub mod api_constants;
pub mod config;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod properties;
pub mod retry;
pub mod stats;
pub mod translator;
pub mod unicode;
pub mod utils;
