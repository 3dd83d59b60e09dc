//! 翻译服务适配层
//!
//! `BatchTranslator` / `TextTranslator` 是流水线与翻译服务之间的接缝，
//! 生产环境由 `GeminiClient` 实现，测试中可替换为脚本化实现。

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api_constants::{api_config, prompts, service_config};
use crate::config::GeminiSettings;
use crate::error::{Result, TranslationError};
use crate::properties::TranslationBatch;
use crate::translation_error;

/// 批量翻译 `.properties` 条目
#[allow(async_fn_in_trait)]
pub trait BatchTranslator {
    /// 返回 行号 → 译文，结果可以少于批次条目
    async fn translate_batch(
        &self,
        batch: &TranslationBatch,
        language: &str,
    ) -> Result<BTreeMap<usize, String>>;
}

/// 整份文本翻译
#[allow(async_fn_in_trait)]
pub trait TextTranslator {
    async fn translate_text(&self, content: &str, language: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Gemini `generateContent` 客户端
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    /// 创建客户端
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { http, settings })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.model
        )
    }

    /// 发送一次生成请求，返回所有文本片段拼接后的结果
    async fn generate(&self, parts: Vec<String>, temperature: f32) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: parts.into_iter().map(|text| Part { text: Some(text) }).collect(),
            }],
            generation_config: GenerationConfig { temperature },
        };

        debug!("发送请求到 {}", self.endpoint());

        let response = self
            .http
            .post(self.endpoint())
            .header(api_config::API_KEY_HEADER, &self.settings.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(translation_error!(
                translation_api,
                status.as_u16(),
                body,
                self.settings.model
            ));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| translation_error!(response_parse, e, body))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(translation_error!(response_parse, "响应中没有候选文本", body));
        }

        Ok(text)
    }
}

impl BatchTranslator for GeminiClient {
    async fn translate_batch(
        &self,
        batch: &TranslationBatch,
        language: &str,
    ) -> Result<BTreeMap<usize, String>> {
        let prompt = prompts::render(prompts::BATCH_TRANSLATION_TEMPLATE, language);
        let payload = batch.to_json()?;

        let response_text = self
            .generate(vec![prompt, payload], service_config::PROPS_TEMPERATURE)
            .await?;

        parse_batch_response(&response_text, batch)
    }
}

impl TextTranslator for GeminiClient {
    async fn translate_text(&self, content: &str, language: &str) -> Result<String> {
        let prompt = prompts::render(prompts::DOCUMENT_TRANSLATION_TEMPLATE, language);
        self.generate(
            vec![prompt, content.to_string()],
            service_config::DOCUMENT_TEMPERATURE,
        )
        .await
    }
}

/// 去除模型回复外层的 Markdown 代码块标记
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest).trim();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// 解析批量翻译回复
///
/// 回复必须是 JSON 对象；键无法解析为行号、行号不属于本批次或值不是字符串的条目
/// 会被跳过。
pub fn parse_batch_response(
    response_text: &str,
    batch: &TranslationBatch,
) -> Result<BTreeMap<usize, String>> {
    let cleaned = strip_code_fence(response_text);

    let value: serde_json::Value = serde_json::from_str(cleaned)
        .map_err(|e| translation_error!(response_parse, e, response_text))?;

    let serde_json::Value::Object(object) = value else {
        return Err(translation_error!(
            response_parse,
            "回复不是JSON对象",
            response_text
        ));
    };

    let mut translations = BTreeMap::new();
    for (key, value) in object {
        let Ok(index) = key.trim().parse::<usize>() else {
            warn!("⚠️  忽略无法识别的索引: {}", key);
            continue;
        };
        if !batch.contains(index) {
            warn!("⚠️  忽略不属于批次 {} 的索引: {}", batch.number, index);
            continue;
        }
        match value.as_str() {
            Some(text) => {
                translations.insert(index, text.trim().to_string());
            }
            None => warn!("⚠️  索引 {} 的译文不是字符串: {}", index, value),
        }
    }

    Ok(translations)
}

/// 用于日志输出的原始响应内容
pub fn raw_response(error: &TranslationError) -> Option<&str> {
    match error {
        TranslationError::ResponseParse { raw, .. } if !raw.is_empty() => Some(raw.as_str()),
        _ => None,
    }
}
