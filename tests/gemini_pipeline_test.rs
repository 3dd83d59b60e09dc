use std::fs;

use i18n_props::config::{GeminiSettings, PropsConfig};
use i18n_props::pipeline::PropsPipeline;
use i18n_props::translator::GeminiClient;
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn gemini_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            {
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }
        ]
    })
}

#[tokio::test]
async fn test_end_to_end_with_mock_gemini() {
    let server = MockServer::start().await;

    // en：返回包在代码块里的 JSON
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(body_string_contains("翻译成 en 语系"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response(
            "```json\n{\"0\": \"Hello\", \"2\": \" Goodbye \"}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    // ja：模型没有按格式回复
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(body_string_contains("翻译成 ja 语系"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_response("こんにちは、さようなら")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("app.properties");
    let source = "greeting=\\u4f60\\u597d\n# comment\nfarewell=再见\n";
    fs::write(&input, source).unwrap();

    let settings = GeminiSettings {
        api_key: "test-key".to_string(),
        model: "gemini-2.0-flash".to_string(),
        api_base: server.uri(),
        timeout_secs: 5,
    };
    let client = GeminiClient::new(settings).unwrap();
    let config = PropsConfig::new(&input).with_languages(vec!["en".to_string(), "ja".to_string()]);

    let report = PropsPipeline::new(&client, &config).run().await.unwrap();
    assert_eq!(report.written(), 2);

    let en = fs::read_to_string(dir.path().join("app_en.properties")).unwrap();
    assert_eq!(en, "greeting=Hello\n# comment\nfarewell=Goodbye\n");

    // 批次失败时输出为解码后的原文
    let ja = fs::read_to_string(dir.path().join("app_ja.properties")).unwrap();
    assert_eq!(ja, "greeting=你好\n# comment\nfarewell=再见\n");
    assert_eq!(report.find("ja").unwrap().failed_batches, 1);
}
