//! Google Gemini provider 어댑터.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::application::config::Config;
use crate::application::ports::ReviewGenerator;
use crate::domain::review::{ComposedPrompt, GenerationSettings, ProviderResponse, TokenUsage};
use crate::infrastructure::config::resolve_provider_api_key;

use super::api_runner::{build_api_client, collect_parts_text, send_json};

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    credential: String,
}

impl GeminiProvider {
    /// 설정에서 API key를 해석해 provider를 만든다.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = config.gemini();
        if !provider.is_enabled() {
            bail!("gemini provider is disabled. Set providers.gemini.enabled to true");
        }

        let resolution = resolve_provider_api_key(&provider);
        let Some(credential) = resolution.credential else {
            let hint = resolution
                .source
                .map(|s| format!(" (checked {s})"))
                .unwrap_or_default();
            bail!(
                "missing Gemini API key{hint}. Configure providers.gemini.api_key_env or export GEMINI_API_KEY"
            );
        };

        Ok(Self::new(
            build_api_client(config.timeout() + Duration::from_secs(5)),
            provider.api_base(),
            credential,
        ))
    }

    pub fn new(client: Client, base_url: String, credential: String) -> Self {
        Self {
            client,
            base_url,
            credential,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

/// generateContent 요청 본문을 만든다.
pub(crate) fn build_payload(prompt: &ComposedPrompt, settings: &GenerationSettings) -> Value {
    json!({
        "systemInstruction": {
            "parts": [
                { "text": prompt.system_instruction }
            ]
        },
        "contents": [
            {
                "role": "user",
                "parts": [
                    { "text": prompt.user_prompt }
                ]
            }
        ],
        "generationConfig": {
            "temperature": settings.temperature,
            "topP": settings.top_p
        }
    })
}

/// 응답에서 본문 텍스트와 사용량을 추출한다.
pub(crate) fn parse_response(response: &Value) -> Result<ProviderResponse> {
    let content = response
        .pointer("/candidates/0/content")
        .map(collect_parts_text)
        .unwrap_or_default()
        .trim()
        .to_string();

    if content.is_empty() {
        let reason = response
            .pointer("/candidates/0/finishReason")
            .or_else(|| response.pointer("/promptFeedback/blockReason"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        bail!("Gemini: empty response content (reason: {reason})");
    }

    Ok(ProviderResponse {
        content,
        usage: TokenUsage {
            prompt_tokens: response
                .pointer("/usageMetadata/promptTokenCount")
                .and_then(Value::as_u64),
            completion_tokens: response
                .pointer("/usageMetadata/candidatesTokenCount")
                .and_then(Value::as_u64),
            total_tokens: response
                .pointer("/usageMetadata/totalTokenCount")
                .and_then(Value::as_u64),
        },
    })
}

#[async_trait]
impl ReviewGenerator for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        settings: &GenerationSettings,
    ) -> Result<ProviderResponse> {
        let endpoint = self.endpoint(&settings.model);
        let payload = build_payload(prompt, settings);
        debug!(%endpoint, "request Gemini API");

        // Gemini는 API key(query) 또는 OAuth(Bearer) 방식 모두 허용한다.
        let request = if self.credential.starts_with("AIza") {
            let mut url = Url::parse(&endpoint)
                .with_context(|| format!("invalid Gemini endpoint: {endpoint}"))?;
            url.query_pairs_mut().append_pair("key", &self.credential);
            self.client.post(url).json(&payload)
        } else {
            self.client
                .post(endpoint)
                .bearer_auth(&self.credential)
                .json(&payload)
        };

        let response = send_json(self.name(), "request Gemini API", request).await?;
        parse_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_instruction_prompt_and_sampling() {
        let prompt = ComposedPrompt {
            system_instruction: "be kind".to_string(),
            user_prompt: "write a review".to_string(),
        };
        let settings = GenerationSettings::default();
        let payload = build_payload(&prompt, &settings);

        assert_eq!(
            payload.pointer("/systemInstruction/parts/0/text"),
            Some(&json!("be kind"))
        );
        assert_eq!(
            payload.pointer("/contents/0/parts/0/text"),
            Some(&json!("write a review"))
        );
        assert_eq!(
            payload
                .pointer("/generationConfig/temperature")
                .and_then(Value::as_f64),
            Some(1.0)
        );
        let top_p = payload
            .pointer("/generationConfig/topP")
            .and_then(Value::as_f64)
            .expect("topP");
        assert!((top_p - 0.95).abs() < 1e-6);
    }

    #[test]
    fn parses_text_and_usage() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  You worked hard today. " }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 210,
                "candidatesTokenCount": 160,
                "totalTokenCount": 370
            }
        });
        let parsed = parse_response(&response).expect("text present");
        assert_eq!(parsed.content, "You worked hard today.");
        assert_eq!(parsed.usage.prompt_tokens, Some(210));
        assert_eq!(parsed.usage.completion_tokens, Some(160));
        assert_eq!(parsed.usage.total_tokens, Some(370));
    }

    #[test]
    fn empty_candidate_is_an_error() {
        let response = json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "SAFETY" }]
        });
        let err = parse_response(&response).expect_err("empty text");
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let provider = GeminiProvider::new(
            Client::new(),
            "https://example.test/v1beta/".to_string(),
            "token".to_string(),
        );
        assert_eq!(
            provider.endpoint("gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn disabled_provider_is_rejected() {
        let config: Config =
            serde_json::from_str(r#"{"providers":{"gemini":{"enabled":false,"api_key":"x"}}}"#)
                .expect("config");
        let err = GeminiProvider::from_config(&config)
            .err()
            .expect("disabled provider");
        assert!(err.to_string().contains("disabled"));
    }
}
