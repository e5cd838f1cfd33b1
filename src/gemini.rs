//! HTTPS client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::generation::ContentGenerator;
use crate::{Error, GeneratorConfig, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Gemini-backed `ContentGenerator`
pub struct GeminiClient {
    http: Client,
    endpoint: Url,
}

impl GeminiClient {
    /// Build a client from an explicit configuration.
    ///
    /// Fails with `Error::MissingCredential` before any network activity
    /// when no API key is configured.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(Error::MissingCredential)?;

        let key = HeaderValue::from_str(api_key)
            .map_err(|e| Error::ConfigError(format!("API key is not a valid header value: {}", e)))?;
        let headers = HeaderMap::from_iter([(HeaderName::from_static("x-goog-api-key"), key)]);

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::ConfigError(format!("invalid base URL {}: {}", config.base_url, e)))?;
        let endpoint = base
            .join(&format!("models/{}:generateContent", config.model))
            .map_err(|e| Error::ConfigError(format!("invalid model name {}: {}", config.model, e)))?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl ContentGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<String> {
        let body = GenerateContentRequest {
            contents: [Content { role: "user", parts: [TextPart { text: prompt }] }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        debug!("POST {}", self.endpoint);
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::GenerationError(format!("request failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(Error::GenerationError(format!("HTTP {}: {}", status.as_u16(), detail)));
        }

        let raw = res
            .text()
            .await
            .map_err(|e| Error::GenerationError(format!("failed to read response body: {}", e)))?;
        let parsed: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| Error::InvalidResponse(format!("unexpected envelope: {}", e)))?;

        parsed
            .text()
            .ok_or_else(|| Error::InvalidResponse("response has no candidate text".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_fails_fast() {
        let cfg = GeneratorConfig { api_key: None, ..Default::default() };
        assert!(matches!(GeminiClient::new(&cfg), Err(Error::MissingCredential)));
        let cfg = GeneratorConfig { api_key: Some("   ".into()), ..Default::default() };
        assert!(matches!(GeminiClient::new(&cfg), Err(Error::MissingCredential)));
    }

    #[test]
    fn endpoint_targets_model() {
        let cfg = GeneratorConfig { api_key: Some("k".into()), ..Default::default() };
        let client = GeminiClient::new(&cfg).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn candidate_parts_are_concatenated() {
        let r: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(r.text().as_deref(), Some("{\"a\":1}"));
        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.text().is_none());
    }
}
