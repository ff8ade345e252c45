//! OpenAI-compatible chat-completions backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::analysis::{analysis_schema, truncate_input};
use crate::error::AnalysisError;
use crate::{AnalysisBackend, Result, TenderAnalysis};

const SYSTEM_PROMPT: &str = "You are an assistant specialized in analyzing civil engineering \
public tender documents. Extract the requested information accurately and answer in the \
language of the document.";

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration of the chat-completions backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Base URL of the API, without the `/chat/completions` suffix.
    pub base_url: String,

    /// Model name.
    pub model: String,

    /// API key. Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum number of characters of document text sent (0 = unlimited).
    pub max_input_chars: usize,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 120,
            max_input_chars: 100_000,
        }
    }
}

impl OpenAiConfig {
    /// The configured key, or the one from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Backend calling an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_input_chars: usize,
}

impl OpenAiBackend {
    /// Build a backend from configuration.
    pub fn from_config(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or(AnalysisError::MissingApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            max_input_chars: config.max_input_chars,
        })
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "model": self.model,
            "stream": false,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Analyze this tender document text and extract the requested information:\n\n{text}"
                    ),
                },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": analysis_schema(),
            },
        })
    }
}

/// Pull the analysis out of a raw chat-completions response body.
fn parse_response(body: &str) -> Result<TenderAnalysis> {
    let response: ChatResponse = serde_json::from_str(body)?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(AnalysisError::EmptyResponse)?;

    Ok(serde_json::from_str(&content)?)
}

#[async_trait]
impl AnalysisBackend for OpenAiBackend {
    async fn analyze(&self, text: &str) -> Result<TenderAnalysis> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let input = truncate_input(text, self.max_input_chars);
        if input.len() < text.len() {
            debug!(
                "Truncated analysis input from {} to {} bytes",
                text.len(),
                input.len()
            );
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(input))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Analysis service returned {}", status);
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let analysis = parse_response(&body)?;
        debug!("Analysis completed with model {}", self.model);
        Ok(analysis)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn backend() -> OpenAiBackend {
        OpenAiBackend::from_config(&OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "http://localhost:9/v1/".to_string(),
            ..OpenAiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(backend().endpoint, "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn test_request_body_uses_strict_schema() {
        let body = backend().request_body("Pliego de condiciones");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert!(body["messages"][1]["content"]
            .as_str()
            .unwrap()
            .ends_with("Pliego de condiciones"));
    }

    #[test]
    fn test_parse_response() {
        let content = serde_json::to_string(&TenderAnalysis {
            summary: "Interventoría vial".to_string(),
            required_experience: "3 contratos".to_string(),
            required_codes: "721015".to_string(),
            personnel_experience: "Director con 10 años".to_string(),
            financial_indicators: "Liquidez >= 1.5".to_string(),
            required_documents: "RUT, RUP".to_string(),
        })
        .unwrap();
        let body = json!({ "choices": [{ "message": { "content": content } }] }).to_string();

        let analysis = parse_response(&body).unwrap();
        assert_eq!(analysis.required_codes, "721015");
    }

    #[test]
    fn test_parse_response_without_content() {
        let body = json!({ "choices": [{ "message": { "content": null } }] }).to_string();
        assert!(matches!(parse_response(&body), Err(AnalysisError::EmptyResponse)));

        let body = json!({ "choices": [] }).to_string();
        assert!(matches!(parse_response(&body), Err(AnalysisError::EmptyResponse)));
    }

    #[test]
    fn test_parse_response_with_wrong_shape() {
        let body = json!({ "choices": [{ "message": { "content": "{\"summary\": 1}" } }] })
            .to_string();
        assert!(matches!(
            parse_response(&body),
            Err(AnalysisError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_before_request() {
        let result = backend().analyze("   \n").await;
        assert!(matches!(result, Err(AnalysisError::EmptyInput)));
    }
}
