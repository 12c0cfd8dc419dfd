use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Failure taxonomy for the fallback capability. `Unconfigured` and runtime
/// failures are distinguished explicitly because they map to different
/// user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("fallback model is not configured")]
    Unconfigured,
    #[error("{0}")]
    Request(String),
    #[error("model returned no usable text")]
    EmptyResponse,
}

/// Single-shot text-completion capability: a system instruction plus user
/// text in, completion text out. One blocking round trip, no retries.
pub trait CompletionProvider: Send + Sync {
    fn is_configured(&self) -> bool;
    async fn complete(
        &self,
        system_instruction: &str,
        user_text: &str,
    ) -> Result<String, FallbackError>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(6),
            timeout: Duration::from_secs(20),
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("WAYFINDER_GEMINI_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let model =
            env::var("WAYFINDER_GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url =
            env::var("WAYFINDER_GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            api_key,
            model,
            base_url,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

/// Gemini `generateContent` client. Missing credentials are a first-class
/// state: `complete` short-circuits to `Unconfigured` without touching the
/// network.
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, FallbackError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|error| FallbackError::Request(error.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self, FallbackError> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn generate_url(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, api_key
        )
    }
}

impl CompletionProvider for GeminiClient {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn complete(
        &self,
        system_instruction: &str,
        user_text: &str,
    ) -> Result<String, FallbackError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(FallbackError::Unconfigured);
        };

        let request = GenerateContentRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part {
                    text: user_text.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url(api_key))
            .json(&request)
            .send()
            .await
            .map_err(|error| FallbackError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FallbackError::Request(format!(
                "model endpoint returned {status}: {detail}"
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|error| FallbackError::Request(error.to_string()))?;

        let text = payload
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .filter(|text| !text.is_empty());

        text.ok_or(FallbackError::EmptyResponse)
    }
}
