//! Narrative Client
//!
//! Client for a Gemini-style `generateContent` endpoint that turns a red
//! zone's signal into two plain-English sentences.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::NarrativeRequest;

use crate::config::NarrativeConfig;
use crate::error::{AppError, AppResult};

/// Sampling temperature sent with every request
pub const TEMPERATURE: f32 = 0.4;

/// Output cap; two short sentences fit comfortably
pub const MAX_OUTPUT_TOKENS: u32 = 120;

/// Client for the text-generation service
#[derive(Clone)]
pub struct NarrativeClient {
    api_endpoint: String,
    api_key: Option<String>,
    model: String,
    fallback_model: String,
    http_client: Client,
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Response from `generateContent`
#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentRequest {
    pub fn for_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, empty if absent
    pub fn first_text(&self) -> &str {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
            .unwrap_or("")
    }
}

impl NarrativeClient {
    /// Create a new narrative client
    pub fn new(config: &NarrativeConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            fallback_model: config.fallback_model.clone(),
            http_client,
        })
    }

    /// Whether requests go to the remote service
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Explain a zone in plain English.
    ///
    /// Without an API key this returns the offline text. The preferred model
    /// is tried first and the fallback model once if it fails.
    pub async fn explain(&self, request: &NarrativeRequest) -> AppResult<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(request.offline_text());
        };

        let body = GenerateContentRequest::for_prompt(request.prompt());

        let response = match self.generate(api_key, &self.model, &body).await {
            Ok(response) => response,
            Err(first) => {
                tracing::warn!(
                    zone_id = %request.zone_id,
                    model = %self.model,
                    fallback = %self.fallback_model,
                    "Narrative request failed, retrying with fallback model: {}",
                    first
                );
                self.generate(api_key, &self.fallback_model, &body)
                    .await
                    .map_err(|_| first)?
            }
        };

        Ok(request.finish_reply(response.first_text()))
    }

    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        body: &GenerateContentRequest,
    ) -> AppResult<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.api_endpoint, model);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::NarrativeError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::NarrativeError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::NarrativeError(format!("Failed to parse response: {}", e)))
    }
}
