//! Google Gemini `generateContent` client with maps grounding.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, GeminiConfig, LlmClient, LlmError, LlmUsage};
use crate::metrics::{EXTERNAL_SERVICE_DURATION, LLM_TOKENS};
use crate::restaurant::{Citation, CitationKind};

/// Gemini API client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Build a client from configuration.
    ///
    /// Fails with [`LlmError::NotConfigured`] when no API key is set.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, LlmError> {
        let api_key = config.credential().ok_or(LlmError::NotConfigured)?;
        let timeout = Duration::from_secs(u64::from(config.timeout_secs));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<GeminiToolConfig>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    google_maps: GeminiMapsTool,
}

#[derive(Debug, Serialize)]
struct GeminiMapsTool {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiToolConfig {
    retrieval_config: GeminiRetrievalConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRetrievalConfig {
    lat_lng: GeminiLatLng,
}

#[derive(Debug, Serialize)]
struct GeminiLatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GeminiGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GeminiGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GeminiGroundingChunk {
    #[serde(default)]
    web: Option<GeminiSource>,
    #[serde(default)]
    maps: Option<GeminiSource>,
}

#[derive(Debug, Deserialize)]
struct GeminiSource {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

impl GeminiRequest {
    fn from_completion(request: CompletionRequest) -> Self {
        let (tools, tool_config) = match request.grounding {
            Some(location) => (
                vec![GeminiTool {
                    google_maps: GeminiMapsTool {},
                }],
                Some(GeminiToolConfig {
                    retrieval_config: GeminiRetrievalConfig {
                        lat_lng: GeminiLatLng {
                            latitude: location.latitude,
                            longitude: location.longitude,
                        },
                    },
                }),
            ),
            None => (Vec::new(), None),
        };

        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: request.prompt,
                }],
            }],
            system_instruction: request.system.map(|system| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: system }],
            }),
            tools,
            tool_config,
            generation_config: GeminiGenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        }
    }
}

impl GeminiResponse {
    /// Collapse the first candidate into text plus flattened citations.
    ///
    /// Each grounding chunk contributes its web source, then its maps source.
    fn into_completion(self, fallback_model: &str) -> CompletionResponse {
        let candidate = self.candidates.into_iter().next();

        let (text, citations) = match candidate {
            Some(candidate) => {
                let text = candidate
                    .content
                    .map(|content| {
                        content
                            .parts
                            .into_iter()
                            .filter_map(|part| part.text)
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .unwrap_or_default();

                let citations = candidate
                    .grounding_metadata
                    .map(|metadata| {
                        metadata
                            .grounding_chunks
                            .into_iter()
                            .flat_map(|chunk| {
                                [
                                    chunk.web.map(|s| (CitationKind::Web, s)),
                                    chunk.maps.map(|s| (CitationKind::Maps, s)),
                                ]
                            })
                            .flatten()
                            .map(|(kind, source)| Citation {
                                kind,
                                title: source.title,
                                uri: source.uri,
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                (text, citations)
            }
            None => (String::new(), Vec::new()),
        };

        let usage = self
            .usage_metadata
            .map(|usage| LlmUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            })
            .unwrap_or_default();

        CompletionResponse {
            text,
            citations,
            usage,
            model: self
                .model_version
                .unwrap_or_else(|| fallback_model.to_string()),
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let gemini_request = GeminiRequest::from_completion(request);
        let start = Instant::now();

        let result = self.send(&gemini_request).await;

        let status = if result.is_ok() { "success" } else { "error" };
        EXTERNAL_SERVICE_DURATION
            .with_label_values(&["gemini", status])
            .observe(start.elapsed().as_secs_f64());

        let response = result?;
        LLM_TOKENS
            .with_label_values(&["gemini", "input"])
            .inc_by(u64::from(response.usage.input_tokens));
        LLM_TOKENS
            .with_label_values(&["gemini", "output"])
            .inc_by(u64::from(response.usage.output_tokens));

        debug!(
            "Gemini returned {} chars and {} citations",
            response.text.len(),
            response.citations.len()
        );

        Ok(response)
    }
}

impl GeminiClient {
    async fn send(&self, gemini_request: &GeminiRequest) -> Result<CompletionResponse, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(gemini_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status != 200 {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(LlmError::Api { status, message });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Json(e.to_string()))?;

        Ok(gemini_response.into_completion(&self.model))
    }
}
