//! Restaurant fetcher: prompt the model, parse the answer, apply the policy.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::llm::{CompletionRequest, GeminiClient, GeminiConfig, LlmClient, LlmError};
use crate::metrics::{FETCH_TOTAL, PARSED_RESTAURANTS};
use crate::restaurant::{Coordinates, RestaurantParser, FIELD_SEPARATOR};

use super::config::{FetchConfig, FetchPolicy};
use super::types::{FetchError, FetchOutcome};

/// Build the instruction sent to the model for a location.
pub fn restaurant_prompt(coords: Coordinates, count: u32) -> String {
    format!(
        "Find {count} popular restaurants near latitude {lat}, longitude {lng}.\n\
         \n\
         Instructions:\n\
         1. Provide a diverse mix of cuisines.\n\
         2. Strictly use this format for each line:\n\
         Name {sep} Cuisine Type {sep} Short description\n\
         \n\
         Example:\n\
         Joe's Pizza {sep} Italian {sep} Famous for their thin crust.",
        count = count,
        lat = coords.latitude,
        lng = coords.longitude,
        sep = FIELD_SEPARATOR,
    )
}

/// Generation settings forwarded with each request.
#[derive(Debug, Clone, Copy)]
struct Generation {
    max_tokens: u32,
    temperature: f32,
}

impl Default for Generation {
    fn default() -> Self {
        let defaults = GeminiConfig::default();
        Self {
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }
}

/// Fetches nearby restaurants from an LLM collaborator.
///
/// Without a client the fetcher runs in demo mode and serves the canned
/// restaurants. With one, each [`fetch`](Self::fetch) sends one grounded
/// request, with no internal retry, and applies the configured
/// [`FetchPolicy`] to failures.
pub struct RestaurantFetcher {
    config: FetchConfig,
    client: Option<Arc<dyn LlmClient>>,
    parser: RestaurantParser,
    generation: Generation,
}

impl RestaurantFetcher {
    /// Create a fetcher. Pass `None` as the client for demo mode.
    pub fn new(config: FetchConfig, client: Option<Arc<dyn LlmClient>>) -> Self {
        let parser =
            RestaurantParser::new().with_synthesized_map_uri(config.policy.synthesizes_map_uri());
        Self {
            config,
            client,
            parser,
            generation: Generation::default(),
        }
    }

    /// Create a fetcher from configuration.
    ///
    /// A Gemini client is built only when an API key is configured;
    /// otherwise the fetcher is in demo mode.
    pub fn from_config(
        config: &FetchConfig,
        gemini: Option<&GeminiConfig>,
    ) -> Result<Self, LlmError> {
        let client: Option<Arc<dyn LlmClient>> = match gemini {
            Some(gemini) if gemini.credential().is_some() => {
                info!("Using Gemini model {}", gemini.model);
                Some(Arc::new(GeminiClient::from_config(gemini)?))
            }
            _ => {
                warn!("No Gemini API key configured, running in demo mode");
                None
            }
        };

        let mut fetcher = Self::new(config.clone(), client);
        if let Some(gemini) = gemini {
            fetcher.generation = Generation {
                max_tokens: gemini.max_tokens,
                temperature: gemini.temperature,
            };
        }
        Ok(fetcher)
    }

    /// Whether this fetcher serves demo data only.
    pub fn is_demo(&self) -> bool {
        self.client.is_none()
    }

    /// The failure policy in effect.
    pub fn policy(&self) -> FetchPolicy {
        self.config.policy
    }

    /// Fetch restaurants near `coords`.
    ///
    /// Under [`FetchPolicy::Graceful`] this never returns an error.
    pub async fn fetch(&self, coords: Coordinates) -> Result<FetchOutcome, FetchError> {
        let Some(client) = &self.client else {
            if self.config.demo_latency_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.demo_latency_ms)).await;
            }
            FETCH_TOTAL.with_label_values(&["demo"]).inc();
            return Ok(FetchOutcome::demo());
        };

        info!(
            "Fetching restaurants near ({}, {}) from {}",
            coords.latitude,
            coords.longitude,
            client.provider()
        );

        match self.fetch_live(client.as_ref(), coords).await {
            Ok(outcome) => {
                FETCH_TOTAL.with_label_values(&["live"]).inc();
                Ok(outcome)
            }
            Err(e) => match self.config.policy {
                FetchPolicy::Graceful => {
                    warn!("Restaurant fetch failed, serving demo restaurants: {}", e);
                    FETCH_TOTAL.with_label_values(&["fallback"]).inc();
                    Ok(FetchOutcome::fallback())
                }
                FetchPolicy::Strict => {
                    warn!("Restaurant fetch failed: {}", e);
                    FETCH_TOTAL.with_label_values(&["error"]).inc();
                    Err(e)
                }
            },
        }
    }

    async fn fetch_live(
        &self,
        client: &dyn LlmClient,
        coords: Coordinates,
    ) -> Result<FetchOutcome, FetchError> {
        let request = CompletionRequest::new(restaurant_prompt(coords, self.config.restaurant_count))
            .with_max_tokens(self.generation.max_tokens)
            .with_temperature(self.generation.temperature)
            .with_maps_grounding(coords);

        let response = client.complete(request).await?;
        let restaurants = self.parser.parse(&response.text, &response.citations);
        PARSED_RESTAURANTS.inc_by(restaurants.len() as u64);

        if restaurants.is_empty() {
            return Err(FetchError::NoResults);
        }

        info!(
            "Parsed {} restaurants ({} citations)",
            restaurants.len(),
            response.citations.len()
        );
        Ok(FetchOutcome::live(restaurants))
    }
}
