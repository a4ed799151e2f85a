//! Types for the restaurant fetcher.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmError;
use crate::restaurant::{demo_restaurants, Restaurant};

/// Errors surfaced by a strict fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The model call failed.
    #[error("could not reach the restaurant service: {0}")]
    Transport(#[from] LlmError),

    /// The model answered but no restaurant survived parsing.
    #[error("no restaurants found nearby")]
    NoResults,
}

/// Where a fetch result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchSource {
    /// Parsed from a live model answer.
    Live,
    /// No credential configured.
    Demo,
    /// The live call failed and the demo data stood in.
    Fallback,
}

impl FetchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchSource::Live => "live",
            FetchSource::Demo => "demo",
            FetchSource::Fallback => "fallback",
        }
    }
}

/// Restaurants from one fetch, in the order they were produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchOutcome {
    pub restaurants: Vec<Restaurant>,
    pub source: FetchSource,
}

impl FetchOutcome {
    pub fn live(restaurants: Vec<Restaurant>) -> Self {
        Self {
            restaurants,
            source: FetchSource::Live,
        }
    }

    pub fn demo() -> Self {
        Self {
            restaurants: demo_restaurants(),
            source: FetchSource::Demo,
        }
    }

    pub fn fallback() -> Self {
        Self {
            restaurants: demo_restaurants(),
            source: FetchSource::Fallback,
        }
    }
}
