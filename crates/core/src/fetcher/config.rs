//! Fetcher configuration.

use serde::{Deserialize, Serialize};

/// What to do when the model call fails or yields no restaurants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPolicy {
    /// Serve the demo restaurants instead. `fetch` never fails.
    /// Unmatched names get a synthesized map search link.
    #[default]
    Graceful,

    /// Report a [`FetchError`](super::FetchError) to the caller.
    /// Unmatched names keep no map link.
    Strict,
}

impl FetchPolicy {
    /// Returns true if the parser should synthesize map links.
    pub fn synthesizes_map_uri(&self) -> bool {
        matches!(self, FetchPolicy::Graceful)
    }
}

/// Configuration for the restaurant fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Failure policy.
    #[serde(default)]
    pub policy: FetchPolicy,

    /// How many restaurants to ask the model for.
    #[serde(default = "default_restaurant_count")]
    pub restaurant_count: u32,

    /// Simulated latency before serving demo data (milliseconds).
    #[serde(default = "default_demo_latency")]
    pub demo_latency_ms: u64,
}

fn default_restaurant_count() -> u32 {
    8
}

fn default_demo_latency() -> u64 {
    2000
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            policy: FetchPolicy::default(),
            restaurant_count: default_restaurant_count(),
            demo_latency_ms: default_demo_latency(),
        }
    }
}
