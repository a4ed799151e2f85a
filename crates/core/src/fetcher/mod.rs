//! Restaurant fetch orchestration.
//!
//! Sends one grounded generation request per fetch, parses the free-text
//! answer, and decides what happens when that fails:
//!
//! - **Graceful** (default): transport errors and empty parses are replaced
//!   by the demo restaurants; callers never see an error.
//! - **Strict**: both surface as a [`FetchError`] and the caller offers a
//!   retry.
//!
//! A fetcher without an LLM client (no API key) always serves the demo
//! restaurants.

mod config;
mod service;
mod types;

pub use config::{FetchConfig, FetchPolicy};
pub use service::{restaurant_prompt, RestaurantFetcher};
pub use types::{FetchError, FetchOutcome, FetchSource};
