//! Testing utilities and mock implementations.
//!
//! This module provides a mock of the LLM collaborator so the fetcher,
//! session and HTTP API can be exercised without a Gemini key.
//!
//! # Example
//!
//! ```rust,ignore
//! use foodradar_core::testing::{fixtures, MockLlmClient};
//!
//! let llm = MockLlmClient::new();
//! llm.set_text(fixtures::triple_lines(&["Sushi Zen", "Taco Fiesta"])).await;
//! ```

mod mock_llm;

pub use mock_llm::{MockLlmClient, RecordedCompletion};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::restaurant::{map_search_uri, Coordinates, Restaurant};

    /// Coordinates in central Milan.
    pub fn milan() -> Coordinates {
        Coordinates::new(45.4642, 9.19)
    }

    /// Create a test restaurant with reasonable defaults.
    pub fn restaurant(name: &str, cuisine: &str) -> Restaurant {
        Restaurant {
            id: format!("test-{}", name.to_lowercase().replace(' ', "-")),
            name: name.to_string(),
            cuisine: cuisine.to_string(),
            description: format!("{} serving {} food.", name, cuisine.to_lowercase()),
            map_uri: Some(map_search_uri(name)),
        }
    }

    /// Triple-field lines for the given names, as a model would answer.
    pub fn triple_lines(names: &[&str]) -> String {
        names
            .iter()
            .map(|name| format!("{} || Local || Nice place.", name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
