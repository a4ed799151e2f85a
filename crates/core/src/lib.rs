pub mod config;
pub mod fetcher;
pub mod llm;
pub mod metrics;
pub mod picker;
pub mod restaurant;
pub mod session;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig,
};
pub use fetcher::{FetchConfig, FetchError, FetchOutcome, FetchPolicy, FetchSource, RestaurantFetcher};
pub use llm::{CompletionRequest, CompletionResponse, GeminiClient, GeminiConfig, LlmClient, LlmError};
pub use picker::{Picker, PickerConfig, SpinHandle};
pub use restaurant::{
    demo_restaurants, find_map_uri, parse_restaurants, Citation, CitationKind, Coordinates,
    Restaurant, RestaurantParser,
};
pub use session::{LocationError, Session, SessionError, SessionEvent, SessionState};
