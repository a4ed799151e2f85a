use std::sync::Arc;

use foodradar_core::{
    Config, LlmError, Picker, RestaurantFetcher, SanitizedConfig, Session,
};

/// Shared application state
pub struct AppState {
    config: Config,
    fetcher: Arc<RestaurantFetcher>,
    picker: Picker,
}

impl AppState {
    pub fn new(config: Config, fetcher: RestaurantFetcher) -> Self {
        let picker = Picker::new(config.picker.clone());
        Self {
            config,
            fetcher: Arc::new(fetcher),
            picker,
        }
    }

    /// Build the state from configuration, creating the Gemini client if a
    /// key is configured.
    pub fn from_config(config: Config) -> Result<Self, LlmError> {
        let fetcher = RestaurantFetcher::from_config(&config.fetch, config.gemini.as_ref())?;
        Ok(Self::new(config, fetcher))
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn fetcher(&self) -> &Arc<RestaurantFetcher> {
        &self.fetcher
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    /// A fresh session for one client connection.
    pub fn new_session(&self) -> Session {
        Session::new(self.picker.clone())
    }
}
