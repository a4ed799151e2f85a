//! Mock LLM client for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, LlmUsage};
use crate::restaurant::Citation;

/// A recorded completion request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedCompletion {
    /// The request that was sent.
    pub request: CompletionRequest,
    /// When the request was made.
    pub timestamp: std::time::Instant,
}

/// Mock implementation of the LlmClient trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable text and citations
/// - Track requests for assertions
/// - Simulate failures and delays
///
/// # Example
///
/// ```rust,ignore
/// use foodradar_core::testing::MockLlmClient;
///
/// let llm = MockLlmClient::new();
/// llm.set_text("Sushi Zen || Japanese || Fresh rolls").await;
///
/// let fetcher = RestaurantFetcher::new(FetchConfig::default(), Some(Arc::new(llm.clone())));
/// let outcome = fetcher.fetch(coords).await?;
/// assert_eq!(outcome.restaurants[0].name, "Sushi Zen");
/// assert_eq!(llm.recorded_requests().await.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Text returned by `complete`.
    text: Arc<RwLock<String>>,
    /// Citations returned alongside the text.
    citations: Arc<RwLock<Vec<Citation>>>,
    /// Recorded requests.
    requests: Arc<RwLock<Vec<RecordedCompletion>>>,
    /// If set, the next request will fail with this error.
    next_error: Arc<RwLock<Option<LlmError>>>,
    /// Simulated response delay.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockLlmClient {
    /// Create a new mock client answering with empty text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client answering with `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Arc::new(RwLock::new(text.into())),
            ..Self::default()
        }
    }

    /// Set the text to return for subsequent requests.
    pub async fn set_text(&self, text: impl Into<String>) {
        *self.text.write().await = text.into();
    }

    /// Set the citations to return for subsequent requests.
    pub async fn set_citations(&self, citations: Vec<Citation>) {
        *self.citations.write().await = citations;
    }

    /// Make the next request fail with the given error.
    pub async fn fail_next(&self, error: LlmError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every response by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded requests.
    pub async fn recorded_requests(&self) -> Vec<RecordedCompletion> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.write().await.push(RecordedCompletion {
            request,
            timestamp: std::time::Instant::now(),
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(CompletionResponse {
            text: self.text.read().await.clone(),
            citations: self.citations.read().await.clone(),
            usage: LlmUsage::default(),
            model: "mock-model".to_string(),
        })
    }
}
