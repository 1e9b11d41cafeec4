use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::FetchError;

pub const GENERATION_TEMPERATURE: f32 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: GENERATION_TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// One call to a text-completion service.
///
/// Implementations issue exactly one request per `fetch` and never retry;
/// retry policy belongs to the caller. A cancelled token must end the call
/// with `FetchError::Cancelled`.
#[async_trait]
pub trait ItineraryFetcher: Send + Sync {
    async fn fetch(
        &self,
        request: CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_defaults() {
        let request = CompletionRequest::new("plan a trip");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_output_tokens, 10000);
    }
}
