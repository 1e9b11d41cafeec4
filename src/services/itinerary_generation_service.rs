use log::{debug, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::errors::PipelineError;
use crate::models::{itinerary::Itinerary, trip_request::TripRequest};
use crate::services::itinerary_extractor::extract_json;
use crate::services::itinerary_fetcher::{
    CompletionRequest, ItineraryFetcher, GENERATION_TEMPERATURE, MAX_OUTPUT_TOKENS,
};
use crate::services::itinerary_validator::validate_itinerary;
use crate::services::prompt_builder::build_prompt;

#[derive(Debug, Clone)]
pub struct ItineraryGenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for ItineraryGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: GENERATION_TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// Runs prompt → fetch → extract → validate for a single trip request.
pub struct ItineraryGenerator {
    fetcher: Arc<dyn ItineraryFetcher>,
    config: ItineraryGenerationConfig,
}

impl ItineraryGenerator {
    pub fn new(fetcher: Arc<dyn ItineraryFetcher>) -> Self {
        Self {
            fetcher,
            config: ItineraryGenerationConfig::default(),
        }
    }

    /// Generate an itinerary. Any stage failure is returned as-is; nothing
    /// partial is ever produced.
    pub async fn generate_itinerary(
        &self,
        request: &TripRequest,
        cancel: &CancellationToken,
    ) -> Result<Itinerary, PipelineError> {
        let prompt = build_prompt(request);
        let completion = CompletionRequest {
            prompt,
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        };

        let raw = self.fetcher.fetch(completion, cancel).await?;
        debug!("Received {} bytes of model output", raw.len());

        let candidate = extract_json(&raw).map_err(|e| {
            warn!("No itinerary payload in model output for {}", request.destination);
            e
        })?;

        let itinerary = validate_itinerary(&candidate)?;
        info!(
            "Generated {}-day itinerary for {} ({} day plans)",
            itinerary.total_days,
            request.destination,
            itinerary.days.len()
        );

        Ok(itinerary)
    }
}
