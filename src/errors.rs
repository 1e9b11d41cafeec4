use serde::Serialize;
use std::fmt;

/// Transport-level failures of the completion call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("completion service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("request was cancelled")]
    Cancelled,

    #[error("empty response from completion service")]
    EmptyResponse,

    #[error("unexpected completion response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::HttpStatus(status.as_u16()),
            // The request URL is dropped so the message is safe to show callers
            None => FetchError::Network(err.without_url().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("no JSON payload found in model output")]
    NoJsonFound,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("schema violation at `{0}`")]
    SchemaViolation(String),
}

/// Any failure of a single itinerary pipeline run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("no trip request supplied")]
    InputMissing,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Validate(#[from] ValidationError),
}

impl PipelineError {
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::InputMissing => PipelineStage::Input,
            PipelineError::Fetch(_) => PipelineStage::Fetch,
            PipelineError::Extract(_) => PipelineStage::Extract,
            PipelineError::Validate(_) => PipelineStage::Validate,
        }
    }
}

/// The pipeline stage a failure originated from, kept for user messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineStage {
    #[serde(rename = "no input")]
    Input,
    #[serde(rename = "fetch")]
    Fetch,
    #[serde(rename = "extract")]
    Extract,
    #[serde(rename = "validate")]
    Validate,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Input => "no input",
            PipelineStage::Fetch => "fetch",
            PipelineStage::Extract => "extract",
            PipelineStage::Validate => "validate",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TripRequestError {
    #[error("destination must not be empty")]
    EmptyDestination,

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("budget must be positive, got {0}")]
    NonPositiveBudget(f64),

    #[error("travelers must be between 1 and 20, got {0}")]
    TravelersOutOfRange(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapLoadError {
    #[error("GOOGLE_MAPS_API_KEY is not configured")]
    MissingApiKey,

    #[error("invalid map library url: {0}")]
    InvalidUrl(String),
}
