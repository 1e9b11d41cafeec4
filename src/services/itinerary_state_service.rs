//! Request lifecycle for itinerary generation
//!
//! `Idle → Loading → Ready | Failed`, reusable for the life of the process.
//! Every submission gets a monotonically increasing request id and
//! supersedes (and cancels) whatever was in flight. Only a completion
//! carrying the latest id may change state; anything else is dropped.

use log::{debug, error, info};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

use crate::errors::{PipelineError, PipelineStage};
use crate::models::{itinerary::Itinerary, trip_request::TripRequest};
use crate::services::itinerary_generation_service::ItineraryGenerator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureReason {
    pub stage: PipelineStage,
    pub message: String,
}

impl From<&PipelineError> for FailureReason {
    fn from(err: &PipelineError) -> Self {
        Self {
            stage: err.stage(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ItineraryState {
    Idle,
    Loading {
        request_id: u64,
        destination: String,
    },
    Ready {
        request_id: u64,
        itinerary: Arc<Itinerary>,
    },
    Failed {
        request_id: u64,
        reason: FailureReason,
    },
}

impl ItineraryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ItineraryState::Loading { .. })
    }

    pub fn itinerary(&self) -> Option<&Arc<Itinerary>> {
        match self {
            ItineraryState::Ready { itinerary, .. } => Some(itinerary),
            _ => None,
        }
    }

    pub fn failure_stage(&self) -> Option<PipelineStage> {
        match self {
            ItineraryState::Failed { reason, .. } => Some(reason.stage),
            _ => None,
        }
    }
}

struct Inner {
    state: ItineraryState,
    latest_id: u64,
    in_flight: Option<CancellationToken>,
    last_request: Option<TripRequest>,
}

struct PipelineTicket {
    request_id: u64,
    request: TripRequest,
    cancel: CancellationToken,
}

enum Begin {
    Started(PipelineTicket),
    NoInput(u64),
}

pub struct ItineraryStateMachine {
    generator: ItineraryGenerator,
    inner: Mutex<Inner>,
}

impl ItineraryStateMachine {
    pub fn new(generator: ItineraryGenerator) -> Self {
        Self {
            generator,
            inner: Mutex::new(Inner {
                state: ItineraryState::Idle,
                latest_id: 0,
                in_flight: None,
                last_request: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ItineraryState {
        self.lock().state.clone()
    }

    pub fn current_itinerary(&self) -> Option<Arc<Itinerary>> {
        self.lock().state.itinerary().cloned()
    }

    pub fn latest_request_id(&self) -> u64 {
        self.lock().latest_id
    }

    pub fn last_request(&self) -> Option<TripRequest> {
        self.lock().last_request.clone()
    }

    fn begin(&self, request: Option<TripRequest>) -> Begin {
        let mut inner = self.lock();
        inner.latest_id += 1;
        let request_id = inner.latest_id;

        if let Some(previous) = inner.in_flight.take() {
            info!("Request {} supersedes the in-flight request", request_id);
            previous.cancel();
        }

        let Some(request) = request else {
            error!("Request {} has no trip request; not calling the model", request_id);
            inner.last_request = None;
            inner.state = ItineraryState::Failed {
                request_id,
                reason: FailureReason::from(&PipelineError::InputMissing),
            };
            return Begin::NoInput(request_id);
        };

        info!("Request {}: planning trip to {}", request_id, request.destination);
        let cancel = CancellationToken::new();
        inner.in_flight = Some(cancel.clone());
        inner.last_request = Some(request.clone());
        inner.state = ItineraryState::Loading {
            request_id,
            destination: request.destination.clone(),
        };

        Begin::Started(PipelineTicket {
            request_id,
            request,
            cancel,
        })
    }

    /// Applies a pipeline result. Returns `false` when the result belongs to
    /// a superseded or cancelled request and was dropped.
    pub fn complete(&self, request_id: u64, result: Result<Itinerary, PipelineError>) -> bool {
        let mut inner = self.lock();
        let is_current = inner.latest_id == request_id
            && matches!(inner.state, ItineraryState::Loading { request_id: id, .. } if id == request_id);
        if !is_current {
            debug!(
                "Dropping stale response for request {} (latest is {})",
                request_id, inner.latest_id
            );
            return false;
        }

        inner.in_flight = None;
        inner.state = match result {
            Ok(itinerary) => ItineraryState::Ready {
                request_id,
                itinerary: Arc::new(itinerary),
            },
            Err(err) => {
                error!("Request {} failed at {} stage: {}", request_id, err.stage(), err);
                ItineraryState::Failed {
                    request_id,
                    reason: FailureReason::from(&err),
                }
            }
        };
        true
    }

    async fn execute(&self, ticket: PipelineTicket) {
        let result = self
            .generator
            .generate_itinerary(&ticket.request, &ticket.cancel)
            .await;
        self.complete(ticket.request_id, result);
    }

    /// Runs the whole pipeline inline and returns the state afterwards.
    pub async fn run(&self, request: Option<TripRequest>) -> ItineraryState {
        if let Begin::Started(ticket) = self.begin(request) {
            self.execute(ticket).await;
        }
        self.state()
    }

    /// Starts the pipeline on the runtime and returns the request id right
    /// away. The state is `Loading` (or `Failed` for missing input) on return.
    pub fn submit(self: &Arc<Self>, request: Option<TripRequest>) -> u64 {
        match self.begin(request) {
            Begin::Started(ticket) => {
                let request_id = ticket.request_id;
                let machine = Arc::clone(self);
                tokio::spawn(async move {
                    machine.execute(ticket).await;
                });
                request_id
            }
            Begin::NoInput(request_id) => request_id,
        }
    }

    /// Resubmits the last trip request. `None` when nothing was submitted yet.
    pub fn retry(self: &Arc<Self>) -> Option<u64> {
        let request = self.last_request()?;
        info!("Retrying trip to {}", request.destination);
        Some(self.submit(Some(request)))
    }

    /// Abandons the in-flight request and returns to `Idle`. A result that
    /// arrives afterwards is dropped.
    pub fn cancel(&self) {
        let mut inner = self.lock();
        inner.latest_id += 1;
        if let Some(token) = inner.in_flight.take() {
            info!("Cancelling in-flight itinerary request");
            token.cancel();
        }
        inner.state = ItineraryState::Idle;
    }
}
