use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::WorkflowError;
use crate::models::extraction::UploadedFile;
use crate::models::form::FormEdit;
use crate::sow_client::SowService;
use crate::workflow::machine::{transition, Effect, Event, Ticket, Transition, WizardState};

/// Owns one wizard session and is the only writer of its state.
///
/// The state lock is never held across a collaborator call. A request is
/// begun under the lock, awaited without it, and its completion applied
/// under the lock again. A `reset` can therefore land mid-request, and the
/// reducer's ticket check drops the late response.
pub struct WorkflowController {
    id: Uuid,
    created_at: DateTime<Utc>,
    state: Mutex<WizardState>,
    service: Arc<dyn SowService>,
}

struct Dispatched {
    snapshot: WizardState,
    effect: Option<Effect>,
    error: Option<WorkflowError>,
}

impl Dispatched {
    fn into_result(self) -> Result<WizardState, WorkflowError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.snapshot),
        }
    }
}

impl WorkflowController {
    pub fn new(service: Arc<dyn SowService>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            state: Mutex::new(WizardState::default()),
            service,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub async fn snapshot(&self) -> WizardState {
        self.state.lock().await.clone()
    }

    pub async fn select_file(&self, file: UploadedFile) -> Result<WizardState, WorkflowError> {
        self.dispatch(Event::SelectFile(file)).await.into_result()
    }

    pub async fn clear_file(&self) -> Result<WizardState, WorkflowError> {
        self.dispatch(Event::ClearFile).await.into_result()
    }

    pub async fn edit(&self, edits: Vec<FormEdit>) -> Result<WizardState, WorkflowError> {
        self.dispatch(Event::Edit(edits)).await.into_result()
    }

    /// Returns to the upload step, discarding everything and orphaning any
    /// request still in flight.
    pub async fn reset(&self) -> WizardState {
        let done = self.dispatch(Event::Reset).await;
        info!(session = %self.id, epoch = done.snapshot.epoch(), "session reset");
        done.snapshot
    }

    /// Upload → Form. A no-op while a request is already in flight.
    pub async fn extract(&self) -> Result<WizardState, WorkflowError> {
        let begun = self.dispatch(Event::Extract).await;
        let Some(Effect::Extract { ticket, file }) = begun.effect.clone() else {
            return begun.into_result();
        };

        info!(session = %self.id, file = %file.file_name, "extracting SOW fields");
        let completion = match self.service.extract_sow(&file).await {
            Ok(record) => Event::ExtractionSucceeded { ticket, record },
            Err(e) => {
                warn!(session = %self.id, error = %e, "SOW extraction failed");
                Event::ExtractionFailed {
                    ticket,
                    reason: e.to_string(),
                }
            }
        };

        self.complete(ticket, completion).await
    }

    /// Form → Recommendations. Validation runs before any request is made.
    pub async fn submit(&self) -> Result<WizardState, WorkflowError> {
        let begun = self.dispatch(Event::Submit).await;
        let Some(Effect::Recommend { ticket, form }) = begun.effect.clone() else {
            return begun.into_result();
        };

        info!(session = %self.id, project = %form.name, "requesting recommendations");
        let completion = match self.service.recommend_employees(&form).await {
            Ok(recommendations) => Event::RecommendationsReceived {
                ticket,
                recommendations,
            },
            Err(e) => {
                warn!(session = %self.id, error = %e, "recommendation request failed");
                Event::RecommendationFailed {
                    ticket,
                    reason: e.to_string(),
                }
            }
        };

        self.complete(ticket, completion).await
    }

    async fn complete(&self, ticket: Ticket, event: Event) -> Result<WizardState, WorkflowError> {
        let mut state = self.state.lock().await;
        if state.is_stale(ticket) {
            info!(
                session = %self.id,
                ticket_epoch = ticket.epoch,
                current_epoch = state.epoch(),
                "discarding stale collaborator response"
            );
            return Ok(state.clone());
        }
        Self::apply(&mut state, event).into_result()
    }

    async fn dispatch(&self, event: Event) -> Dispatched {
        let mut state = self.state.lock().await;
        Self::apply(&mut state, event)
    }

    fn apply(state: &mut WizardState, event: Event) -> Dispatched {
        let before = state.step;
        let Transition {
            state: next,
            effect,
            error,
        } = transition(std::mem::take(state), event);
        *state = next;

        debug!(
            from = ?before,
            to = ?state.step,
            busy = state.busy,
            has_effect = effect.is_some(),
            "applied workflow event"
        );

        Dispatched {
            snapshot: state.clone(),
            effect,
            error,
        }
    }
}
