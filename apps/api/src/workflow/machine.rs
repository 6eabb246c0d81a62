//! Wizard state machine as a pure reducer.
//!
//! `transition` never performs I/O. When a step needs a collaborator it
//! returns an [`Effect`] tagged with a [`Ticket`]; the controller runs the
//! effect and feeds the outcome back as a completion event. `Reset` advances
//! the epoch, so completions issued before it no longer match and are dropped.

use serde::Serialize;

use crate::errors::WorkflowError;
use crate::models::extraction::{ExtractedRecord, UploadedFile};
use crate::models::form::{FormEdit, ProjectForm};
use crate::models::recommendation::RecommendationSet;
use crate::workflow::normalize::normalize_record;
use crate::workflow::validation::validate_form;

pub const PDF_REQUIRED: &str = "Please upload a PDF file";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Upload,
    Form,
    Recommendations,
}

/// Identifies the request an in-flight effect belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub epoch: u64,
    pub step: Step,
}

/// Everything one wizard session knows. Replaced wholesale on every transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    pub step: Step,
    pub file: Option<UploadedFile>,
    pub extracted: Option<ExtractedRecord>,
    pub form: Option<ProjectForm>,
    pub recommendations: Option<RecommendationSet>,
    pub busy: bool,
    pub error: Option<WorkflowError>,
    epoch: u64,
}

impl WizardState {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// A completion is stale once the session was reset or moved on since its request began.
    pub fn is_stale(&self, ticket: Ticket) -> bool {
        !self.busy || ticket.epoch != self.epoch || ticket.step != self.step
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            epoch: self.epoch,
            step: self.step,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    SelectFile(UploadedFile),
    ClearFile,
    Extract,
    Edit(Vec<FormEdit>),
    Submit,
    Reset,
    ExtractionSucceeded {
        ticket: Ticket,
        record: ExtractedRecord,
    },
    ExtractionFailed {
        ticket: Ticket,
        reason: String,
    },
    RecommendationsReceived {
        ticket: Ticket,
        recommendations: RecommendationSet,
    },
    RecommendationFailed {
        ticket: Ticket,
        reason: String,
    },
}

/// A collaborator call the controller must perform on the state's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Extract { ticket: Ticket, file: UploadedFile },
    Recommend { ticket: Ticket, form: ProjectForm },
}

#[derive(Debug)]
pub struct Transition {
    pub state: WizardState,
    pub effect: Option<Effect>,
    /// Error raised by this event, if any. Also stored in `state.error`.
    pub error: Option<WorkflowError>,
}

impl Transition {
    fn settled(state: WizardState) -> Self {
        Self {
            state,
            effect: None,
            error: None,
        }
    }

    /// Records a user-facing error. Leaves `busy` untouched: an in-flight
    /// request still owns it.
    fn failed(mut state: WizardState, error: WorkflowError) -> Self {
        state.error = Some(error.clone());
        Self {
            state,
            effect: None,
            error: Some(error),
        }
    }
}

pub fn transition(mut state: WizardState, event: Event) -> Transition {
    match event {
        Event::SelectFile(file) => {
            if state.step != Step::Upload || state.busy {
                return Transition::settled(state);
            }
            if !file.is_pdf() {
                return Transition::failed(state, WorkflowError::Extraction(PDF_REQUIRED.into()));
            }
            state.file = Some(file);
            state.error = None;
            Transition::settled(state)
        }

        Event::ClearFile => {
            if state.step == Step::Upload && !state.busy {
                state.file = None;
                state.error = None;
            }
            Transition::settled(state)
        }

        Event::Extract => {
            if state.step != Step::Upload || state.busy {
                return Transition::settled(state);
            }
            let Some(file) = state.file.clone().filter(UploadedFile::is_pdf) else {
                return Transition::failed(state, WorkflowError::Extraction(PDF_REQUIRED.into()));
            };
            state.busy = true;
            state.error = None;
            let ticket = state.ticket();
            Transition {
                state,
                effect: Some(Effect::Extract { ticket, file }),
                error: None,
            }
        }

        Event::Edit(edits) => {
            if state.step != Step::Form || state.busy {
                return Transition::settled(state);
            }
            let form = state.form.get_or_insert_with(ProjectForm::default);
            for edit in &edits {
                edit.apply(form);
            }
            state.error = None;
            Transition::settled(state)
        }

        Event::Submit => {
            if state.step != Step::Form || state.busy {
                return Transition::settled(state);
            }
            let form = state.form.clone().unwrap_or_default();
            if let Err(invalid) = validate_form(&form) {
                return Transition::failed(state, WorkflowError::Submission(invalid.to_string()));
            }
            state.busy = true;
            state.error = None;
            let ticket = state.ticket();
            Transition {
                state,
                effect: Some(Effect::Recommend { ticket, form }),
                error: None,
            }
        }

        Event::Reset => Transition::settled(WizardState {
            epoch: state.epoch.wrapping_add(1),
            ..WizardState::default()
        }),

        Event::ExtractionSucceeded { ticket, record } => {
            if state.is_stale(ticket) {
                return Transition::settled(state);
            }
            state.form = Some(normalize_record(&record));
            state.extracted = Some(record);
            state.step = Step::Form;
            state.busy = false;
            state.error = None;
            Transition::settled(state)
        }

        Event::ExtractionFailed { ticket, reason } => {
            if state.is_stale(ticket) {
                return Transition::settled(state);
            }
            state.busy = false;
            Transition::failed(
                state,
                WorkflowError::Extraction(format!("Error extracting SOW data: {reason}")),
            )
        }

        Event::RecommendationsReceived {
            ticket,
            recommendations,
        } => {
            if state.is_stale(ticket) {
                return Transition::settled(state);
            }
            state.recommendations = Some(recommendations);
            state.step = Step::Recommendations;
            state.busy = false;
            state.error = None;
            Transition::settled(state)
        }

        Event::RecommendationFailed { ticket, reason } => {
            if state.is_stale(ticket) {
                return Transition::settled(state);
            }
            state.busy = false;
            Transition::failed(
                state,
                WorkflowError::Submission(format!("Error getting recommendations: {reason}")),
            )
        }
    }
}
