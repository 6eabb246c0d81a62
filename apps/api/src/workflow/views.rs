//! View models for the three wizard steps.
//!
//! Derived from `WizardState` only; the browser renders them as-is.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::form::{BillingType, Category, Practice, ProjectForm};
use crate::models::recommendation::{EmployeeRecommendation, RecommendationSet, Role};
use crate::workflow::machine::{Step, WizardState};

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub step: Step,
    pub busy: bool,
    /// Overlay text while a request is in flight.
    pub loader_message: Option<&'static str>,
    pub view: StepView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepView {
    Upload(UploadView),
    Form(FormView),
    Recommendations(RecommendationsView),
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadView {
    pub file_name: Option<String>,
    pub error: Option<String>,
    pub can_analyze: bool,
    pub analyze_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub practice: Vec<&'static str>,
    pub category: Vec<&'static str>,
    pub billing_type: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub form: ProjectForm,
    pub options: FormOptions,
    pub error: Option<String>,
    pub submit_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelBadge {
    HighlyRecommended,
    Recommended,
    Other,
}

impl LevelBadge {
    fn for_level(level: &str) -> Self {
        if level.eq_ignore_ascii_case("highly recommended") {
            LevelBadge::HighlyRecommended
        } else if level == "recommended" {
            LevelBadge::Recommended
        } else {
            LevelBadge::Other
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeCard {
    pub name: String,
    pub rank: String,
    pub match_percent: u32,
    pub recommendation_level: String,
    pub badge: LevelBadge,
    pub key_strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub why_pick: Option<String>,
}

impl From<&EmployeeRecommendation> for EmployeeCard {
    fn from(e: &EmployeeRecommendation) -> Self {
        Self {
            name: e.name.clone(),
            rank: e.rank.clone(),
            match_percent: (e.match_score * 100.0).round().clamp(0.0, 100.0) as u32,
            recommendation_level: e.recommendation_level.clone(),
            badge: LevelBadge::for_level(&e.recommendation_level),
            key_strengths: e.key_strengths.clone(),
            concerns: e.concerns.clone(),
            why_pick: e.why_pick.clone().filter(|w| !w.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleSection {
    pub role: Role,
    pub title: &'static str,
    pub employees: Vec<EmployeeCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectInfo {
    pub practice: Option<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationsView {
    pub headline: String,
    pub recommended_count: usize,
    pub shortlisted_total: u32,
    pub project: ProjectInfo,
    pub sections: Vec<RoleSection>,
}

pub fn render_session(id: Uuid, created_at: DateTime<Utc>, state: &WizardState) -> SessionView {
    let view = match state.step {
        Step::Upload => StepView::Upload(render_upload(state)),
        Step::Form => StepView::Form(render_form(state)),
        Step::Recommendations => StepView::Recommendations(render_recommendations(
            state.recommendations.as_ref().unwrap_or(&RecommendationSet::default()),
        )),
    };

    SessionView {
        session_id: id,
        created_at,
        step: state.step,
        busy: state.busy,
        loader_message: loader_message(state),
        view,
    }
}

fn loader_message(state: &WizardState) -> Option<&'static str> {
    if !state.busy {
        return None;
    }
    Some(match state.step {
        Step::Upload => "Analyzing SOW...",
        _ => "Fetching Recommendations...",
    })
}

fn render_upload(state: &WizardState) -> UploadView {
    UploadView {
        file_name: state.file.as_ref().map(|f| f.file_name.clone()),
        error: state.error.as_ref().map(ToString::to_string),
        can_analyze: state.file.is_some() && !state.busy,
        analyze_label: if state.busy { "Analyzing..." } else { "Analyze SOW" },
    }
}

fn render_form(state: &WizardState) -> FormView {
    FormView {
        form: state.form.clone().unwrap_or_default(),
        options: FormOptions {
            practice: Practice::labels(),
            category: Category::labels(),
            billing_type: BillingType::labels(),
        },
        error: state.error.as_ref().map(ToString::to_string),
        submit_label: if state.busy {
            "Getting Recommendations..."
        } else {
            "Get Recommendations"
        },
    }
}

pub fn render_recommendations(set: &RecommendationSet) -> RecommendationsView {
    let recommended_count = set.recommendations.len();
    let shortlisted_total = set.summary.initial_shortlisted_candidates.total;

    let mut technologies: Vec<String> = Vec::new();
    for tech in &set.sow_data.technology {
        if !technologies.contains(tech) {
            technologies.push(tech.clone());
        }
    }

    let sections = Role::ALL
        .into_iter()
        .filter_map(|role| {
            let employees: Vec<EmployeeCard> = set
                .recommendations
                .iter()
                .filter(|e| e.role() == Some(role))
                .map(EmployeeCard::from)
                .collect();
            (!employees.is_empty()).then(|| RoleSection {
                role,
                title: role.section_title(),
                employees,
            })
        })
        .collect();

    RecommendationsView {
        headline: format!(
            "Found {recommended_count} recommended employees from {shortlisted_total} initially shortlisted candidates"
        ),
        recommended_count,
        shortlisted_total,
        project: ProjectInfo {
            practice: set.sow_data.practice.clone().filter(|p| !p.is_empty()),
            technologies,
        },
        sections,
    }
}
