//! Field normalizer: coerces noisy extracted values into clean form values.
//!
//! Every function here is total: unparseable input degrades to an empty
//! string, which the form treats as "unset".

use std::sync::LazyLock;

use regex::Regex;

use crate::models::extraction::ExtractedRecord;
use crate::models::form::{BillingType, Category, Practice, ProjectForm};

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").expect("static date pattern")
});

static YEAR_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}$").expect("static date pattern")
});

static LABEL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:client:|manager:|partner:)\s*").expect("static label pattern")
});

static MANAGER_BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)based on the rules given:\s*manager:\s*").expect("static manager pattern")
});

static HOURS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*budgeted hours\s*").expect("static hours pattern")
});

/// Converts an extracted date into the `YYYY-MM-DD` shape a date input accepts.
///
/// `M/D/YYYY` is zero-padded. An existing `YYYY-M-D` value is passed through
/// untouched, without re-padding. Anything else yields `""`.
pub fn format_date_for_input(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return String::new();
    };

    if let Some(caps) = MONTH_DAY_YEAR.captures(raw) {
        let (month, day, year) = (&caps[1], &caps[2], &caps[3]);
        return format!("{year}-{month:0>2}-{day:0>2}");
    }

    if YEAR_MONTH_DAY.is_match(raw) {
        return raw.to_string();
    }

    String::new()
}

/// Strips one leading `Client:`, `Manager:` or `Partner:` label, then trims.
pub fn clean_string(raw: Option<&str>) -> String {
    match raw {
        Some(s) if !s.is_empty() => LABEL_PREFIX.replace(s, "").trim().to_string(),
        _ => String::new(),
    }
}

/// Strips the "based on the rules given: Manager:" boilerplate the extractor
/// sometimes emits in front of the manager's name.
pub fn clean_manager(raw: Option<&str>) -> String {
    match raw {
        Some(s) if !s.is_empty() => MANAGER_BOILERPLATE.replace(s, "").trim().to_string(),
        _ => String::new(),
    }
}

/// Removes a "Budgeted Hours" label echoed next to the number.
pub fn clean_budgeted_hours(raw: Option<&str>) -> String {
    match raw {
        Some(s) if !s.is_empty() => HOURS_LABEL.replace(s, "").trim().to_string(),
        _ => String::new(),
    }
}

/// Builds a fresh form from an extraction response.
///
/// Dropdown values that match none of the known options stay unset so the
/// validator asks the user to pick one. `keepResourcesAvailable` starts as `false`.
pub fn normalize_record(record: &ExtractedRecord) -> ProjectForm {
    ProjectForm {
        name: record.project_name.clone().unwrap_or_default(),
        practice: record.practice.as_deref().and_then(Practice::from_label),
        technology: record.technology.clone(),
        category: record.category.as_deref().and_then(Category::from_label),
        manager: clean_manager(record.manager.as_deref()),
        client: clean_string(record.client.as_deref()),
        partner: record.partner.clone().unwrap_or_default(),
        billing_type: record
            .billing_type
            .as_deref()
            .and_then(BillingType::from_label),
        status: record.status.clone().unwrap_or_default(),
        budgeted_hours: clean_budgeted_hours(record.budgeted_hours.as_deref()),
        start_date: format_date_for_input(record.start_date.as_deref()),
        end_date: format_date_for_input(record.end_date.as_deref()),
        keep_resources_available: Some(false),
    }
}
