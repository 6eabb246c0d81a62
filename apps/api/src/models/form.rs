use serde::{Deserialize, Serialize};

/// Declares a closed dropdown option set whose serialized form is the display label.
macro_rules! form_options {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Matches a label case-insensitively, ignoring surrounding whitespace.
            pub fn from_label(raw: &str) -> Option<Self> {
                let raw = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label().eq_ignore_ascii_case(raw))
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|option| option.label()).collect()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

form_options! {
    /// Delivery practice that owns the engagement.
    Practice {
        ArtificialIntelligence => "Artificial Intelligence",
        CloudEngineering => "Cloud Engineering",
        Collaboration => "Collaboration",
        CustomDev => "Custom Dev",
        Dynamics365 => "Dynamics 365",
        DataEstateAndDba => "Data Estate and DBA",
        HumanResource => "Human Resource",
        ItInternal => "IT Internal",
        ModernWorkplace => "Modern Workplace",
        BusinessIntelligence => "Business Intelligence",
        UiUx => "UI/UX",
        Recruitment => "Recruitment",
        QualityAssurance => "Quality Assurance",
        Security => "Security",
        Kpo => "KPO",
        ProjectManagement => "Project Management",
        Pmo => "PMO",
        Finance => "Finance",
        Administration => "Administration",
        NetworkEngg => "Network Engg",
        BusinessAnalysis => "Business Analysis",
        SalesAndMarketing => "Sales & Marketing",
        DocumentManagement => "Document Management",
        ResourceManagement => "Resource Management",
        LearningManagementSystem => "Learning Management System",
        AtidanFounders => "Atidan Founders",
    }
}

form_options! {
    Category {
        Project => "Project",
        Pursuit => "Pursuit",
        Support => "Support",
        SupportEngagement => "Support Engagement",
        Training => "Training",
    }
}

form_options! {
    BillingType {
        Retainer => "Retainer",
        FixedPrice => "Fixed Price",
        TimeAndMaterial => "Time & Material",
        // Label spelling is what the recommendation service expects.
        StaffAugmentation => "Staff Augumentation",
        NonBillable => "Non-Billable",
    }
}

/// Scalar fields of a [`ProjectForm`], addressable by their wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Name,
    Manager,
    Client,
    Partner,
    Status,
    Practice,
    Category,
    BillingType,
    BudgetedHours,
    StartDate,
    EndDate,
    KeepResourcesAvailable,
}

impl FormField {
    /// The camelCase key used in the submitted JSON and in validation messages.
    pub fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Manager => "manager",
            FormField::Client => "client",
            FormField::Partner => "partner",
            FormField::Status => "status",
            FormField::Practice => "practice",
            FormField::Category => "category",
            FormField::BillingType => "billingType",
            FormField::BudgetedHours => "budgetedHours",
            FormField::StartDate => "startDate",
            FormField::EndDate => "endDate",
            FormField::KeepResourcesAvailable => "keepResourcesAvailable",
        }
    }
}

/// The user-editable project record posted to the recommendation service.
///
/// Empty strings and `None` both mean "unset". `keep_resources_available`
/// is tri-state: it must be explicitly `Some(true)` or `Some(false)` to submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    pub name: String,
    pub practice: Option<Practice>,
    pub technology: Vec<String>,
    pub category: Option<Category>,
    pub manager: String,
    pub client: String,
    pub partner: String,
    pub billing_type: Option<BillingType>,
    pub status: String,
    pub budgeted_hours: String,
    pub start_date: String,
    pub end_date: String,
    pub keep_resources_available: Option<bool>,
}

impl ProjectForm {
    /// Whether a required field carries a value. Strings count as set when non-empty.
    pub fn is_set(&self, field: FormField) -> bool {
        match field {
            FormField::Name => !self.name.is_empty(),
            FormField::Manager => !self.manager.is_empty(),
            FormField::Client => !self.client.is_empty(),
            FormField::Partner => !self.partner.is_empty(),
            FormField::Status => !self.status.is_empty(),
            FormField::Practice => self.practice.is_some(),
            FormField::Category => self.category.is_some(),
            FormField::BillingType => self.billing_type.is_some(),
            FormField::BudgetedHours => !self.budgeted_hours.is_empty(),
            FormField::StartDate => !self.start_date.is_empty(),
            FormField::EndDate => !self.end_date.is_empty(),
            FormField::KeepResourcesAvailable => self.keep_resources_available.is_some(),
        }
    }

    /// Sets one scalar field from raw input.
    ///
    /// Option fields are cleared by an empty or unrecognised label.
    /// `keepResourcesAvailable` accepts `true`/`yes` and `false`/`no`.
    pub fn set(&mut self, field: FormField, value: &str) {
        match field {
            FormField::Name => self.name = value.to_string(),
            FormField::Manager => self.manager = value.to_string(),
            FormField::Client => self.client = value.to_string(),
            FormField::Partner => self.partner = value.to_string(),
            FormField::Status => self.status = value.to_string(),
            FormField::Practice => self.practice = Practice::from_label(value),
            FormField::Category => self.category = Category::from_label(value),
            FormField::BillingType => self.billing_type = BillingType::from_label(value),
            FormField::BudgetedHours => self.budgeted_hours = value.to_string(),
            FormField::StartDate => self.start_date = value.to_string(),
            FormField::EndDate => self.end_date = value.to_string(),
            FormField::KeepResourcesAvailable => {
                self.keep_resources_available = match value.trim().to_ascii_lowercase().as_str()
                {
                    "true" | "yes" => Some(true),
                    "false" | "no" => Some(false),
                    _ => None,
                }
            }
        }
    }

    /// Appends a technology tag. Blank and duplicate tags are ignored.
    pub fn add_technology(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.technology.iter().any(|t| t == tag) {
            return false;
        }
        self.technology.push(tag.to_string());
        true
    }

    pub fn remove_technology(&mut self, index: usize) -> bool {
        if index >= self.technology.len() {
            return false;
        }
        self.technology.remove(index);
        true
    }
}

/// A single user edit applied to the form step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FormEdit {
    Set { field: FormField, value: String },
    SetKeepResources { value: bool },
    AddTechnology { value: String },
    RemoveTechnology { index: usize },
}

impl FormEdit {
    pub fn apply(&self, form: &mut ProjectForm) {
        match self {
            FormEdit::Set { field, value } => form.set(*field, value),
            FormEdit::SetKeepResources { value } => form.keep_resources_available = Some(*value),
            FormEdit::AddTechnology { value } => {
                form.add_technology(value);
            }
            FormEdit::RemoveTechnology { index } => {
                form.remove_technology(*index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_practice_from_label_is_case_insensitive() {
        assert_eq!(
            Practice::from_label(" cloud engineering "),
            Some(Practice::CloudEngineering)
        );
        assert_eq!(Practice::from_label("UI/UX"), Some(Practice::UiUx));
        assert_eq!(Practice::from_label("Basket Weaving"), None);
        assert_eq!(Practice::from_label(""), None);
    }

    #[test]
    fn test_option_lists_keep_declaration_order() {
        assert_eq!(Practice::labels().len(), 26);
        assert_eq!(Category::labels()[0], "Project");
        assert_eq!(
            BillingType::labels(),
            vec![
                "Retainer",
                "Fixed Price",
                "Time & Material",
                "Staff Augumentation",
                "Non-Billable"
            ]
        );
    }

    #[test]
    fn test_form_serializes_with_camel_case_keys_and_labels() {
        let form = ProjectForm {
            name: "Portal".to_string(),
            practice: Some(Practice::CustomDev),
            billing_type: Some(BillingType::TimeAndMaterial),
            keep_resources_available: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["name"], "Portal");
        assert_eq!(json["practice"], "Custom Dev");
        assert_eq!(json["billingType"], "Time & Material");
        assert_eq!(json["keepResourcesAvailable"], false);
        assert_eq!(json["technology"], serde_json::json!([]));
        assert!(json.get("budgetedHours").is_some());
    }

    #[test]
    fn test_set_enum_field_with_blank_clears_it() {
        let mut form = ProjectForm::default();
        form.set(FormField::Category, "Support");
        assert_eq!(form.category, Some(Category::Support));
        form.set(FormField::Category, "");
        assert_eq!(form.category, None);
    }

    #[test]
    fn test_set_keep_resources_parses_yes_no() {
        let mut form = ProjectForm::default();
        form.set(FormField::KeepResourcesAvailable, "Yes");
        assert_eq!(form.keep_resources_available, Some(true));
        form.set(FormField::KeepResourcesAvailable, "false");
        assert_eq!(form.keep_resources_available, Some(false));
        form.set(FormField::KeepResourcesAvailable, "");
        assert_eq!(form.keep_resources_available, None);
    }

    #[test]
    fn test_add_technology_trims_and_rejects_duplicates() {
        let mut form = ProjectForm::default();
        assert!(form.add_technology("  Rust "));
        assert!(!form.add_technology("Rust"));
        assert!(!form.add_technology("   "));
        assert!(form.add_technology("Azure"));
        assert_eq!(form.technology, vec!["Rust", "Azure"]);
    }

    #[test]
    fn test_remove_technology_ignores_out_of_range() {
        let mut form = ProjectForm {
            technology: vec!["Rust".to_string(), "Azure".to_string()],
            ..Default::default()
        };
        assert!(!form.remove_technology(5));
        assert!(form.remove_technology(0));
        assert_eq!(form.technology, vec!["Azure"]);
    }

    #[test]
    fn test_form_edit_deserializes_tagged_ops() {
        let edits: Vec<FormEdit> = serde_json::from_str(
            r#"[
                {"op": "set", "field": "billingType", "value": "Retainer"},
                {"op": "set_keep_resources", "value": true},
                {"op": "add_technology", "value": "React"},
                {"op": "remove_technology", "index": 0}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            edits[0],
            FormEdit::Set {
                field: FormField::BillingType,
                value: "Retainer".to_string()
            }
        );

        let mut form = ProjectForm::default();
        for edit in &edits {
            edit.apply(&mut form);
        }
        assert_eq!(form.billing_type, Some(BillingType::Retainer));
        assert_eq!(form.keep_resources_available, Some(true));
        assert!(form.technology.is_empty());
    }
}
