use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Role category encoded as the first letter of an employee's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    Tester,
    Developer,
}

impl Role {
    /// Display order of role sections.
    pub const ALL: [Role; 3] = [Role::Manager, Role::Tester, Role::Developer];

    pub fn prefix(self) -> char {
        match self {
            Role::Manager => 'M',
            Role::Tester => 'T',
            Role::Developer => 'D',
        }
    }

    pub fn section_title(self) -> &'static str {
        match self {
            Role::Manager => "Managers",
            Role::Tester => "Testers",
            Role::Developer => "Developers",
        }
    }
}

/// A ranked candidate returned by the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecommendation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Role prefix plus position, e.g. `M1`, `D3`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: String,
    /// 0.0 to 1.0
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendation_level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_strengths: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub why_pick: Option<String>,
}

impl EmployeeRecommendation {
    pub fn role(&self) -> Option<Role> {
        let first = self.rank.chars().next()?;
        Role::ALL.into_iter().find(|role| role.prefix() == first)
    }
}

/// Shortlist counts; `total` drives the headline, the rest is passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShortlistCounts {
    #[serde(default)]
    pub total: u32,
    #[serde(flatten)]
    pub breakdown: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    #[serde(default, deserialize_with = "lenient_counts")]
    pub initial_shortlisted_candidates: ShortlistCounts,
}

/// Project attributes echoed back by the recommendation service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SowData {
    #[serde(default)]
    pub practice: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technology: Vec<String>,
}

/// Full response of the recommendation service. Immutable once received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<EmployeeRecommendation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: RecommendationSummary,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sow_data: SowData,
}

/// `null` decodes like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Anything but an object counts as an empty shortlist. A `total` that is
/// not a non-negative integer reads as 0.
fn lenient_counts<'de, D>(deserializer: D) -> Result<ShortlistCounts, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(mut fields) = Value::deserialize(deserializer)? else {
        return Ok(ShortlistCounts::default());
    };
    let total = fields
        .remove("total")
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);
    Ok(ShortlistCounts {
        total,
        breakdown: fields.into_iter().collect(),
    })
}
