use serde::{Deserialize, Serialize};

/// Identifier wrapper for stored leads. Ids are handed out by the repository
/// in strictly increasing order, so comparing ids compares creation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LeadId(pub u64);

/// The product being sold, as pitched to prospects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub name: String,
    pub value_props: Vec<String>,
    pub ideal_use_cases: Vec<String>,
}

/// The six profile fields scoring consumes. Any field may be empty; emptiness
/// costs completeness points rather than raising an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadProfile {
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: String,
    pub location: String,
    #[serde(default)]
    pub linkedin_bio: String,
}

impl LeadProfile {
    /// True when every profile field carries something beyond whitespace.
    pub fn is_complete(&self) -> bool {
        [
            &self.name,
            &self.role,
            &self.company,
            &self.industry,
            &self.location,
            &self.linkedin_bio,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// Buying-intent tier derived from the combined 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentLevel {
    High,
    Medium,
    Low,
}

impl IntentLevel {
    /// Threshold rule: 70 and above is High, 40 and above is Medium.
    pub fn for_score(score: u8) -> Self {
        if score >= 70 {
            IntentLevel::High
        } else if score >= 40 {
            IntentLevel::Medium
        } else {
            IntentLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            IntentLevel::High => "High",
            IntentLevel::Medium => "Medium",
            IntentLevel::Low => "Low",
        }
    }
}
