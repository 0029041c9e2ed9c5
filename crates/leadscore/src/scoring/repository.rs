use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{IntentLevel, LeadId, LeadProfile, Offer};

/// Stored lead row: the immutable profile plus mutable scoring outcome.
///
/// Re-uploads of the same person create new rows; old rows are kept and
/// deduplication decides which row is canonical at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: LeadId,
    pub profile: LeadProfile,
    pub intent: Option<IntentLevel>,
    pub score: Option<u8>,
    pub reasoning: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LeadRecord {
    pub fn identity(&self) -> LeadIdentity {
        LeadIdentity {
            company: self.profile.company.clone(),
            name: self.profile.name.clone(),
        }
    }

    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

/// Deduplication key: exact, case-sensitive (company, name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeadIdentity {
    pub company: String,
    pub name: String,
}

/// Storage abstraction so the scoring pipeline can be exercised in isolation.
pub trait LeadRepository: Send + Sync {
    /// Store a new lead row, assigning the next id and creation timestamp.
    fn insert(&self, profile: LeadProfile) -> Result<LeadRecord, RepositoryError>;
    /// Snapshot of every stored row, scored or not.
    fn all(&self) -> Result<Vec<LeadRecord>, RepositoryError>;
    /// Write a scoring outcome onto one row.
    fn apply_score(
        &self,
        id: LeadId,
        score: u8,
        intent: IntentLevel,
        reasoning: String,
    ) -> Result<(), RepositoryError>;
}

/// Storage for the single active offer. `put` replaces any existing offer.
pub trait OfferRepository: Send + Sync {
    fn put(&self, offer: Offer) -> Result<(), RepositoryError>;
    fn current(&self) -> Result<Option<Offer>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
