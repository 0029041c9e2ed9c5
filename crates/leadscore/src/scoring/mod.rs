//! Hybrid lead scoring workflow: deterministic rules, the external intent
//! classifier seam, canonical-lead selection, and the orchestration service
//! with its HTTP router.

pub mod classifier;
pub mod dedup;
pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{
    ClassifierError, ClassifierVerdict, IntentClassifier, IntentSignal, OpenAiClassifier,
};
pub use dedup::select_canonical;
pub use domain::{IntentLevel, LeadId, LeadProfile, Offer};
pub use repository::{
    LeadIdentity, LeadRecord, LeadRepository, OfferRepository, RepositoryError,
};
pub use router::{scoring_router, ScoringState};
pub use service::{
    LeadScoringService, ScoreBreakdown, ScoredLeadView, ScoringMethod, ScoringRunError,
    ScoringRunReport, SkippedLead,
};
