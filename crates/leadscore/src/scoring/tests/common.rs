use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::scoring::classifier::{ClassifierVerdict, IntentClassifier, IntentSignal};
use crate::scoring::domain::{IntentLevel, LeadId, LeadProfile, Offer};
use crate::scoring::repository::{
    LeadRecord, LeadRepository, OfferRepository, RepositoryError,
};
use crate::scoring::router::ScoringState;
use crate::scoring::service::LeadScoringService;

pub(super) fn sample_offer() -> Offer {
    Offer {
        name: "Outreach Copilot".to_string(),
        value_props: vec![
            "24/7 automated outreach".to_string(),
            "6x more meetings booked".to_string(),
        ],
        ideal_use_cases: vec!["B2B SaaS".to_string(), "Mid-market recruiters".to_string()],
    }
}

pub(super) fn complete_profile(name: &str, role: &str, company: &str, industry: &str) -> LeadProfile {
    LeadProfile {
        name: name.to_string(),
        role: role.to_string(),
        company: company.to_string(),
        industry: industry.to_string(),
        location: "Austin, TX".to_string(),
        linkedin_bio: "Decade of go-to-market experience".to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLeads {
    records: Arc<Mutex<Vec<LeadRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl LeadRepository for MemoryLeads {
    fn insert(&self, profile: LeadProfile) -> Result<LeadRecord, RepositoryError> {
        let id = LeadId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let record = LeadRecord {
            id,
            profile,
            intent: None,
            score: None,
            reasoning: None,
            created_at: Utc::now(),
        };
        self.records
            .lock()
            .expect("lead store mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn all(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("lead store mutex poisoned")
            .clone())
    }

    fn apply_score(
        &self,
        id: LeadId,
        score: u8,
        intent: IntentLevel,
        reasoning: String,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lead store mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(RepositoryError::NotFound)?;
        record.score = Some(score);
        record.intent = Some(intent);
        record.reasoning = Some(reasoning);
        Ok(())
    }
}

/// Lead store that refuses to persist scores for one named lead, so tests can
/// exercise the skip-and-continue path.
#[derive(Clone)]
pub(super) struct FlakyLeads {
    pub(super) inner: MemoryLeads,
    refuse_for: String,
}

impl FlakyLeads {
    pub(super) fn refusing(refuse_for: &str) -> Self {
        Self {
            inner: MemoryLeads::default(),
            refuse_for: refuse_for.to_string(),
        }
    }
}

impl LeadRepository for FlakyLeads {
    fn insert(&self, profile: LeadProfile) -> Result<LeadRecord, RepositoryError> {
        self.inner.insert(profile)
    }

    fn all(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        self.inner.all()
    }

    fn apply_score(
        &self,
        id: LeadId,
        score: u8,
        intent: IntentLevel,
        reasoning: String,
    ) -> Result<(), RepositoryError> {
        let refuses = self
            .inner
            .all()?
            .iter()
            .any(|record| record.id == id && record.profile.name == self.refuse_for);
        if refuses {
            return Err(RepositoryError::Unavailable("write rejected".to_string()));
        }
        self.inner.apply_score(id, score, intent, reasoning)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryOffers {
    offer: Arc<Mutex<Option<Offer>>>,
}

impl OfferRepository for MemoryOffers {
    fn put(&self, offer: Offer) -> Result<(), RepositoryError> {
        *self.offer.lock().expect("offer store mutex poisoned") = Some(offer);
        Ok(())
    }

    fn current(&self) -> Result<Option<Offer>, RepositoryError> {
        Ok(self
            .offer
            .lock()
            .expect("offer store mutex poisoned")
            .clone())
    }
}

pub(super) fn offers_with(offer: Offer) -> Arc<MemoryOffers> {
    let offers = Arc::new(MemoryOffers::default());
    offers.put(offer).expect("offer stores");
    offers
}

/// Classifier returning the same verdict for every lead.
pub(super) struct CannedClassifier {
    verdict: ClassifierVerdict,
}

impl CannedClassifier {
    pub(super) fn scored(score: u8, label: &str, reasoning: &str) -> Self {
        Self {
            verdict: ClassifierVerdict::Scored(IntentSignal {
                score,
                label: label.to_string(),
                reasoning: reasoning.to_string(),
            }),
        }
    }

    pub(super) fn verdict(verdict: ClassifierVerdict) -> Self {
        Self { verdict }
    }
}

impl IntentClassifier for CannedClassifier {
    fn classify(&self, _lead: &LeadProfile, _offer: &Offer) -> ClassifierVerdict {
        self.verdict.clone()
    }
}

pub(super) fn hybrid_service<L: LeadRepository + 'static>(
    leads: Arc<L>,
    offers: Arc<MemoryOffers>,
    classifier: CannedClassifier,
) -> LeadScoringService<L, MemoryOffers, CannedClassifier> {
    LeadScoringService::new(leads, offers, Some(Arc::new(classifier)))
}

pub(super) fn rule_only_service<L: LeadRepository + 'static>(
    leads: Arc<L>,
    offers: Arc<MemoryOffers>,
) -> LeadScoringService<L, MemoryOffers, CannedClassifier> {
    LeadScoringService::new(leads, offers, None)
}

pub(super) fn router_state(
    leads: Arc<MemoryLeads>,
    offers: Arc<MemoryOffers>,
    classifier: Option<CannedClassifier>,
) -> ScoringState<MemoryLeads, MemoryOffers, CannedClassifier> {
    let service = Arc::new(LeadScoringService::new(
        leads.clone(),
        offers.clone(),
        classifier.map(Arc::new),
    ));
    ScoringState {
        service,
        leads,
        offers,
    }
}
