use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use leadscore::scoring::{
    IntentLevel, LeadId, LeadProfile, LeadRecord, LeadRepository, Offer, OfferRepository,
    RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Append-only lead store. Rows are never deleted; re-uploads of the same
/// person pile up and deduplication picks the newest at read time.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<Vec<LeadRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl LeadRepository for InMemoryLeadRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryOfferRepository {
    offer: Arc<Mutex<Option<Offer>>>,
}

impl OfferRepository for InMemoryOfferRepository {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> LeadProfile {
        LeadProfile {
            name: name.to_string(),
            role: "CTO".to_string(),
            company: "Acme".to_string(),
            industry: "B2B SaaS".to_string(),
            location: "NYC".to_string(),
            linkedin_bio: String::new(),
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let repository = InMemoryLeadRepository::default();
        let first = repository.insert(profile("Mira Shah")).expect("insert");
        let second = repository.insert(profile("Mira Shah")).expect("insert");
        assert!(second.id > first.id);
        assert_eq!(repository.all().expect("snapshot").len(), 2);
    }

    #[test]
    fn apply_score_targets_one_row() {
        let repository = InMemoryLeadRepository::default();
        let first = repository.insert(profile("Mira Shah")).expect("insert");
        let second = repository.insert(profile("Noah Kim")).expect("insert");

        repository
            .apply_score(second.id, 60, IntentLevel::Medium, "ok".to_string())
            .expect("score applies");

        let snapshot = repository.all().expect("snapshot");
        assert!(snapshot
            .iter()
            .find(|record| record.id == first.id)
            .expect("first row")
            .score
            .is_none());
        assert_eq!(
            snapshot
                .iter()
                .find(|record| record.id == second.id)
                .expect("second row")
                .score,
            Some(60)
        );
    }

    #[test]
    fn offer_put_replaces_previous() {
        let repository = InMemoryOfferRepository::default();
        assert!(repository.current().expect("read").is_none());

        let offer = Offer {
            name: "Outreach Copilot".to_string(),
            value_props: vec!["fast".to_string()],
            ideal_use_cases: vec!["B2B SaaS".to_string()],
        };
        repository.put(offer.clone()).expect("store");

        let mut updated = offer;
        updated.name = "Outreach Copilot Pro".to_string();
        repository.put(updated.clone()).expect("replace");

        assert_eq!(
            repository.current().expect("read").expect("offer").name,
            "Outreach Copilot Pro"
        );
    }
}
