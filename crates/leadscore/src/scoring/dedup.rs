use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::repository::{LeadIdentity, LeadRecord};

/// Pick exactly one canonical row per (company, name) identity: the one with
/// the largest id, i.e. the most recently created.
///
/// With `scored_only`, unscored rows are discarded before grouping so an
/// unscored duplicate can never shadow a scored canonical row (and vice
/// versa). Pure selection over the snapshot; nothing is mutated or deleted.
pub fn select_canonical(leads: &[LeadRecord], scored_only: bool) -> Vec<LeadRecord> {
    let mut canonical: HashMap<LeadIdentity, &LeadRecord> = HashMap::new();

    for lead in leads {
        if scored_only && !lead.is_scored() {
            continue;
        }
        match canonical.entry(lead.identity()) {
            Entry::Occupied(mut slot) => {
                if lead.id > slot.get().id {
                    slot.insert(lead);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(lead);
            }
        }
    }

    let mut selected: Vec<LeadRecord> = canonical.into_values().cloned().collect();
    selected.sort_by_key(|lead| lead.id);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{IntentLevel, LeadId, LeadProfile};
    use chrono::Utc;

    fn record(id: u64, name: &str, company: &str, score: Option<u8>) -> LeadRecord {
        LeadRecord {
            id: LeadId(id),
            profile: LeadProfile {
                name: name.to_string(),
                role: "CTO".to_string(),
                company: company.to_string(),
                industry: "Fintech".to_string(),
                location: "Berlin".to_string(),
                linkedin_bio: String::new(),
            },
            intent: score.map(|_| IntentLevel::Medium),
            score,
            reasoning: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn latest_row_wins_per_identity() {
        let rows = vec![
            record(1, "Mira Shah", "Acme", None),
            record(2, "Noah Kim", "Acme", None),
            record(3, "Mira Shah", "Acme", None),
        ];

        let selected = select_canonical(&rows, false);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].id, LeadId(2));
        assert_eq!(selected[1].id, LeadId(3));
    }

    #[test]
    fn identity_is_case_sensitive_and_company_scoped() {
        let rows = vec![
            record(1, "Mira Shah", "Acme", None),
            record(2, "mira shah", "Acme", None),
            record(3, "Mira Shah", "Globex", None),
        ];

        assert_eq!(select_canonical(&rows, false).len(), 3);
    }

    #[test]
    fn scored_only_filters_before_grouping() {
        // A newer unscored row must not shadow the older scored row.
        let rows = vec![
            record(1, "Mira Shah", "Acme", Some(60)),
            record(2, "Mira Shah", "Acme", None),
        ];

        let scored = select_canonical(&rows, true);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].id, LeadId(1));

        // And without the filter the newer row is the scoring candidate.
        let all = select_canonical(&rows, false);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, LeadId(2));
    }
}
