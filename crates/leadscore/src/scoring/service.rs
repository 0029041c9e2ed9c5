use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::classifier::{ClassifierVerdict, IntentClassifier, IntentSignal};
use super::dedup::select_canonical;
use super::domain::{IntentLevel, Offer};
use super::repository::{LeadRecord, LeadRepository, OfferRepository, RepositoryError};
use super::rules;

/// Orchestrates one scoring run: canonical candidate selection, the rule
/// layer, the classifier layer with its fallback policy, and per-lead
/// persistence. Repositories and the classifier are injected so the pipeline
/// can run against fakes.
pub struct LeadScoringService<L, O, C> {
    leads: Arc<L>,
    offers: Arc<O>,
    classifier: Option<Arc<C>>,
}

impl<L, O, C> LeadScoringService<L, O, C>
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    pub fn new(leads: Arc<L>, offers: Arc<O>, classifier: Option<Arc<C>>) -> Self {
        Self {
            leads,
            offers,
            classifier,
        }
    }

    /// Score every unscored canonical lead against the active offer.
    ///
    /// Leads that already carry a score are never touched again, so running
    /// the pipeline twice is a no-op the second time. A failure while
    /// persisting one lead skips that lead and continues the batch.
    pub fn run(&self) -> Result<ScoringRunReport, ScoringRunError> {
        let offer = self
            .offers
            .current()?
            .ok_or(ScoringRunError::MissingOffer)?;

        let snapshot = self.leads.all()?;
        let candidates: Vec<LeadRecord> = select_canonical(&snapshot, false)
            .into_iter()
            .filter(|lead| lead.score.is_none())
            .collect();

        let scoring_method = if self.classifier.is_some() {
            ScoringMethod::Hybrid
        } else {
            ScoringMethod::RuleBasedOnly
        };

        let mut results = Vec::new();
        let mut skipped = Vec::new();
        for lead in candidates {
            match self.score_one(&lead, &offer) {
                Ok(view) => results.push(view),
                Err(err) => {
                    warn!(
                        lead = %lead.profile.name,
                        company = %lead.profile.company,
                        error = %err,
                        "lead left unscored"
                    );
                    skipped.push(SkippedLead {
                        name: lead.profile.name.clone(),
                        company: lead.profile.company.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let total_scored = results.len();
        info!(total_scored, method = ?scoring_method, "scoring run finished");

        Ok(ScoringRunReport {
            results,
            total_scored,
            scoring_method,
            skipped,
        })
    }

    fn score_one(
        &self,
        lead: &LeadRecord,
        offer: &Offer,
    ) -> Result<ScoredLeadView, RepositoryError> {
        let (rule_score, rule_reasons) = rules::score_lead(&lead.profile, offer);

        let verdict = match &self.classifier {
            Some(classifier) => classifier.classify(&lead.profile, offer),
            None => {
                ClassifierVerdict::Scored(IntentSignal::degraded("no classifier configured"))
            }
        };

        let scored = match verdict {
            ClassifierVerdict::QuotaExceeded => rule_only_fallback(rule_score, &rule_reasons),
            ClassifierVerdict::Scored(signal) => combine(rule_score, &rule_reasons, signal),
            ClassifierVerdict::FormatError => combine(
                rule_score,
                &rule_reasons,
                IntentSignal::degraded("response format error"),
            ),
            ClassifierVerdict::Failed(reason) => {
                combine(rule_score, &rule_reasons, IntentSignal::degraded(reason))
            }
        };

        let intent = IntentLevel::for_score(scored.final_score);
        self.leads.apply_score(
            lead.id,
            scored.final_score,
            intent,
            scored.reasoning.clone(),
        )?;

        Ok(ScoredLeadView {
            name: lead.profile.name.clone(),
            role: lead.profile.role.clone(),
            company: lead.profile.company.clone(),
            intent,
            score: scored.final_score,
            reasoning: scored.reasoning,
            score_breakdown: scored.breakdown,
        })
    }
}

struct ScoredValues {
    final_score: u8,
    reasoning: String,
    breakdown: Option<ScoreBreakdown>,
}

/// Normal path: both layers add up, capped at 100, with each layer's
/// reasoning tagged in the combined string.
fn combine(rule_score: u8, rule_reasons: &[String], signal: IntentSignal) -> ScoredValues {
    let final_score = (rule_score + signal.score).min(100);
    let reasoning = format!(
        "[Rule: {}] [AI: {}]",
        rule_reasons.join(", "),
        signal.reasoning
    );

    ScoredValues {
        final_score,
        reasoning,
        breakdown: Some(ScoreBreakdown {
            rule_score,
            ai_score: signal.score,
        }),
    }
}

/// Quota fallback: the rule score alone, doubled so it can occupy the full
/// 0-100 range. The doubled scale intentionally differs from the additive
/// path and is kept as-is.
fn rule_only_fallback(rule_score: u8, rule_reasons: &[String]) -> ScoredValues {
    let final_score = (rule_score * 2).min(100);
    let reasoning = format!(
        "[Rule-based only - AI rate limited] {}",
        rule_reasons.join(", ")
    );

    ScoredValues {
        final_score,
        reasoning,
        breakdown: None,
    }
}

/// Which layers actually ran, fixed at run start by classifier presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringMethod {
    #[serde(rename = "hybrid")]
    Hybrid,
    #[serde(rename = "rule-based only")]
    RuleBasedOnly,
}

/// Per-layer contribution, reported for scored leads on the normal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub rule_score: u8,
    pub ai_score: u8,
}

/// One persisted scoring outcome as surfaced in the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredLeadView {
    pub name: String,
    pub role: String,
    pub company: String,
    pub intent: IntentLevel,
    pub score: u8,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<ScoreBreakdown>,
}

/// A lead the run could not score; it stays unscored and eligible for the
/// next run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedLead {
    pub name: String,
    pub company: String,
    pub reason: String,
}

/// Aggregate outcome of one pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringRunReport {
    pub results: Vec<ScoredLeadView>,
    pub total_scored: usize,
    pub scoring_method: ScoringMethod,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedLead>,
}

/// Error that aborts a scoring run before any lead is touched.
#[derive(Debug, thiserror::Error)]
pub enum ScoringRunError {
    #[error("no offer configured; create an offer before scoring leads")]
    MissingOffer,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
