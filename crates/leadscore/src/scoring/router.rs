use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::imports::LeadCsvImporter;

use super::classifier::IntentClassifier;
use super::dedup::select_canonical;
use super::domain::{LeadProfile, Offer};
use super::export;
use super::repository::{LeadRecord, LeadRepository, OfferRepository};
use super::service::{LeadScoringService, ScoringRunError};

/// Shared handler state: the pipeline service plus direct repository handles
/// for the CRUD endpoints.
pub struct ScoringState<L, O, C> {
    pub service: Arc<LeadScoringService<L, O, C>>,
    pub leads: Arc<L>,
    pub offers: Arc<O>,
}

impl<L, O, C> Clone for ScoringState<L, O, C> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            leads: self.leads.clone(),
            offers: self.offers.clone(),
        }
    }
}

/// Router builder exposing offer management, lead intake, and the scoring
/// pipeline endpoints.
pub fn scoring_router<L, O, C>(state: ScoringState<L, O, C>) -> Router
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/offer",
            post(create_offer_handler::<L, O, C>)
                .get(get_offer_handler::<L, O, C>)
                .put(update_offer_handler::<L, O, C>),
        )
        .route(
            "/api/v1/leads",
            post(create_lead_handler::<L, O, C>).get(list_leads_handler::<L, O, C>),
        )
        .route("/api/v1/leads/upload", post(upload_leads_handler::<L, O, C>))
        .route("/api/v1/leads/score", post(score_handler::<L, O, C>))
        .route("/api/v1/leads/results", get(results_handler::<L, O, C>))
        .route("/api/v1/leads/export", get(export_handler::<L, O, C>))
        .with_state(state)
}

pub(crate) async fn create_offer_handler<L, O, C>(
    State(state): State<ScoringState<L, O, C>>,
    Json(offer): Json<Offer>,
) -> Response
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    match state.offers.put(offer.clone()) {
        Ok(()) => (StatusCode::CREATED, Json(offer)).into_response(),
        Err(err) => repository_error_response(err),
    }
}

pub(crate) async fn get_offer_handler<L, O, C>(
    State(state): State<ScoringState<L, O, C>>,
) -> Response
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    match state.offers.current() {
        Ok(Some(offer)) => (StatusCode::OK, Json(offer)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "no offer configured" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => repository_error_response(err),
    }
}

pub(crate) async fn update_offer_handler<L, O, C>(
    State(state): State<ScoringState<L, O, C>>,
    Json(offer): Json<Offer>,
) -> Response
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    match state.offers.current() {
        Ok(Some(_)) => match state.offers.put(offer.clone()) {
            Ok(()) => (StatusCode::OK, Json(offer)).into_response(),
            Err(err) => repository_error_response(err),
        },
        Ok(None) => {
            let payload = json!({ "error": "no offer configured" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => repository_error_response(err),
    }
}

pub(crate) async fn create_lead_handler<L, O, C>(
    State(state): State<ScoringState<L, O, C>>,
    Json(profile): Json<LeadProfile>,
) -> Response
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    match state.leads.insert(profile) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => repository_error_response(err),
    }
}

pub(crate) async fn list_leads_handler<L, O, C>(
    State(state): State<ScoringState<L, O, C>>,
) -> Response
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    match state.leads.all() {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => repository_error_response(err),
    }
}

/// Accept a raw CSV body and store one lead per row. Duplicates are stored
/// as-is; deduplication happens at scoring and read time.
pub(crate) async fn upload_leads_handler<L, O, C>(
    State(state): State<ScoringState<L, O, C>>,
    body: String,
) -> Response
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    let profiles = match LeadCsvImporter::from_reader(Cursor::new(body.into_bytes())) {
        Ok(profiles) => profiles,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let mut created = Vec::with_capacity(profiles.len());
    for profile in profiles {
        match state.leads.insert(profile) {
            Ok(record) => created.push(record),
            Err(err) => return repository_error_response(err),
        }
    }

    let payload = json!({ "created": created.len(), "leads": created });
    (StatusCode::CREATED, Json(payload)).into_response()
}

/// Run the scoring pipeline. The classifier call blocks on network I/O, so
/// the run is moved off the async executor.
pub(crate) async fn score_handler<L, O, C>(State(state): State<ScoringState<L, O, C>>) -> Response
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    let service = state.service.clone();
    match tokio::task::spawn_blocking(move || service.run()).await {
        Ok(Ok(report)) => (StatusCode::OK, Json(report)).into_response(),
        Ok(Err(err @ ScoringRunError::MissingOffer)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Ok(Err(other)) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        Err(join_err) => {
            let payload = json!({ "error": format!("scoring task failed: {join_err}") });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

/// Canonical scored leads, best score first, ties broken by company and name.
pub(crate) async fn results_handler<L, O, C>(State(state): State<ScoringState<L, O, C>>) -> Response
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    let snapshot = match state.leads.all() {
        Ok(snapshot) => snapshot,
        Err(err) => return repository_error_response(err),
    };

    let mut scored: Vec<LeadRecord> = select_canonical(&snapshot, true);
    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.profile.company.cmp(&b.profile.company))
            .then_with(|| a.profile.name.cmp(&b.profile.name))
    });

    (StatusCode::OK, Json(scored)).into_response()
}

pub(crate) async fn export_handler<L, O, C>(State(state): State<ScoringState<L, O, C>>) -> Response
where
    L: LeadRepository + 'static,
    O: OfferRepository + 'static,
    C: IntentClassifier + 'static,
{
    let snapshot = match state.leads.all() {
        Ok(snapshot) => snapshot,
        Err(err) => return repository_error_response(err),
    };

    let mut buffer = Vec::new();
    if let Err(err) = export::write_scored(&snapshot, &mut buffer) {
        let payload = json!({ "error": format!("export failed: {err}") });
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads_export.csv\"",
            ),
        ],
        buffer,
    )
        .into_response()
}

fn repository_error_response(err: super::repository::RepositoryError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
