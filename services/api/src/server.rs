use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLeadRepository, InMemoryOfferRepository};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use leadscore::config::AppConfig;
use leadscore::error::AppError;
use leadscore::scoring::{LeadScoringService, OpenAiClassifier, ScoringState};
use leadscore::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let leads = Arc::new(InMemoryLeadRepository::default());
    let offers = Arc::new(InMemoryOfferRepository::default());
    let classifier = OpenAiClassifier::from_config(&config.classifier)?.map(Arc::new);
    match &classifier {
        Some(_) => info!(model = %config.classifier.model, "intent classifier configured; scoring runs hybrid"),
        None => info!("no classifier credentials; scoring runs rule-based only"),
    }

    let service = Arc::new(LeadScoringService::new(
        leads.clone(),
        offers.clone(),
        classifier,
    ));
    let scoring_state = ScoringState {
        service,
        leads,
        offers,
    };

    let app = with_scoring_routes(scoring_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
