use crate::infra::{InMemoryLeadRepository, InMemoryOfferRepository};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use leadscore::error::AppError;
use leadscore::imports::LeadCsvImporter;
use leadscore::scoring::{
    LeadRepository, LeadScoringService, Offer, OfferRepository, OpenAiClassifier,
    ScoringRunError, ScoringRunReport,
};
use leadscore::config::AppConfig;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Name of the product or offer leads are scored against
    #[arg(long)]
    pub(crate) offer_name: String,
    /// Value proposition (repeat the flag for several)
    #[arg(long = "value-prop")]
    pub(crate) value_props: Vec<String>,
    /// Ideal customer profile entry (repeat the flag for several)
    #[arg(long = "ideal-use-case")]
    pub(crate) ideal_use_cases: Vec<String>,
    /// CSV of leads (name,role,company,industry,location,linkedin_bio)
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Also print the stored lead rows after the run
    #[arg(long)]
    pub(crate) show_leads: bool,
}

/// Score a CSV offline. Uses the hybrid pipeline when classifier credentials
/// are present in the environment, rule-based only otherwise.
pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let leads = Arc::new(InMemoryLeadRepository::default());
    for profile in LeadCsvImporter::from_path(&args.csv)? {
        leads
            .insert(profile)
            .map_err(ScoringRunError::Repository)?;
    }

    let offers = Arc::new(InMemoryOfferRepository::default());
    offers
        .put(Offer {
            name: args.offer_name,
            value_props: args.value_props,
            ideal_use_cases: args.ideal_use_cases,
        })
        .map_err(ScoringRunError::Repository)?;

    let classifier = OpenAiClassifier::from_config(&config.classifier)?.map(Arc::new);
    let service = Arc::new(LeadScoringService::new(leads, offers, classifier));

    let report = tokio::task::spawn_blocking(move || service.run())
        .await
        .map_err(|err| AppError::Io(std::io::Error::other(err.to_string())))??;

    render_run_report(&report);
    Ok(())
}

const DEMO_LEADS_CSV: &str = "\
name,role,company,industry,location,linkedin_bio
Ava Ramirez,VP of Sales,FlowMetrics,B2B SaaS,Austin TX,Scaling outbound teams from 5 to 50 reps
Noah Kim,Staff Accountant,Globex,Agriculture,Berlin,
Mira Shah,Engineer,Acme,Retail,NYC,Early profile before promotion
Mira Shah,CTO,Acme,B2B SaaS,NYC,Owns the GTM tooling budget
Sam Ortiz,Recruiting Manager,TalentWorks,Mid-market recruiters,Chicago,Runs sourcing for 40 clients
";

/// Deterministic end-to-end demo: embedded sample leads, rule-based only
/// scoring, and a printed report. The duplicated person shows canonical-row
/// selection.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Lead scoring demo ({})", Utc::now().date_naive());

    let leads = Arc::new(InMemoryLeadRepository::default());
    for profile in LeadCsvImporter::from_reader(DEMO_LEADS_CSV.as_bytes())? {
        leads
            .insert(profile)
            .map_err(ScoringRunError::Repository)?;
    }

    let offers = Arc::new(InMemoryOfferRepository::default());
    offers
        .put(Offer {
            name: "Outreach Copilot".to_string(),
            value_props: vec![
                "24/7 automated outreach".to_string(),
                "6x more meetings booked".to_string(),
            ],
            ideal_use_cases: vec![
                "B2B SaaS".to_string(),
                "Mid-market recruiters".to_string(),
            ],
        })
        .map_err(ScoringRunError::Repository)?;

    let service: LeadScoringService<_, _, OpenAiClassifier> =
        LeadScoringService::new(leads.clone(), offers, None);
    let report = service.run().map_err(AppError::from)?;

    render_run_report(&report);

    if args.show_leads {
        println!("\nStored rows");
        for record in leads.all().map_err(ScoringRunError::Repository)? {
            let score = record
                .score
                .map(|value| value.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "- #{} {} | {} @ {} | score {}",
                record.id.0, record.profile.name, record.profile.role, record.profile.company, score
            );
        }
    }

    Ok(())
}

pub(crate) fn render_run_report(report: &ScoringRunReport) {
    let method = match serde_json::to_value(report.scoring_method) {
        Ok(serde_json::Value::String(label)) => label,
        _ => format!("{:?}", report.scoring_method),
    };

    println!("\nScoring run complete ({} mode)", method);
    println!(
        "- {} scored, {} skipped",
        report.total_scored,
        report.skipped.len()
    );

    for result in &report.results {
        println!(
            "- {} | {} @ {} | {} ({})",
            result.name,
            result.role,
            result.company,
            result.intent.label(),
            result.score
        );
        println!("    {}", result.reasoning);
        if let Some(breakdown) = result.score_breakdown {
            println!(
                "    rule {} + ai {}",
                breakdown.rule_score, breakdown.ai_score
            );
        }
    }

    for skipped in &report.skipped {
        println!(
            "- {} @ {} skipped: {}",
            skipped.name, skipped.company, skipped.reason
        );
    }
}
