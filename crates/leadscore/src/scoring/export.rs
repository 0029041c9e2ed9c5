use std::io::Write;

use super::repository::LeadRecord;

/// Write every scored row as CSV, best score first. Duplicate identities are
/// kept on purpose: the export is the raw audit trail, the results listing is
/// the deduplicated view.
pub fn write_scored<W: Write>(records: &[LeadRecord], writer: W) -> Result<(), csv::Error> {
    let mut scored: Vec<&LeadRecord> = records.iter().filter(|lead| lead.is_scored()).collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "Name",
        "Role",
        "Company",
        "Industry",
        "Location",
        "Intent",
        "Score",
        "Reasoning",
    ])?;

    for lead in scored {
        let intent = lead.intent.map(|level| level.label()).unwrap_or_default();
        let score = lead.score.map(|s| s.to_string()).unwrap_or_default();
        csv_writer.write_record([
            lead.profile.name.as_str(),
            lead.profile.role.as_str(),
            lead.profile.company.as_str(),
            lead.profile.industry.as_str(),
            lead.profile.location.as_str(),
            intent,
            score.as_str(),
            lead.reasoning.as_deref().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush().map_err(csv::Error::from)
}
