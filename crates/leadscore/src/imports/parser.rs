use std::io::Read;

use serde::Deserialize;

use crate::scoring::domain::LeadProfile;

pub(crate) fn parse_profiles<R: Read>(reader: R) -> Result<Vec<LeadProfile>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut profiles = Vec::new();

    for record in csv_reader.deserialize::<LeadRow>() {
        let row = record?;
        profiles.push(LeadProfile {
            name: row.name,
            role: row.role,
            company: row.company,
            industry: row.industry,
            location: row.location,
            linkedin_bio: row.linkedin_bio,
        });
    }

    Ok(profiles)
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    industry: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    linkedin_bio: String,
}
