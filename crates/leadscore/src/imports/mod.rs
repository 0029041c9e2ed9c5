mod parser;

use std::io::Read;
use std::path::Path;

use crate::scoring::domain::LeadProfile;

#[derive(Debug)]
pub enum LeadImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for LeadImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadImportError::Io(err) => write!(f, "failed to read lead CSV: {}", err),
            LeadImportError::Csv(err) => write!(f, "invalid lead CSV data: {}", err),
        }
    }
}

impl std::error::Error for LeadImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeadImportError::Io(err) => Some(err),
            LeadImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LeadImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LeadImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads a `name,role,company,industry,location,linkedin_bio` CSV export into
/// lead profiles. Every row becomes a profile; duplicate people are kept so
/// later rows can supersede earlier ones at scoring time.
pub struct LeadCsvImporter;

impl LeadCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<LeadProfile>, LeadImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<LeadProfile>, LeadImportError> {
        Ok(parser::parse_profiles(reader)?)
    }
}
