use std::io::Read;

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::domain::{Candidate, RegistrationOutcome};
use super::service::RegistrationService;
use super::store::UserStore;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read candidate csv: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    name: String,
    #[serde(alias = "dob")]
    date_of_birth: String,
    email: String,
    password: String,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Candidate::new(row.name, row.date_of_birth, row.email, row.password)
    }
}

/// Read candidates from a CSV export with `name,date_of_birth,email,password` headers.
pub fn parse_candidates<R: Read>(reader: R) -> Result<Vec<Candidate>, ImportError> {
    Ok(parse_numbered(reader)?
        .into_iter()
        .map(|(_, candidate)| candidate)
        .collect())
}

/// Candidates paired with the file line their record starts on.
fn parse_numbered<R: Read>(reader: R) -> Result<Vec<(u64, Candidate)>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut candidates = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |position| position.line());
        let row: CandidateRow = record.deserialize(Some(&headers))?;
        candidates.push((line, Candidate::from(row)));
    }

    Ok(candidates)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRow {
    /// Line in the CSV file where the record starts; the header is line 1.
    pub line: u64,
    pub name: String,
    pub outcome: RegistrationOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub rows: Vec<ImportRow>,
}

impl ImportReport {
    pub fn registered(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.outcome.is_success())
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.rows.len() - self.registered()
    }
}

/// Parse a CSV export and register each row in file order.
pub fn import_candidates<R, S, C>(
    reader: R,
    service: &RegistrationService<S, C>,
) -> Result<ImportReport, ImportError>
where
    R: Read,
    S: UserStore + 'static,
    C: Clock + 'static,
{
    let numbered = parse_numbered(reader)?;
    let mut rows = Vec::with_capacity(numbered.len());

    for (line, candidate) in numbered {
        let name = candidate.display_name();
        let outcome = service.register(candidate);
        rows.push(ImportRow {
            line,
            name,
            outcome,
        });
    }

    Ok(ImportReport { rows })
}
