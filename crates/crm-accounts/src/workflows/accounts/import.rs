use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::directory::AccountDirectory;
use super::domain::OwnerReferenceId;
use super::normalizer::normalize_company_name;
use super::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum AccountImportError {
    #[error("failed to read accounts export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid accounts CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not load accounts into the directory: {0}")]
    Repository(#[from] RepositoryError),
}

/// Row left out of an import, with the 1-based CSV line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub company_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Deserialize)]
struct AccountRow {
    #[serde(rename = "Company Name", default)]
    company_name: String,
    #[serde(
        rename = "Owner Reference Id",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    owner_reference_id: Option<String>,
    #[serde(
        rename = "Owner Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    owner_name: Option<String>,
}

/// Loads a CRM accounts export (`Company Name`, `Owner Reference Id`, optional `Owner Name`).
pub struct AccountCsvImporter;

impl AccountCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        directory: &AccountDirectory,
    ) -> Result<ImportSummary, AccountImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, directory)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        directory: &AccountDirectory,
    ) -> Result<ImportSummary, AccountImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut summary = ImportSummary::default();

        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let row: AccountRow = record.deserialize(Some(&headers))?;

            if row.company_name.is_empty() {
                summary.skip(line, row.company_name, "missing company name");
                continue;
            }
            if normalize_company_name(&row.company_name).is_empty() {
                summary.skip(line, row.company_name, "nothing left after normalization");
                continue;
            }
            let Some(owner) = row.owner_reference_id.map(OwnerReferenceId) else {
                summary.skip(line, row.company_name, "missing owner reference id");
                continue;
            };

            if let Some(display_name) = row.owner_name {
                directory.register_owner(owner.clone(), display_name)?;
            }

            match directory.insert(&row.company_name, owner) {
                Ok(_) => summary.imported += 1,
                Err(RepositoryError::Conflict { existing }) => {
                    debug!(line, %existing, "skipping account with colliding name");
                    summary.skip(
                        line,
                        row.company_name,
                        format!("same normalized name as '{existing}'"),
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }

        Ok(summary)
    }
}

impl ImportSummary {
    fn skip(&mut self, line: u64, company_name: String, reason: impl Into<String>) {
        self.skipped.push(SkippedRow {
            line,
            company_name,
            reason: reason.into(),
        });
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::accounts::matcher::OwnerDirectory;

    #[test]
    fn imports_rows_and_registers_owner_names() {
        let csv = "Company Name,Owner Reference Id,Owner Name\n\
Acme Trading,U1,Dana Whitfield\n\
Globex Holdings,U2,\n";
        let directory = AccountDirectory::new();
        let summary = AccountCsvImporter::from_reader(csv.as_bytes(), &directory)
            .expect("import succeeds");

        assert_eq!(summary.imported, 2);
        assert!(summary.skipped.is_empty());
        assert_eq!(
            directory.display_name(&OwnerReferenceId::new("U1")).as_deref(),
            Some("Dana Whitfield")
        );
        assert_eq!(directory.display_name(&OwnerReferenceId::new("U2")), None);
    }

    #[test]
    fn skips_blank_and_colliding_rows_with_line_numbers() {
        let csv = "Company Name,Owner Reference Id\n\
Acme Trading,U1\n\
 ,U2\n\
Acme Trading 2,U3\n\
Initech,\n";
        let directory = AccountDirectory::new();
        let summary = AccountCsvImporter::from_reader(csv.as_bytes(), &directory)
            .expect("import succeeds");

        assert_eq!(summary.imported, 1);
        let reasons: Vec<_> = summary
            .skipped
            .iter()
            .map(|row| (row.line, row.reason.as_str()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (3, "missing company name"),
                (4, "same normalized name as 'Acme Trading'"),
                (5, "missing owner reference id"),
            ]
        );
    }

    #[test]
    fn skips_names_that_normalize_to_nothing() {
        let csv = "Company Name,Owner Reference Id\n\
123,U1\n\
--- 42,U2\n\
Acme Trading,U1\n";
        let directory = AccountDirectory::new();
        let summary = AccountCsvImporter::from_reader(csv.as_bytes(), &directory)
            .expect("import succeeds");

        assert_eq!(summary.imported, 1);
        let reasons: Vec<_> = summary
            .skipped
            .iter()
            .map(|row| (row.line, row.company_name.as_str(), row.reason.as_str()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (2, "123", "nothing left after normalization"),
                (3, "--- 42", "nothing left after normalization"),
            ]
        );
        let accounts = directory.accounts().expect("list accounts");
        assert!(accounts.iter().all(|account| !account.normalized_name.is_empty()));
    }

    #[test]
    fn malformed_csv_is_an_error() {
        let csv = "Company Name,Owner Reference Id\nAcme,U1,extra\n";
        let directory = AccountDirectory::new();
        match AccountCsvImporter::from_reader(csv.as_bytes(), &directory) {
            Err(AccountImportError::Csv(_)) => {}
            other => panic!("expected csv error, got {other:?}"),
        }
    }
}
