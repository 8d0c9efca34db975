use crm_accounts::error::AppError;
use crm_accounts::workflows::accounts::{AccountCsvImporter, AccountDirectory, ImportSummary};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the in-memory directory, optionally seeded from an accounts export.
pub(crate) fn load_directory(
    accounts_csv: Option<&Path>,
) -> Result<(AccountDirectory, Option<ImportSummary>), AppError> {
    let directory = AccountDirectory::new();
    let summary = match accounts_csv {
        Some(path) => Some(AccountCsvImporter::from_path(path, &directory)?),
        None => None,
    };
    Ok((directory, summary))
}

pub(crate) fn render_import_summary(summary: &ImportSummary) {
    println!("Imported {} accounts", summary.imported);
    for row in &summary.skipped {
        let name = if row.company_name.is_empty() {
            "<blank>"
        } else {
            row.company_name.as_str()
        };
        println!("- skipped line {} ({}): {}", row.line, name, row.reason);
    }
}
