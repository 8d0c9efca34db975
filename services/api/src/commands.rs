use crate::infra::{load_directory, render_import_summary};
use clap::Args;
use crm_accounts::config::AppConfig;
use crm_accounts::error::AppError;
use crm_accounts::workflows::accounts::{
    audit_duplicates, write_audit_csv, AccountIntakeService, AccountServiceError, CandidateSearch,
    CheckOutcome, DuplicateFinding, DuplicateNameChecker, DuplicateVerdict, OwnerReferenceId,
    SEARCH_FAILED_MESSAGE,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Company name as an agent would type it
    pub(crate) company_name: String,
    /// Owner reference id of the agent creating the account
    #[arg(long)]
    pub(crate) owner: String,
    /// Accounts CSV providing existing companies
    #[arg(long)]
    pub(crate) accounts_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct WatchArgs {
    /// Owner reference id of the agent typing
    #[arg(long)]
    pub(crate) owner: String,
    /// Accounts CSV providing existing companies
    #[arg(long)]
    pub(crate) accounts_csv: Option<PathBuf>,
    /// Override the debounce window (DEDUPE_DEBOUNCE_MS) in milliseconds
    #[arg(long)]
    pub(crate) debounce_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct AuditArgs {
    /// Accounts CSV to scan
    #[arg(long)]
    pub(crate) accounts_csv: PathBuf,
    /// Write findings to this CSV file instead of only printing them
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Only report pairs owned by different agents
    #[arg(long)]
    pub(crate) cross_owner_only: bool,
}

pub(crate) async fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        company_name,
        owner,
        accounts_csv,
    } = args;

    let (directory, summary) = load_directory(accounts_csv.as_deref())?;
    if let Some(summary) = &summary {
        render_import_summary(summary);
    }

    let directory = Arc::new(directory);
    let service = AccountIntakeService::new(directory.clone(), directory.clone(), directory);

    println!("\nName check for '{}'", company_name.trim());
    match service
        .check_name(&company_name, &OwnerReferenceId(owner))
        .await
    {
        Ok(check) => {
            println!("Normalized: {}", check.normalized_name);
            render_verdict(&check.verdict);
        }
        Err(AccountServiceError::Rejected(rejection)) => {
            println!("Rejected: {}", rejection);
        }
        Err(AccountServiceError::Search(_)) => {
            println!("{}", SEARCH_FAILED_MESSAGE);
        }
        Err(other) => println!("Check unavailable: {}", other),
    }

    Ok(())
}

pub(crate) async fn run_watch(args: WatchArgs) -> Result<(), AppError> {
    let WatchArgs {
        owner,
        accounts_csv,
        debounce_ms,
    } = args;

    let mut dedupe = AppConfig::load()?.dedupe;
    if let Some(ms) = debounce_ms {
        dedupe.debounce = Duration::from_millis(ms);
    }

    let (directory, summary) = load_directory(accounts_csv.as_deref())?;
    if let Some(summary) = &summary {
        render_import_summary(summary);
    }

    let directory = Arc::new(directory);
    let checker = Arc::new(
        DuplicateNameChecker::new(directory.clone(), OwnerReferenceId(owner), &dedupe)
            .with_owner_directory(directory),
    );

    println!(
        "\nWatching names typed by {} ({} ms debounce)",
        checker.current_owner(),
        dedupe.debounce.as_millis()
    );
    watch_lines(checker, BufReader::new(tokio::io::stdin()), render_outcome).await?;

    Ok(())
}

/// Runs one debounced check per input line and reports every outcome that was not superseded.
pub(crate) async fn watch_lines<S, R, F>(
    checker: Arc<DuplicateNameChecker<S>>,
    input: R,
    mut report: F,
) -> std::io::Result<()>
where
    S: CandidateSearch + 'static,
    R: AsyncBufRead + Unpin,
    F: FnMut(&str, &CheckOutcome),
{
    let mut tasks = JoinSet::new();
    let mut lines = input.lines();
    let mut reading = true;

    // outcomes are reported while input is still arriving
    while reading || !tasks.is_empty() {
        tokio::select! {
            line = lines.next_line(), if reading => match line? {
                Some(line) => {
                    let checker = checker.clone();
                    tasks.spawn(async move {
                        let outcome = checker.check(&line).await;
                        (line, outcome)
                    });
                }
                None => reading = false,
            },
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => match joined {
                Ok((line, outcome)) if !outcome.is_superseded() => report(&line, &outcome),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "name check task failed"),
            },
        }
    }

    Ok(())
}

pub(crate) fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let AuditArgs {
        accounts_csv,
        output,
        cross_owner_only,
    } = args;

    let (directory, summary) = load_directory(Some(&accounts_csv))?;
    if let Some(summary) = &summary {
        render_import_summary(summary);
    }

    let accounts = directory.accounts()?;
    let mut findings = audit_duplicates(&accounts);
    if cross_owner_only {
        findings.retain(|finding| finding.cross_owner);
    }

    render_findings(&findings);

    if let Some(path) = output {
        let file = std::fs::File::create(&path)?;
        write_audit_csv(&findings, file)?;
        println!("\nFindings written to {}", path.display());
    }

    Ok(())
}

fn render_outcome(raw: &str, outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::Superseded => {}
        CheckOutcome::Rejected { rejection, .. } => {
            println!("[{}] rejected: {}", raw, rejection);
        }
        CheckOutcome::SearchFailed { message, .. } => println!("[{}] {}", raw, message),
        CheckOutcome::Verdict {
            normalized_name,
            verdict,
        } => {
            println!("[{}] normalized {}", raw, normalized_name);
            render_verdict(verdict);
        }
    }
}

fn render_verdict(verdict: &DuplicateVerdict) {
    println!("{}", verdict.message);
    for found in &verdict.matches {
        println!(
            "- {} (owner {}, distance {})",
            found.candidate.company_name, found.candidate.owner_reference_id, found.distance
        );
    }
}

fn render_findings(findings: &[DuplicateFinding]) {
    if findings.is_empty() {
        println!("\nNear-duplicate accounts: none");
        return;
    }

    println!("\nNear-duplicate accounts");
    for finding in findings {
        let scope = if finding.cross_owner {
            "different owners"
        } else {
            "same owner"
        };
        println!(
            "- {} ({}) ~ {} ({}): distance {}, {}",
            finding.first_company,
            finding.first_owner,
            finding.second_company,
            finding.second_owner,
            finding.distance,
            scope
        );
    }
}
