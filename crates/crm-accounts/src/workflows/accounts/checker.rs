use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use super::domain::OwnerReferenceId;
use super::guard::{validate_company_name, NameRejection};
use super::matcher::{
    find_duplicates_with, DuplicateVerdict, OwnerDirectory, ReferenceIdDirectory,
};
use super::normalizer::normalize_company_name;
use super::search::{CandidateSearch, SEARCH_FAILED_MESSAGE};
use crate::config::DedupeConfig;

/// Result of one debounced check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// A newer input arrived before this one finished; nothing is shown.
    Superseded,
    Rejected {
        normalized_name: String,
        rejection: NameRejection,
    },
    SearchFailed {
        normalized_name: String,
        message: &'static str,
    },
    Verdict {
        normalized_name: String,
        verdict: DuplicateVerdict,
    },
}

impl CheckOutcome {
    pub fn is_superseded(&self) -> bool {
        matches!(self, CheckOutcome::Superseded)
    }
}

/// Debounced, latest-wins duplicate check for a name being typed.
///
/// Every call to [`check`](Self::check) takes a ticket. A call whose ticket is no
/// longer the newest after the debounce window, or after the search returns,
/// resolves to [`CheckOutcome::Superseded`] and leaves the published verdict alone.
pub struct DuplicateNameChecker<S> {
    search: Arc<S>,
    owners: Arc<dyn OwnerDirectory>,
    current_owner: OwnerReferenceId,
    debounce: Duration,
    sequence: AtomicU64,
    published: Mutex<Option<DuplicateVerdict>>,
}

impl<S> DuplicateNameChecker<S>
where
    S: CandidateSearch + 'static,
{
    pub fn new(search: Arc<S>, current_owner: OwnerReferenceId, config: &DedupeConfig) -> Self {
        Self {
            search,
            owners: Arc::new(ReferenceIdDirectory),
            current_owner,
            debounce: config.debounce,
            sequence: AtomicU64::new(0),
            published: Mutex::new(None),
        }
    }

    pub fn with_owner_directory(mut self, owners: Arc<dyn OwnerDirectory>) -> Self {
        self.owners = owners;
        self
    }

    pub fn current_owner(&self) -> &OwnerReferenceId {
        &self.current_owner
    }

    /// Verdict of the newest check that completed a search, if any.
    pub fn latest_verdict(&self) -> Option<DuplicateVerdict> {
        self.published
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    pub async fn check(&self, raw: &str) -> CheckOutcome {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if self.is_stale(ticket) {
            debug!(ticket, "name check superseded during debounce");
            return CheckOutcome::Superseded;
        }

        let normalized_name = normalize_company_name(raw);
        if let Err(rejection) = validate_company_name(&normalized_name) {
            self.publish(ticket, None);
            return CheckOutcome::Rejected {
                normalized_name,
                rejection,
            };
        }

        let response = self.search.search(&normalized_name).await;
        if self.is_stale(ticket) {
            debug!(ticket, %normalized_name, "discarding stale candidate search response");
            return CheckOutcome::Superseded;
        }

        match response {
            Ok(response) => {
                let verdict = find_duplicates_with(
                    &normalized_name,
                    &response.companies,
                    &self.current_owner,
                    self.owners.as_ref(),
                );
                self.publish(ticket, Some(verdict.clone()));
                CheckOutcome::Verdict {
                    normalized_name,
                    verdict,
                }
            }
            Err(err) => {
                warn!(error = %err, %normalized_name, "candidate search failed");
                self.publish(ticket, None);
                CheckOutcome::SearchFailed {
                    normalized_name,
                    message: SEARCH_FAILED_MESSAGE,
                }
            }
        }
    }

    fn is_stale(&self, ticket: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) != ticket
    }

    fn publish(&self, ticket: u64, verdict: Option<DuplicateVerdict>) {
        if let Ok(mut guard) = self.published.lock() {
            if !self.is_stale(ticket) {
                *guard = verdict;
            }
        }
    }
}
