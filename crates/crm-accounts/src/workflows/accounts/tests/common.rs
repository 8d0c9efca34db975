use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::DedupeConfig;
use crate::workflows::accounts::directory::AccountDirectory;
use crate::workflows::accounts::domain::{
    CandidateSearchResponse, CompanyCandidate, OwnerReferenceId,
};
use crate::workflows::accounts::search::{CandidateSearch, SearchError};
use crate::workflows::accounts::service::AccountIntakeService;

pub(super) const DEBOUNCE: Duration = Duration::from_millis(500);

pub(super) fn dedupe_config() -> DedupeConfig {
    DedupeConfig { debounce: DEBOUNCE }
}

pub(super) fn owner(id: &str) -> OwnerReferenceId {
    OwnerReferenceId::new(id)
}

/// Search double with per-query latency and failures that records every call.
#[derive(Default)]
pub(super) struct ScriptedSearch {
    companies: Vec<CompanyCandidate>,
    latency: HashMap<String, Duration>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSearch {
    pub(super) fn with_companies(companies: Vec<CompanyCandidate>) -> Self {
        Self {
            companies,
            ..Self::default()
        }
    }

    pub(super) fn slow_for(mut self, normalized: &str, latency: Duration) -> Self {
        self.latency.insert(normalized.to_string(), latency);
        self
    }

    pub(super) fn failing_for(mut self, normalized: &str) -> Self {
        self.failing.insert(normalized.to_string());
        self
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl CandidateSearch for ScriptedSearch {
    async fn search(&self, normalized_name: &str) -> Result<CandidateSearchResponse, SearchError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(normalized_name.to_string());

        if let Some(latency) = self.latency.get(normalized_name) {
            tokio::time::sleep(*latency).await;
        }
        if self.failing.contains(normalized_name) {
            return Err(SearchError::Unavailable("connection reset".to_string()));
        }

        Ok(CandidateSearchResponse {
            exists: false,
            companies: self.companies.clone(),
        })
    }
}

/// Directory search that answers from a snapshot and then waits before returning it.
pub(super) struct LatentDirectorySearch {
    directory: AccountDirectory,
    latency: Duration,
}

#[async_trait]
impl CandidateSearch for LatentDirectorySearch {
    async fn search(&self, normalized_name: &str) -> Result<CandidateSearchResponse, SearchError> {
        let snapshot = self.directory.search(normalized_name).await;
        tokio::time::sleep(self.latency).await;
        snapshot
    }
}

pub(super) fn latent_directory_service(
    directory: &AccountDirectory,
    latency: Duration,
) -> Arc<AccountIntakeService<LatentDirectorySearch, AccountDirectory>> {
    let shared = Arc::new(directory.clone());
    let search = LatentDirectorySearch {
        directory: directory.clone(),
        latency,
    };
    Arc::new(AccountIntakeService::new(
        Arc::new(search),
        shared.clone(),
        shared,
    ))
}

pub(super) fn seeded_directory() -> AccountDirectory {
    let directory = AccountDirectory::new();
    directory
        .insert("Acme Trading", owner("U1"))
        .expect("seed acme");
    directory
        .insert("Globex Holdings", owner("U2"))
        .expect("seed globex");
    directory
        .register_owner(owner("U1"), "Dana Whitfield")
        .expect("register owner");
    directory
}

pub(super) type DirectoryService = AccountIntakeService<AccountDirectory, AccountDirectory>;

pub(super) fn directory_service(directory: &AccountDirectory) -> Arc<DirectoryService> {
    let shared = Arc::new(directory.clone());
    Arc::new(AccountIntakeService::new(
        shared.clone(),
        shared.clone(),
        shared,
    ))
}

pub(super) fn failing_search_service() -> Arc<AccountIntakeService<ScriptedSearch, AccountDirectory>>
{
    let search = ScriptedSearch::default().failing_for("ACME TRADING");
    let directory = Arc::new(AccountDirectory::new());
    Arc::new(AccountIntakeService::new(
        Arc::new(search),
        directory.clone(),
        directory,
    ))
}
