use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::domain::{AccountId, AccountRecord, CandidateSearchResponse, OwnerReferenceId};
use super::matcher::{OwnerDirectory, MAX_DUPLICATE_DISTANCE};
use super::normalizer::normalize_company_name;
use super::repository::{AccountRepository, RepositoryError};
use super::search::{CandidateSearch, SearchError};

#[derive(Default)]
struct DirectoryState {
    // keyed by normalized name
    accounts: BTreeMap<String, AccountRecord>,
    owners: HashMap<OwnerReferenceId, String>,
}

/// In-memory account store standing in for the CRM backend.
///
/// Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct AccountDirectory {
    state: Arc<RwLock<DirectoryState>>,
    sequence: Arc<AtomicU64>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        company_name: &str,
        owner: OwnerReferenceId,
    ) -> Result<AccountRecord, RepositoryError> {
        let normalized_name = normalize_company_name(company_name);
        let mut guard = self.state.write().map_err(|_| RepositoryError::Unavailable)?;

        if let Some(existing) = guard.accounts.get(&normalized_name) {
            return Err(RepositoryError::Conflict {
                existing: existing.company_name.clone(),
            });
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = AccountRecord {
            account_id: AccountId(format!("acct-{id:06}")),
            company_name: company_name.trim().to_string(),
            normalized_name: normalized_name.clone(),
            owner_reference_id: owner,
            created_at: Utc::now(),
        };
        guard.accounts.insert(normalized_name, record.clone());
        Ok(record)
    }

    pub fn register_owner(
        &self,
        owner: OwnerReferenceId,
        display_name: impl Into<String>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.state.write().map_err(|_| RepositoryError::Unavailable)?;
        guard.owners.insert(owner, display_name.into());
        Ok(())
    }

    /// All accounts ordered by normalized name.
    pub fn accounts(&self) -> Result<Vec<AccountRecord>, RepositoryError> {
        let guard = self.state.read().map_err(|_| RepositoryError::Unavailable)?;
        Ok(guard.accounts.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .map(|guard| guard.accounts.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_search_hit(query: &str, query_tokens: &HashSet<&str>, record: &AccountRecord) -> bool {
    let length_gap = record
        .normalized_name
        .chars()
        .count()
        .abs_diff(query.chars().count());
    length_gap <= MAX_DUPLICATE_DISTANCE
        || record
            .normalized_name
            .split_whitespace()
            .any(|token| query_tokens.contains(token))
}

#[async_trait]
impl CandidateSearch for AccountDirectory {
    async fn search(&self, normalized_name: &str) -> Result<CandidateSearchResponse, SearchError> {
        let guard = self
            .state
            .read()
            .map_err(|_| SearchError::Unavailable("account directory lock poisoned".into()))?;
        let query_tokens: HashSet<&str> = normalized_name.split_whitespace().collect();

        let companies = guard
            .accounts
            .values()
            .filter(|record| is_search_hit(normalized_name, &query_tokens, record))
            .map(AccountRecord::as_candidate)
            .collect();

        Ok(CandidateSearchResponse {
            exists: guard.accounts.contains_key(normalized_name),
            companies,
        })
    }
}

impl AccountRepository for AccountDirectory {
    fn insert_account(
        &self,
        company_name: &str,
        owner: OwnerReferenceId,
    ) -> Result<AccountRecord, RepositoryError> {
        self.insert(company_name, owner)
    }

    fn list_accounts(&self) -> Result<Vec<AccountRecord>, RepositoryError> {
        self.accounts()
    }
}

impl OwnerDirectory for AccountDirectory {
    fn display_name(&self, owner: &OwnerReferenceId) -> Option<String> {
        self.state.read().ok()?.owners.get(owner).cloned()
    }
}
