use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::domain::{AccountRecord, OwnerReferenceId};
use super::guard::{validate_company_name, NameRejection};
use super::matcher::{find_duplicates_with, DuplicateVerdict, OwnerDirectory};
use super::normalizer::normalize_company_name;
use super::repository::{AccountRepository, RepositoryError};
use super::search::{CandidateSearch, SearchError};

/// Service composing the name guard, candidate search, matcher and account storage.
pub struct AccountIntakeService<S, R> {
    search: Arc<S>,
    repository: Arc<R>,
    owners: Arc<dyn OwnerDirectory>,
    // held across check and insert so concurrent creates see each other's accounts
    creation: Mutex<()>,
}

/// Validated name plus its duplicate verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCheck {
    pub company_name: String,
    pub normalized_name: String,
    pub verdict: DuplicateVerdict,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountCreated {
    pub account: AccountRecord,
    /// Set when the caller already owns a near-duplicate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<S, R> AccountIntakeService<S, R>
where
    S: CandidateSearch + 'static,
    R: AccountRepository + 'static,
{
    pub fn new(search: Arc<S>, repository: Arc<R>, owners: Arc<dyn OwnerDirectory>) -> Self {
        Self {
            search,
            repository,
            owners,
            creation: Mutex::new(()),
        }
    }

    /// Normalize, validate and compare a proposed name without persisting anything.
    pub async fn check_name(
        &self,
        raw: &str,
        owner: &OwnerReferenceId,
    ) -> Result<NameCheck, AccountServiceError> {
        let normalized_name = normalize_company_name(raw);
        validate_company_name(&normalized_name)?;

        let response = self.search.search(&normalized_name).await.map_err(|err| {
            warn!(error = %err, %normalized_name, "candidate search failed");
            err
        })?;
        let verdict = find_duplicates_with(
            &normalized_name,
            &response.companies,
            owner,
            self.owners.as_ref(),
        );

        Ok(NameCheck {
            company_name: raw.trim().to_string(),
            normalized_name,
            verdict,
        })
    }

    /// Create an account unless the name is blocked or another agent owns a near-duplicate.
    pub async fn create_account(
        &self,
        raw: &str,
        owner: OwnerReferenceId,
    ) -> Result<AccountCreated, AccountServiceError> {
        let _creation = self.creation.lock().await;
        let check = self.check_name(raw, &owner).await?;
        if check.verdict.owned_by_another_agent() {
            return Err(AccountServiceError::OwnedByAnotherAgent {
                verdict: check.verdict,
            });
        }

        let account = self.repository.insert_account(raw, owner)?;
        info!(
            account_id = %account.account_id.0,
            normalized_name = %account.normalized_name,
            "account created"
        );

        let warning = check
            .verdict
            .is_duplicate
            .then(|| check.verdict.message.clone());
        Ok(AccountCreated { account, warning })
    }

    pub fn accounts(&self) -> Result<Vec<AccountRecord>, AccountServiceError> {
        Ok(self.repository.list_accounts()?)
    }
}

/// Error raised by the account intake service.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error(transparent)]
    Rejected(#[from] NameRejection),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("{}", verdict.message)]
    OwnedByAnotherAgent { verdict: DuplicateVerdict },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
