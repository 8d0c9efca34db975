use super::domain::{AccountRecord, OwnerReferenceId};

/// Storage seam for accounts so the intake service can run against any backend.
pub trait AccountRepository: Send + Sync {
    fn insert_account(
        &self,
        company_name: &str,
        owner: OwnerReferenceId,
    ) -> Result<AccountRecord, RepositoryError>;
    fn list_accounts(&self) -> Result<Vec<AccountRecord>, RepositoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("an account named '{existing}' already uses this name")]
    Conflict { existing: String },
    #[error("account repository unavailable")]
    Unavailable,
}
