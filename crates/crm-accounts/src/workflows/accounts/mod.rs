//! Company account intake: name normalization, blocking validation, and fuzzy
//! duplicate detection against existing accounts.
//!
//! The pipeline is normalizer -> guard -> matcher, each a pure function. The
//! checker, service and router wrap it with the search collaborator, storage
//! and HTTP plumbing.

pub mod audit;
pub mod checker;
pub mod directory;
pub mod domain;
pub mod guard;
pub mod import;
pub mod matcher;
pub mod normalizer;
pub mod repository;
pub mod router;
pub mod search;
pub mod service;

#[cfg(test)]
mod tests;

pub use audit::{audit_duplicates, write_audit_csv, DuplicateFinding};
pub use checker::{CheckOutcome, DuplicateNameChecker};
pub use directory::AccountDirectory;
pub use domain::{
    AccountId, AccountRecord, CandidateSearchResponse, CompanyCandidate, OwnerReferenceId,
};
pub use guard::{has_disallowed_abbreviation, validate_company_name, NameRejection};
pub use import::{AccountCsvImporter, AccountImportError, ImportSummary, SkippedRow};
pub use matcher::{
    find_duplicates, find_duplicates_with, levenshtein, DuplicateMatch, DuplicateVerdict,
    OwnerDirectory, ReferenceIdDirectory, VerdictKind, MAX_DUPLICATE_DISTANCE,
};
pub use normalizer::normalize_company_name;
pub use repository::{AccountRepository, RepositoryError};
pub use router::{account_router, AccountNameRequest};
pub use search::{CandidateSearch, SearchError, SEARCH_FAILED_MESSAGE};
pub use service::{AccountCreated, AccountIntakeService, AccountServiceError, NameCheck};
