use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of the agent that owns an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerReferenceId(pub String);

impl OwnerReferenceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

/// Existing company returned by the candidate search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCandidate {
    pub company_name: String,
    pub owner_reference_id: OwnerReferenceId,
}

impl CompanyCandidate {
    pub fn new(company_name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            owner_reference_id: OwnerReferenceId(owner.into()),
        }
    }
}

/// Payload produced by the candidate search collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSearchResponse {
    pub exists: bool,
    pub companies: Vec<CompanyCandidate>,
}

/// Stored account as held by the in-memory directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: AccountId,
    pub company_name: String,
    pub normalized_name: String,
    pub owner_reference_id: OwnerReferenceId,
    pub created_at: DateTime<Utc>,
}

impl AccountRecord {
    pub fn as_candidate(&self) -> CompanyCandidate {
        CompanyCandidate {
            company_name: self.company_name.clone(),
            owner_reference_id: self.owner_reference_id.clone(),
        }
    }
}
