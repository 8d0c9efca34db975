use std::collections::HashMap;

use serde::Serialize;

use super::domain::{CompanyCandidate, OwnerReferenceId};
use super::normalizer::normalize_company_name;

/// Edit distance at or below which two normalized names count as the same company.
pub const MAX_DUPLICATE_DISTANCE: usize = 2;

/// Resolves owner reference ids to display names for verdict messages.
pub trait OwnerDirectory: Send + Sync {
    fn display_name(&self, owner: &OwnerReferenceId) -> Option<String>;
}

/// Directory that knows no one; messages fall back to the raw reference id.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceIdDirectory;

impl OwnerDirectory for ReferenceIdDirectory {
    fn display_name(&self, _owner: &OwnerReferenceId) -> Option<String> {
        None
    }
}

impl OwnerDirectory for HashMap<OwnerReferenceId, String> {
    fn display_name(&self, owner: &OwnerReferenceId) -> Option<String> {
        self.get(owner).cloned()
    }
}

/// Candidate that cleared the duplicate threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateMatch {
    pub candidate: CompanyCandidate,
    pub normalized_name: String,
    pub distance: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerdictKind {
    NoDuplicate,
    OwnedByAnotherAgent {
        company_name: String,
        owner_reference_id: OwnerReferenceId,
        owner_name: String,
    },
    OwnedByYou {
        company_name: String,
    },
}

/// Outcome of comparing one normalized name against a candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateVerdict {
    pub is_duplicate: bool,
    pub kind: VerdictKind,
    pub matches: Vec<DuplicateMatch>,
    pub message: String,
}

impl DuplicateVerdict {
    pub fn no_duplicate() -> Self {
        let kind = VerdictKind::NoDuplicate;
        Self {
            is_duplicate: false,
            message: message_for(&kind),
            kind,
            matches: Vec::new(),
        }
    }

    pub fn owned_by_another_agent(&self) -> bool {
        matches!(self.kind, VerdictKind::OwnedByAnotherAgent { .. })
    }
}

fn message_for(kind: &VerdictKind) -> String {
    match kind {
        VerdictKind::NoDuplicate => "No duplicate company found".to_string(),
        VerdictKind::OwnedByAnotherAgent {
            company_name,
            owner_name,
            ..
        } => format!(
            "Duplicate company: '{}' is owned by another agent ({})",
            company_name, owner_name
        ),
        VerdictKind::OwnedByYou { company_name } => format!(
            "Possible duplicate: '{}' is already owned by you",
            company_name
        ),
    }
}

/// Levenshtein distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // d[i][j]: distance between the first i chars of b and the first j chars of a.
    let mut d = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in d[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            d[i][j] = if b[i - 1] == a[j - 1] {
                d[i - 1][j - 1]
            } else {
                1 + d[i - 1][j - 1].min(d[i][j - 1]).min(d[i - 1][j])
            };
        }
    }

    d[b.len()][a.len()]
}

/// Compare against candidates using reference ids as owner names.
pub fn find_duplicates(
    normalized_name: &str,
    candidates: &[CompanyCandidate],
    current_owner: &OwnerReferenceId,
) -> DuplicateVerdict {
    find_duplicates_with(
        normalized_name,
        candidates,
        current_owner,
        &ReferenceIdDirectory,
    )
}

pub fn find_duplicates_with<D>(
    normalized_name: &str,
    candidates: &[CompanyCandidate],
    current_owner: &OwnerReferenceId,
    directory: &D,
) -> DuplicateVerdict
where
    D: OwnerDirectory + ?Sized,
{
    let mut matches: Vec<DuplicateMatch> = candidates
        .iter()
        .filter_map(|candidate| {
            let candidate_name = normalize_company_name(&candidate.company_name);
            let distance = levenshtein(&candidate_name, normalized_name);
            (distance <= MAX_DUPLICATE_DISTANCE).then(|| DuplicateMatch {
                candidate: candidate.clone(),
                normalized_name: candidate_name,
                distance,
            })
        })
        .collect();
    // stable: equal distances keep search order
    matches.sort_by_key(|found| found.distance);

    let Some(closest) = matches.first() else {
        return DuplicateVerdict::no_duplicate();
    };

    let kind = match matches
        .iter()
        .find(|found| &found.candidate.owner_reference_id != current_owner)
    {
        Some(foreign) => {
            let owner = &foreign.candidate.owner_reference_id;
            VerdictKind::OwnedByAnotherAgent {
                company_name: foreign.candidate.company_name.clone(),
                owner_reference_id: owner.clone(),
                owner_name: directory
                    .display_name(owner)
                    .unwrap_or_else(|| owner.to_string()),
            }
        }
        None => VerdictKind::OwnedByYou {
            company_name: closest.candidate.company_name.clone(),
        },
    };

    DuplicateVerdict {
        is_duplicate: true,
        message: message_for(&kind),
        kind,
        matches,
    }
}
