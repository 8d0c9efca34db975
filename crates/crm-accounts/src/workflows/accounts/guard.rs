/// Legal-entity suffixes that may not appear as standalone tokens in an account name.
pub const DISALLOWED_ABBREVIATIONS: [&str; 5] = ["INC", "CORP", "LTD", "CO", "LLC"];

/// Placeholder values agents type when they do not know the company.
pub const RESERVED_NAMES: [&str; 3] = ["NONE", "N/A", "OTHER"];

pub const MIN_NAME_LENGTH: usize = 3;

/// Blocking validation failures for a normalized company name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameRejection {
    #[error("company name must be at least 3 characters")]
    TooShort,
    #[error("'{0}' is not a valid company name")]
    Reserved(String),
    #[error("company names starting with '#' require supporting documentation")]
    RequiresDocumentation,
    #[error("remove the abbreviation '{token}' from the company name")]
    DisallowedAbbreviation { token: String },
}

impl NameRejection {
    /// Stable machine-readable code for API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            NameRejection::TooShort => "too_short",
            NameRejection::Reserved(_) => "reserved_value",
            NameRejection::RequiresDocumentation => "requires_documentation",
            NameRejection::DisallowedAbbreviation { .. } => "disallowed_abbreviation",
        }
    }
}

pub fn has_disallowed_abbreviation(normalized: &str) -> bool {
    disallowed_token(normalized).is_some()
}

fn disallowed_token(normalized: &str) -> Option<&str> {
    normalized
        .split_whitespace()
        .find(|token| DISALLOWED_ABBREVIATIONS.contains(token))
}

/// Apply every blocking rule; the first failure wins.
pub fn validate_company_name(normalized: &str) -> Result<(), NameRejection> {
    if normalized.chars().count() < MIN_NAME_LENGTH {
        return Err(NameRejection::TooShort);
    }

    if RESERVED_NAMES.contains(&normalized) {
        return Err(NameRejection::Reserved(normalized.to_string()));
    }

    if normalized.starts_with('#') {
        return Err(NameRejection::RequiresDocumentation);
    }

    if let Some(token) = disallowed_token(normalized) {
        return Err(NameRejection::DisallowedAbbreviation {
            token: token.to_string(),
        });
    }

    Ok(())
}
