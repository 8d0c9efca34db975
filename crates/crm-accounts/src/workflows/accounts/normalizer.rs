/// Characters removed outright before comparison.
const STRIPPED_CHARACTERS: [char; 7] = ['-', '_', '.', '@', '!', '$', '%'];

/// Canonical form of a company name used for validation and duplicate matching.
///
/// Uppercases, drops `- _ . @ ! $ %`, collapses whitespace, then strips trailing
/// digits ("ACME 2" and "ACME 1 2" both become "ACME").
pub fn normalize_company_name(raw: &str) -> String {
    let upper = raw.to_uppercase();
    let cleaned: String = upper
        .chars()
        .filter(|ch| !STRIPPED_CHARACTERS.contains(ch))
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut trimmed = collapsed.as_str();
    while trimmed.ends_with(|ch: char| ch.is_ascii_digit()) {
        trimmed = trimmed
            .trim_end_matches(|ch: char| ch.is_ascii_digit())
            .trim_end();
    }

    trimmed.to_string()
}
