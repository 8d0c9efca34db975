use std::io::Write;

use serde::Serialize;

use super::domain::{AccountRecord, OwnerReferenceId};
use super::matcher::{levenshtein, MAX_DUPLICATE_DISTANCE};

/// Pair of stored accounts whose normalized names are near-duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateFinding {
    pub first_company: String,
    pub first_owner: OwnerReferenceId,
    pub second_company: String,
    pub second_owner: OwnerReferenceId,
    pub distance: usize,
    pub cross_owner: bool,
}

/// Scan existing accounts for near-duplicate pairs.
pub fn audit_duplicates(accounts: &[AccountRecord]) -> Vec<DuplicateFinding> {
    let lengths: Vec<usize> = accounts
        .iter()
        .map(|account| account.normalized_name.chars().count())
        .collect();
    let mut findings = Vec::new();

    for (i, first) in accounts.iter().enumerate() {
        for (j, second) in accounts.iter().enumerate().skip(i + 1) {
            if lengths[i].abs_diff(lengths[j]) > MAX_DUPLICATE_DISTANCE {
                continue;
            }
            let distance = levenshtein(&first.normalized_name, &second.normalized_name);
            if distance > MAX_DUPLICATE_DISTANCE {
                continue;
            }
            findings.push(DuplicateFinding {
                first_company: first.company_name.clone(),
                first_owner: first.owner_reference_id.clone(),
                second_company: second.company_name.clone(),
                second_owner: second.owner_reference_id.clone(),
                distance,
                cross_owner: first.owner_reference_id != second.owner_reference_id,
            });
        }
    }

    findings.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| a.first_company.cmp(&b.first_company))
            .then_with(|| a.second_company.cmp(&b.second_company))
    });
    findings
}

/// Write findings as CSV with a header row.
pub fn write_audit_csv<W: Write>(findings: &[DuplicateFinding], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "First Company",
        "First Owner",
        "Second Company",
        "Second Owner",
        "Distance",
        "Cross Owner",
    ])?;
    for finding in findings {
        csv_writer.write_record([
            finding.first_company.as_str(),
            finding.first_owner.as_str(),
            finding.second_company.as_str(),
            finding.second_owner.as_str(),
            finding.distance.to_string().as_str(),
            if finding.cross_owner { "yes" } else { "no" },
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::accounts::directory::AccountDirectory;

    fn accounts() -> Vec<AccountRecord> {
        let directory = AccountDirectory::new();
        for (name, owner) in [
            ("Acme Trading", "U1"),
            ("Acme Tradng", "U2"),
            ("Acme Trade", "U1"),
            ("Globex Holdings", "U3"),
        ] {
            directory
                .insert(name, OwnerReferenceId::new(owner))
                .expect("seed account");
        }
        directory.accounts().expect("list accounts")
    }

    #[test]
    fn finds_every_near_duplicate_pair() {
        let findings = audit_duplicates(&accounts());

        let pairs: Vec<_> = findings
            .iter()
            .map(|f| {
                (
                    f.first_company.as_str(),
                    f.second_company.as_str(),
                    f.distance,
                    f.cross_owner,
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Acme Trading", "Acme Tradng", 1, true),
                ("Acme Trade", "Acme Tradng", 2, true),
            ]
        );
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let findings = audit_duplicates(&accounts());
        let mut buffer = Vec::new();
        write_audit_csv(&findings, &mut buffer).expect("csv written");

        let output = String::from_utf8(buffer).expect("utf8 csv");
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("First Company,First Owner,Second Company,Second Owner,Distance,Cross Owner")
        );
        assert_eq!(lines.next(), Some("Acme Trading,U1,Acme Tradng,U2,1,yes"));
        assert_eq!(output.lines().count(), 3);
    }
}
