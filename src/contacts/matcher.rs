//! PI email lookup
//!
//! Lookups are a linear scan over the table. An exact match on the contact
//! first and last name is tried first; if nothing matches, the full name is
//! searched for as a substring of each row's combined PI names column.

use tracing::debug;

use super::{EmailRecord, EmailTable};

/// Placeholder set on an investigator when no email is found.
pub const NOT_FOUND_SENTINEL: &str = "Email not found in database";

const EMAIL_SEPARATOR: &str = "; ";

/// Find the contact email(s) for a PI.
///
/// Returns the unique, lowercased addresses of every matching row joined with
/// `"; "`, or `None` when the table is absent or nothing matches.
pub fn find_email(table: &EmailTable, first_name: &str, last_name: &str) -> Option<String> {
    let records = table.records()?;

    let first = normalize_name(first_name);
    let last = normalize_name(last_name);

    let exact: Vec<&EmailRecord> = records
        .iter()
        .enumerate()
        .filter(|(row, record)| match (&record.first_name, &record.last_name) {
            (Some(f), Some(l)) => normalize_name(f) == first && normalize_name(l) == last,
            _ => {
                debug!(row = *row, "Skipping row without contact PI name fields");
                false
            }
        })
        .map(|(_, record)| record)
        .collect();

    if !exact.is_empty() {
        return join_emails(&exact);
    }

    let full_name = format!("{} {}", first, last);
    let partial: Vec<&EmailRecord> = records
        .iter()
        .enumerate()
        .filter(|(row, record)| match &record.all_names {
            Some(all) => all.to_uppercase().contains(&full_name),
            None => {
                debug!(row = *row, "Skipping row without combined PI names field");
                false
            }
        })
        .map(|(_, record)| record)
        .collect();

    if partial.is_empty() {
        debug!(first = %first, last = %last, "No PI email match");
        return None;
    }
    join_emails(&partial)
}

fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Unique emails in first-occurrence order, or `None` if every email is blank.
fn join_emails(records: &[&EmailRecord]) -> Option<String> {
    let mut emails: Vec<String> = Vec::new();
    for email in records.iter().filter_map(|record| record.email.as_deref()) {
        let email = email.trim().to_lowercase();
        if !email.is_empty() && !emails.contains(&email) {
            emails.push(email);
        }
    }

    if emails.is_empty() {
        None
    } else {
        Some(emails.join(EMAIL_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EmailTable {
        EmailTable::from(vec![
            EmailRecord::new("JANE", "DOE", "DOE, JANE", "Jane.Doe@Example.edu "),
            EmailRecord::new("John", "Smith", "JOHN SMITH; MARY MAJOR", "jsmith@uni.edu"),
            EmailRecord::new("john", "SMITH", "JOHN SMITH", "john.smith@lab.org"),
            EmailRecord::new("John", "Smith", "JOHN SMITH", "JSMITH@uni.edu"),
            EmailRecord::new("Ann", "Lee", "ANN LEE; MARY MAJOR", "ann.lee@uni.edu"),
            EmailRecord::new("Bob", "Stone", "BOB STONE", "  "),
            EmailRecord {
                first_name: None,
                last_name: Some("Ghost".to_string()),
                all_names: None,
                email: Some("ghost@uni.edu".to_string()),
            },
        ])
    }

    #[test]
    fn test_exact_match_is_case_and_whitespace_insensitive() {
        let table = table();
        for (first, last) in [("Jane", "Doe"), ("  jane ", "DOE  "), ("JANE", "doe")] {
            assert_eq!(
                find_email(&table, first, last),
                Some("jane.doe@example.edu".to_string())
            );
        }
    }

    #[test]
    fn test_duplicate_names_join_unique_emails_in_order() {
        assert_eq!(
            find_email(&table(), "John", "Smith"),
            Some("jsmith@uni.edu; john.smith@lab.org".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_combined_names_substring() {
        assert_eq!(
            find_email(&table(), "Mary", "Major"),
            Some("jsmith@uni.edu; ann.lee@uni.edu".to_string())
        );
    }

    #[test]
    fn test_exact_match_takes_precedence_over_substring() {
        let table = EmailTable::from(vec![
            EmailRecord::new("Other", "Person", "ANN LEE", "other@uni.edu"),
            EmailRecord::new("Ann", "Lee", "ANN LEE", "ann@uni.edu"),
        ]);
        assert_eq!(find_email(&table, "Ann", "Lee"), Some("ann@uni.edu".to_string()));
    }

    #[test]
    fn test_no_match_returns_none() {
        assert_eq!(find_email(&table(), "Nobody", "Here"), None);
    }

    #[test]
    fn test_blank_emails_are_not_a_match() {
        assert_eq!(find_email(&table(), "Bob", "Stone"), None);
    }

    #[test]
    fn test_rows_missing_fields_are_skipped() {
        assert_eq!(find_email(&table(), "", "Ghost"), None);
        assert_eq!(
            find_email(&table(), "Ann", "Lee"),
            Some("ann.lee@uni.edu".to_string())
        );
    }

    #[test]
    fn test_absent_table_returns_none() {
        let table = EmailTable::absent("failed to open");
        assert_eq!(find_email(&table, "Jane", "Doe"), None);
        assert_eq!(find_email(&table, "", ""), None);
    }

    #[test]
    fn test_every_record_is_found_by_its_own_name() {
        let table = table();
        for record in table.records().unwrap() {
            let (Some(first), Some(last), Some(email)) =
                (&record.first_name, &record.last_name, &record.email)
            else {
                continue;
            };
            if email.trim().is_empty() {
                continue;
            }
            let found = find_email(&table, &first.to_lowercase(), &format!(" {} ", last)).unwrap();
            assert!(found.contains(&email.trim().to_lowercase()));
        }
    }
}
