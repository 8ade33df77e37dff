//! Contact spreadsheet loading
//!
//! The first worksheet of a workbook (or the whole of a CSV file) is read into
//! [`EmailRecord`]s. The first row is the header row; the four contact columns
//! are located by name, ignoring case and surrounding whitespace.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;
use tracing::{error, info, warn};

use super::{
    EmailRecord, EmailTable, ALL_NAMES_COLUMN, EMAIL_COLUMN, FIRST_NAME_COLUMN, LAST_NAME_COLUMN,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Email table file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook has no worksheets")]
    NoWorksheet,

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Load the contact table from `path`.
///
/// Never fails: any error is logged with directory listings of the target and
/// working directories, and the table is returned as [`EmailTable::Absent`].
pub fn load_email_table(path: &Path) -> EmailTable {
    info!(path = %path.display(), "Loading PI email table");

    match read_records(path) {
        Ok(records) => {
            info!(path = %path.display(), rows = records.len(), "PI email table loaded");
            EmailTable::Loaded(records)
        }
        Err(e) => {
            let target_dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

            error!(
                path = %path.display(),
                error = %e,
                target_dir = %target_dir.display(),
                target_dir_contents = %list_dir(target_dir),
                cwd = %cwd.display(),
                cwd_contents = %list_dir(&cwd),
                "Failed to load PI email table, email lookups are disabled"
            );
            EmailTable::absent(e.to_string())
        }
    }
}

/// Parse every data row of the file at `path`.
pub fn read_records(path: &Path) -> Result<Vec<EmailRecord>, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        read_csv(path)
    } else {
        read_workbook(path)
    }
}

fn read_workbook(path: &Path) -> Result<Vec<EmailRecord>, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = ColumnIndex::from_headers(header.iter().map(|cell| cell.to_string()));

    let records = rows
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|row| columns.record(|idx| row.get(idx).and_then(cell_text)))
        .collect();

    Ok(records)
}

fn read_csv(path: &Path) -> Result<Vec<EmailRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns = ColumnIndex::from_headers(reader.headers()?.iter().map(str::to_string));

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        records.push(columns.record(|idx| {
            row.get(idx)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
        }));
    }

    Ok(records)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Positions of the contact columns within the header row.
#[derive(Debug, Default)]
struct ColumnIndex {
    first_name: Option<usize>,
    last_name: Option<usize>,
    all_names: Option<usize>,
    email: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: impl Iterator<Item = String>) -> Self {
        let mut index = ColumnIndex::default();
        for (i, header) in headers.enumerate() {
            let header = header.trim();
            let slot = if header.eq_ignore_ascii_case(FIRST_NAME_COLUMN) {
                &mut index.first_name
            } else if header.eq_ignore_ascii_case(LAST_NAME_COLUMN) {
                &mut index.last_name
            } else if header.eq_ignore_ascii_case(ALL_NAMES_COLUMN) {
                &mut index.all_names
            } else if header.eq_ignore_ascii_case(EMAIL_COLUMN) {
                &mut index.email
            } else {
                continue;
            };
            // first occurrence wins
            slot.get_or_insert(i);
        }

        if index.first_name.is_none()
            && index.last_name.is_none()
            && index.all_names.is_none()
            && index.email.is_none()
        {
            warn!("No PI contact columns found in header row, lookups will never match");
        }
        index
    }

    fn record(&self, cell: impl Fn(usize) -> Option<String>) -> EmailRecord {
        EmailRecord {
            first_name: self.first_name.and_then(&cell),
            last_name: self.last_name.and_then(&cell),
            all_names: self.all_names.and_then(&cell),
            email: self.email.and_then(&cell),
        }
    }
}

/// Comma separated directory listing for diagnostics.
fn list_dir(dir: &Path) -> String {
    match fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names.join(", ")
        }
        Err(e) => format!("<unreadable: {}>", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv_table() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "emails.csv",
            "Contact PI First Name,Contact PI Last Name,PI Name(s) All,Contact PI Email\n\
             JANE,DOE,\"DOE, JANE; SMITH, JOHN\",jane.doe@example.edu\n\
             ,,,\n\
             John,Smith,,\n",
        );

        let table = load_email_table(&path);
        let records = table.records().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].first_name.as_deref(), Some("JANE"));
        assert_eq!(records[0].all_names.as_deref(), Some("DOE, JANE; SMITH, JOHN"));
        assert_eq!(records[0].email.as_deref(), Some("jane.doe@example.edu"));
        assert_eq!(records[1].email, None);
    }

    #[test]
    fn test_header_matching_ignores_case_and_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "emails.csv",
            "Project,contact pi email, CONTACT PI LAST NAME ,Contact PI First Name\n\
             R01-1,a@b.org,Doe,Jane\n",
        );

        let records = read_records(&path).unwrap();

        assert_eq!(
            records,
            vec![EmailRecord {
                first_name: Some("Jane".to_string()),
                last_name: Some("Doe".to_string()),
                all_names: None,
                email: Some("a@b.org".to_string()),
            }]
        );
    }

    #[test]
    fn test_header_only_file_is_loaded_but_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "emails.csv",
            "Contact PI First Name,Contact PI Last Name,PI Name(s) All,Contact PI Email\n",
        );

        let table = load_email_table(&path);

        assert!(!table.is_absent());
        assert_eq!(table.status(), "empty");
    }

    #[test]
    fn test_missing_file_leaves_table_absent() {
        let dir = TempDir::new().unwrap();
        let table = load_email_table(&dir.path().join("nope.xlsx"));

        assert!(table.is_absent());
        assert_eq!(table.len(), 0);
        match table {
            EmailTable::Absent { reason } => assert!(reason.contains("nope.xlsx")),
            EmailTable::Loaded(_) => panic!("expected absent table"),
        }
    }

    #[test]
    fn test_corrupt_workbook_leaves_table_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "emails.xlsx", "this is not a zip archive");

        assert!(load_email_table(&path).is_absent());
    }

    #[test]
    fn test_load_xlsx_table() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pi_emails.xlsx");

        let table = load_email_table(&path);

        assert_eq!(table.status(), "loaded");
        assert_eq!(
            table.records().unwrap(),
            &[
                EmailRecord::new(
                    "Jane",
                    "Doe",
                    "DOE, JANE; ROE, PAT",
                    "Jane.Doe@Example.edu"
                ),
                EmailRecord {
                    first_name: Some("Lee".to_string()),
                    last_name: Some("7".to_string()),
                    all_names: None,
                    email: Some("lee@lab.org".to_string()),
                },
            ]
        );
        assert_eq!(
            crate::contacts::find_email(&table, "jane", "DOE"),
            Some("jane.doe@example.edu".to_string())
        );
    }

    #[test]
    fn test_list_dir_reports_entries() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "b.csv", "");
        write_file(&dir, "a.xlsx", "");

        assert_eq!(list_dir(dir.path()), "a.xlsx, b.csv");
        assert!(list_dir(&dir.path().join("missing")).starts_with("<unreadable"));
    }
}
