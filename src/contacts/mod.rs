//! PI Contact Table
//!
//! In-memory reference data mapping principal investigator names to contact
//! emails. The table is read once at startup from a spreadsheet and is never
//! written afterwards.
//!
//! - `loader` - reads `.xlsx`/`.xls`/`.ods` workbooks and `.csv` files
//! - `matcher` - name lookups against the loaded rows

pub mod loader;
pub mod matcher;

pub use loader::{load_email_table, LoadError};
pub use matcher::{find_email, NOT_FOUND_SENTINEL};

pub const FIRST_NAME_COLUMN: &str = "Contact PI First Name";
pub const LAST_NAME_COLUMN: &str = "Contact PI Last Name";
pub const ALL_NAMES_COLUMN: &str = "PI Name(s) All";
pub const EMAIL_COLUMN: &str = "Contact PI Email";

/// One row of the source spreadsheet. Any column may be missing in a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub all_names: Option<String>,
    pub email: Option<String>,
}

impl EmailRecord {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        all_names: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            all_names: Some(all_names.into()),
            email: Some(email.into()),
        }
    }
}

/// Load state of the contact table.
///
/// `Absent` means the spreadsheet could not be read at startup; it is distinct
/// from `Loaded` with zero rows.
#[derive(Debug, Clone)]
pub enum EmailTable {
    Absent { reason: String },
    Loaded(Vec<EmailRecord>),
}

impl EmailTable {
    pub fn absent(reason: impl Into<String>) -> Self {
        EmailTable::Absent {
            reason: reason.into(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, EmailTable::Absent { .. })
    }

    /// Row count, 0 when the table failed to load.
    pub fn len(&self) -> usize {
        match self {
            EmailTable::Absent { .. } => 0,
            EmailTable::Loaded(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Option<&[EmailRecord]> {
        match self {
            EmailTable::Absent { .. } => None,
            EmailTable::Loaded(rows) => Some(rows),
        }
    }

    /// Status label reported by the health check.
    pub fn status(&self) -> &'static str {
        match self {
            EmailTable::Absent { .. } => "absent",
            EmailTable::Loaded(rows) if rows.is_empty() => "empty",
            EmailTable::Loaded(_) => "loaded",
        }
    }
}

impl From<Vec<EmailRecord>> for EmailTable {
    fn from(rows: Vec<EmailRecord>) -> Self {
        EmailTable::Loaded(rows)
    }
}
