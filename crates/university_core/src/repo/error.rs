//! Repository error type shared by every entity repository.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from repository reads, writes and readiness checks.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error, including integrity failures.
    Db(DbError),
    /// A single-result finder matched more than one row.
    NonUniqueResult { entity: &'static str, count: usize },
    /// Sort property is not a sortable field of the entity.
    UnknownSortProperty {
        entity: &'static str,
        property: String,
    },
    /// Page size must be at least one.
    InvalidPageRequest { size: u32 },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be mapped back into an entity.
    InvalidData(String),
}

impl RepoError {
    /// Returns whether the store rejected the call with an integrity failure,
    /// e.g. deleting a department that courses still reference.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Db(err) => err.is_constraint_violation(),
            _ => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NonUniqueResult { entity, count } => write!(
                f,
                "expected at most one {entity} but the query returned {count}"
            ),
            Self::UnknownSortProperty { entity, property } => {
                write!(f, "`{property}` is not a sortable property of {entity}")
            }
            Self::InvalidPageRequest { size } => {
                write!(f, "page size must be at least 1, got {size}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
