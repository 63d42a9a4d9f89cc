//! Typed store-assigned identifiers.
//!
//! Each entity table uses an `INTEGER PRIMARY KEY`; wrapping the rowid in a
//! per-entity newtype keeps a `CourseId` from being passed where a
//! `StaffId` is expected.

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Common behavior of entity identifiers.
pub trait EntityId: Copy + Eq + Ord + std::hash::Hash + std::fmt::Debug {
    /// Wraps a raw rowid.
    fn from_raw(value: i64) -> Self;
    /// Returns the raw rowid.
    fn raw(self) -> i64;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl EntityId for $name {
            fn from_raw(value: i64) -> Self {
                Self(value)
            }

            fn raw(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identifier of a `Student` row.
    StudentId
);
entity_id!(
    /// Identifier of a `Staff` row.
    StaffId
);
entity_id!(
    /// Identifier of a `Department` row.
    DepartmentId
);
entity_id!(
    /// Identifier of a `Course` row.
    CourseId
);
