//! Staff table mapping.
//!
//! Staff rows are referenced by departments (chair) and courses
//! (instructor); deleting a referenced staff member fails with a foreign key
//! violation.

use super::error::RepoResult;
use super::sqlite::{SqliteRepository, Table};
use crate::model::id::StaffId;
use crate::model::person::Person;
use crate::model::staff::Staff;
use rusqlite::{params, Connection, Row};

/// SQLite-backed staff repository.
pub type SqliteStaffRepository<'conn> = SqliteRepository<'conn, Staff>;

impl Table for Staff {
    type Id = StaffId;

    const NAME: &'static str = "staff";
    const COLUMNS: &'static [&'static str] = &["id", "first_name", "last_name"];

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("staff.id"),
            "member.first_name" => Some("staff.first_name"),
            "member.last_name" => Some("staff.last_name"),
            _ => None,
        }
    }

    fn id(&self) -> Option<StaffId> {
        Staff::id(self)
    }

    fn assigned(self, id: StaffId) -> Self {
        self.with_id(id)
    }

    fn from_row(_conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        let member = Person::new(
            row.get::<_, String>("first_name")?,
            row.get::<_, String>("last_name")?,
        );
        Ok(Staff::new(member).with_id(row.get("id")?))
    }

    fn write(&self, conn: &Connection) -> RepoResult<StaffId> {
        let member = self.member();
        match Staff::id(self) {
            Some(id) => {
                conn.execute(
                    "INSERT INTO staff (id, first_name, last_name)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET
                        first_name = excluded.first_name,
                        last_name = excluded.last_name;",
                    params![id, member.first_name(), member.last_name()],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO staff (first_name, last_name) VALUES (?1, ?2);",
                    params![member.first_name(), member.last_name()],
                )?;
                Ok(StaffId::new(conn.last_insert_rowid()))
            }
        }
    }
}
