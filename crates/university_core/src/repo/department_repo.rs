//! Department table mapping.
//!
//! # Invariants
//! - Deleting a department that courses still reference fails with a
//!   foreign key violation; nothing cascades from departments.

use super::error::RepoResult;
use super::sqlite::{SqliteRepository, Table};
use crate::model::department::Department;
use crate::model::id::DepartmentId;
use rusqlite::{params, Connection, Row};

/// SQLite-backed department repository.
pub type SqliteDepartmentRepository<'conn> = SqliteRepository<'conn, Department>;

impl Table for Department {
    type Id = DepartmentId;

    const NAME: &'static str = "department";
    const COLUMNS: &'static [&'static str] = &["id", "name", "chair_id"];

    fn sort_column(property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("department.id"),
            "name" => Some("department.name"),
            "chair" => Some("department.chair_id"),
            _ => None,
        }
    }

    fn id(&self) -> Option<DepartmentId> {
        Department::id(self)
    }

    fn assigned(self, id: DepartmentId) -> Self {
        self.with_id(id)
    }

    fn from_row(_conn: &Connection, row: &Row<'_>) -> RepoResult<Self> {
        let department = Department::new(row.get::<_, String>("name")?, row.get("chair_id")?);
        Ok(department.with_id(row.get("id")?))
    }

    fn write(&self, conn: &Connection) -> RepoResult<DepartmentId> {
        match Department::id(self) {
            Some(id) => {
                conn.execute(
                    "INSERT INTO department (id, name, chair_id)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        chair_id = excluded.chair_id;",
                    params![id, self.name(), self.chair()],
                )?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO department (name, chair_id) VALUES (?1, ?2);",
                    params![self.name(), self.chair()],
                )?;
                Ok(DepartmentId::new(conn.last_insert_rowid()))
            }
        }
    }
}
