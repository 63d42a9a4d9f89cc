//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the read-only and CRUD contracts plus entity-specific finders.
//! - Isolate SQL details from callers; every caller value is bound.
//!
//! # Invariants
//! - Missing rows are reported as `None`/`false`, not as errors.
//! - Store integrity failures propagate unchanged as `RepoError::Db`.

pub mod contract;
pub mod course_repo;
pub mod department_repo;
pub mod error;
pub mod paging;
pub mod sqlite;
pub mod staff_repo;
pub mod student_repo;
