//! Persistence layer for a small university domain.
//!
//! Entities (students, staff, departments, courses) are stored in SQLite and
//! reached through repository contracts; student queries can also be built
//! from composable predicates.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, UnitOfWork};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::course::Course;
pub use model::department::Department;
pub use model::id::{CourseId, DepartmentId, EntityId, StaffId, StudentId};
pub use model::person::Person;
pub use model::staff::Staff;
pub use model::student::Student;
pub use model::view::CourseView;
pub use query::expressions::{has_last_name, is_full_time, is_older_than};
pub use query::predicate::{Predicate, StudentField, Value};
pub use repo::contract::{CrudRepository, ReadOnlyRepository};
pub use repo::course_repo::{CourseQueryRepository, SqliteCourseRepository};
pub use repo::department_repo::SqliteDepartmentRepository;
pub use repo::error::{RepoError, RepoResult};
pub use repo::paging::{Direction, Order, Page, PageRequest, Sort};
pub use repo::sqlite::{SqliteRepository, Table};
pub use repo::staff_repo::SqliteStaffRepository;
pub use repo::student_repo::{
    SqliteStudentRepository, StudentPredicateExecutor, StudentQueryRepository,
};
pub use service::seed::{seed_university, UniversitySeed};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
