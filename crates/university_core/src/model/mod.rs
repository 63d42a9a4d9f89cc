//! University domain model.
//!
//! # Responsibility
//! - Define entities (`Student`, `Staff`, `Department`, `Course`), the
//!   embedded `Person` value and the `CourseView` projection.
//! - Keep identity store-assigned: constructors never take an id.
//!
//! # Invariants
//! - An entity that has never been saved carries `id() == None`.
//! - Relationships between entities are held as typed ids only.

pub mod course;
pub mod department;
pub mod id;
pub mod person;
pub mod staff;
pub mod student;
pub mod view;
