//! Course entity.
//!
//! # Invariants
//! - `instructor` and `department` must reference saved rows; the store
//!   rejects dangling ids with a foreign key violation.
//! - Prerequisites form a set: adding the same course twice is a no-op.

use super::id::{CourseId, DepartmentId, StaffId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// A course offered by a department and taught by one instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: Option<CourseId>,
    name: String,
    credits: i32,
    instructor: StaffId,
    department: DepartmentId,
    prerequisites: BTreeSet<CourseId>,
}

impl Course {
    pub fn new(
        name: impl Into<String>,
        credits: i32,
        instructor: StaffId,
        department: DepartmentId,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            credits,
            instructor,
            department,
            prerequisites: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> Option<CourseId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credits(&self) -> i32 {
        self.credits
    }

    pub fn instructor(&self) -> StaffId {
        self.instructor
    }

    pub fn department(&self) -> DepartmentId {
        self.department
    }

    pub fn prerequisites(&self) -> &BTreeSet<CourseId> {
        &self.prerequisites
    }

    /// Returns `false` when the course was already a prerequisite.
    pub fn add_prerequisite(&mut self, course: CourseId) -> bool {
        self.prerequisites.insert(course)
    }

    pub fn remove_prerequisite(&mut self, course: CourseId) -> bool {
        self.prerequisites.remove(&course)
    }

    pub(crate) fn with_id(mut self, id: CourseId) -> Self {
        self.id = Some(id);
        self
    }

    pub(crate) fn with_prerequisites(mut self, prerequisites: BTreeSet<CourseId>) -> Self {
        self.prerequisites = prerequisites;
        self
    }
}

impl Display for Course {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Course{{id=")?;
        match self.id {
            Some(id) => write!(f, "{id}")?,
            None => write!(f, "unsaved")?,
        }
        write!(
            f,
            ", name='{}', credits={}, instructor={}, department={}}}",
            self.name, self.credits, self.instructor, self.department
        )
    }
}
