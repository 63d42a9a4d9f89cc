//! Student entity.
//!
//! # Invariants
//! - `id` is assigned by the store on first save and never changed.
//! - `attendee` is fixed at construction; only `age` and the course list
//!   change afterwards.
//! - The course list is ordered and owned: a course sits on at most one
//!   student's list, and deleting a student through the per-entity path
//!   deletes the listed courses too.

use super::id::{CourseId, StudentId};
use super::person::Person;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A student enrolled at the university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    id: Option<StudentId>,
    attendee: Person,
    full_time: bool,
    age: i32,
    courses: Vec<CourseId>,
}

impl Student {
    /// Creates an unsaved student with an empty course list.
    pub fn new(attendee: Person, full_time: bool, age: i32) -> Self {
        Self {
            id: None,
            attendee,
            full_time,
            age,
            courses: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<StudentId> {
        self.id
    }

    pub fn attendee(&self) -> &Person {
        &self.attendee
    }

    pub fn is_full_time(&self) -> bool {
        self.full_time
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn set_age(&mut self, age: i32) {
        self.age = age;
    }

    /// Course ids in enrollment order.
    pub fn courses(&self) -> &[CourseId] {
        &self.courses
    }

    /// Appends a course to the end of the enrollment list.
    pub fn add_course(&mut self, course: CourseId) {
        self.courses.push(course);
    }

    pub fn remove_course(&mut self, course: CourseId) {
        self.courses.retain(|current| *current != course);
    }

    pub(crate) fn with_id(mut self, id: StudentId) -> Self {
        self.id = Some(id);
        self
    }

    pub(crate) fn with_courses(mut self, courses: Vec<CourseId>) -> Self {
        self.courses = courses;
        self
    }
}

impl Display for Student {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Student{{id=")?;
        match self.id {
            Some(id) => write!(f, "{id}")?,
            None => write!(f, "unsaved")?,
        }
        write!(
            f,
            ", {}, full_time={}, age={}}}",
            self.attendee, self.full_time, self.age
        )
    }
}
