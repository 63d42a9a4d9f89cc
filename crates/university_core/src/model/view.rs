//! Read-only projections assembled from joined query rows.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Flattened view of a course with its instructor and department names.
///
/// Not mapped to any table and never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseView {
    name: String,
    instructor_last_name: String,
    department_name: String,
}

impl CourseView {
    /// Builds a view by hand, e.g. as a fallback for a missing query result.
    pub fn new(
        name: impl Into<String>,
        instructor_last_name: impl Into<String>,
        department_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instructor_last_name: instructor_last_name.into(),
            department_name: department_name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructor_last_name(&self) -> &str {
        &self.instructor_last_name
    }

    pub fn department_name(&self) -> &str {
        &self.department_name
    }
}

impl Display for CourseView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CourseView{{name='{}', instructor_last_name='{}', department_name='{}'}}",
            self.name, self.instructor_last_name, self.department_name
        )
    }
}
