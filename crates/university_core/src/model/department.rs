//! Department entity.
//!
//! Names are unique by convention only; nothing in the schema enforces it.

use super::id::{DepartmentId, StaffId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An academic department chaired by one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: Option<DepartmentId>,
    name: String,
    chair: StaffId,
}

impl Department {
    pub fn new(name: impl Into<String>, chair: StaffId) -> Self {
        Self {
            id: None,
            name: name.into(),
            chair,
        }
    }

    pub fn id(&self) -> Option<DepartmentId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chair(&self) -> StaffId {
        self.chair
    }

    pub fn set_chair(&mut self, chair: StaffId) {
        self.chair = chair;
    }

    pub(crate) fn with_id(mut self, id: DepartmentId) -> Self {
        self.id = Some(id);
        self
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(
                f,
                "Department{{id={id}, name='{}', chair={}}}",
                self.name, self.chair
            ),
            None => write!(
                f,
                "Department{{id=unsaved, name='{}', chair={}}}",
                self.name, self.chair
            ),
        }
    }
}
