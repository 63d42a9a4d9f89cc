//! Staff entity.

use super::id::StaffId;
use super::person::Person;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A university staff member. Chairs departments and instructs courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    id: Option<StaffId>,
    member: Person,
}

impl Staff {
    pub fn new(member: Person) -> Self {
        Self { id: None, member }
    }

    pub fn id(&self) -> Option<StaffId> {
        self.id
    }

    pub fn member(&self) -> &Person {
        &self.member
    }

    pub(crate) fn with_id(mut self, id: StaffId) -> Self {
        self.id = Some(id);
        self
    }
}

impl Display for Staff {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Staff{{id={id}, {}}}", self.member),
            None => write!(f, "Staff{{id=unsaved, {}}}", self.member),
        }
    }
}
