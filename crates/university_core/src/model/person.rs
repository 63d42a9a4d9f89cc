//! Embedded name value shared by students and staff.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A person's given and family name.
///
/// `Person` has no identity of its own. It is stored inline in the owning
/// row as `first_name`/`last_name` columns and rebuilt on read. Fields are
/// private so a value cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    first_name: String,
    last_name: String,
}

impl Person {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "first_name='{}', last_name='{}'",
            self.first_name, self.last_name
        )
    }
}
