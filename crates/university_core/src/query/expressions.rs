//! Ready-made student conditions, meant to be combined with `and`/`or`:
//!
//! ```
//! use university_core::query::expressions::{has_last_name, is_full_time, is_older_than};
//!
//! let smiths_over_15 = has_last_name("Smith").and(is_older_than(15));
//! let full_time_or_over_20 = is_full_time() | is_older_than(20);
//! # let _ = (smiths_over_15, full_time_or_over_20);
//! ```

use super::predicate::{Predicate, StudentField};

/// Students whose family name is exactly `last_name`.
pub fn has_last_name(last_name: impl Into<String>) -> Predicate {
    Predicate::eq(StudentField::LastName, last_name.into())
}

pub fn is_full_time() -> Predicate {
    Predicate::eq(StudentField::FullTime, true)
}

/// Students strictly older than `age`.
pub fn is_older_than(age: i32) -> Predicate {
    Predicate::gt(StudentField::Age, age)
}
