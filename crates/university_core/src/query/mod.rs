//! Composable query conditions.
//!
//! # Responsibility
//! - Model boolean conditions over student fields as an expression tree
//!   that callers build independently of any repository method.
//! - Offer ready-made expressions for the common student filters.
//!
//! # See also
//! - `repo::student_repo::StudentPredicateExecutor`

pub mod expressions;
pub mod predicate;
