//! Use-case helpers built on top of the repositories.
//!
//! # Responsibility
//! - Populate a store with the demonstration university.

pub mod seed;
