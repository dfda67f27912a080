//! Read-side use-case services over the record store.
//!
//! # Invariants
//! - Services never mutate or cache store state; every call recomputes.

pub mod dashboard;
