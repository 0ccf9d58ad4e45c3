//! List-view filtering.
//!
//! # Responsibility
//! - Compose conjunctions of optional predicates over any record type.
//! - Provide ready-made queries for contacts and interactions.
//!
//! # Invariants
//! - A blank or absent filter value matches everything.
//! - Filtering never reorders; results keep insertion order.

pub mod contact_query;
pub mod filter;

pub use contact_query::{ContactQuery, ContactSort, InteractionQuery};
pub use filter::Filter;
