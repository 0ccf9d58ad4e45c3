//! Use-case services over the record store.
//!
//! # Responsibility
//! - Turn raw form-style input into validated store mutations.
//! - Keep front ends decoupled from persistence details.

pub mod contact_service;
pub mod dashboard;
