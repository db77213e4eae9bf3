//! Core types, validators and business rules for the road registry.
//!
//! This crate is deliberately free of database and CLI dependencies. Storage
//! backends implement [`store::RecordStore`]; front ends drive a
//! [`Registry`], which owns the validation and state-transition logic.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod demerit;
pub mod error;
pub mod legacy;
pub mod memory;
pub mod person;
pub mod registry;
pub mod rules;
pub mod store;
pub mod validate;

pub use error::{Error, Result, RuleViolation, ValidationError};
pub use registry::Registry;
