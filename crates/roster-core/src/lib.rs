//! Core types and trait definitions for the Roster records service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the domain records, the role registry, the orphan invariant guard, payload
//! validation primitives, and the [`store::RecordStore`] contract that
//! backends implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod entity;
pub mod error;
pub mod grade;
pub mod organisation;
pub mod orphan;
pub mod person;
pub mod roles;
pub mod school;
pub mod scope;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
