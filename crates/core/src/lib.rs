//! PostKasir Core - Shared types library.
//!
//! This crate provides common types used across all PostKasir components:
//! - `api` - The HTTP service (authorization guard, session store, routes)
//! - `cli` - Command-line tools for migrations and store provisioning
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, session tokens,
//!   and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
