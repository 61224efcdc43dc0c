//! Haven Core - Shared types library.
//!
//! This crate provides common types used across all Haven components:
//! - `portal` - Public-facing property-listing site
//! - `integration-tests` - End-to-end test suite
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - The identity data model: provider claims, the server-held
//!   session token, the canonical customer record, the client-visible session
//!   projection, and referral completion events

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
