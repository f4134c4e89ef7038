//! Cotador Core - Shared types library.
//!
//! This crate provides common types used across all Cotador components:
//! - `portal` - Login/registration screens, admin panel and quoting pages
//! - `cli` - Command-line tools for catalog checks and bootstrap tasks
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no platform access. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Account lifecycle, CPF/phone masking, plan catalog and quote
//!   calculation types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
