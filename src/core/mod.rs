//! core
//!
//! Core domain types, parsing, and configuration for testmeta.
//!
//! # Modules
//!
//! - [`types`] - Ordered metadata mapping and strong types (`Oid`)
//! - [`keyvalue`] - `KEY=VALUE` file parsing (`/etc/os-release`)
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod keyvalue;
pub mod types;
