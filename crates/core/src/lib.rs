//! Nexus Gear Core - Shared types library.
//!
//! This crate provides common types used across the Nexus Gear mini-app
//! components:
//! - `miniapp` - Cart engine, persistence, and host-bridge integration
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no host-bridge access. This keeps it lightweight and allows it
//! to be used anywhere, including inside test doubles.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and catalog records
//! - [`phone`] - Normalization and validation for RU mobile numbers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod phone;
pub mod types;

pub use types::*;
