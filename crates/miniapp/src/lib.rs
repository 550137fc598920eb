//! Nexus Gear mini-app core.
//!
//! This crate holds the state engine behind the storefront mini-app that
//! runs inside a host chat/webview environment. The embedding shell (a
//! webview frontend or a native wrapper) supplies implementations of the
//! host-bridge traits and drives the engine from its event loop.
//!
//! # Architecture
//!
//! - [`cart`] - the cart state engine: hydration, mutations, aggregates,
//!   and dual-backend persistence
//! - [`storage`] - best-effort persistence over a synchronous local store
//!   and the host's asynchronous cloud store
//! - [`bridge`] - the host WebApp surface (lifecycle, main button, cloud
//!   storage, alerts) behind capability-checked traits
//! - [`services`] - checkout submission and auth bootstrap clients
//! - [`notify`] - toast notification queue
//! - [`config`], [`error`], [`telemetry`] - configuration, error
//!   taxonomy, and logging setup
//!
//! All cart mutations are synchronous and run on the caller's event loop;
//! the only asynchronous work is fire-and-forget cloud persistence and the
//! checkout/auth HTTP calls.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bridge;
pub mod cart;
pub mod config;
pub mod error;
pub mod notify;
pub mod services;
pub mod state;
pub mod storage;
pub mod telemetry;
