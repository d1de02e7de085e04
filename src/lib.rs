//! ParcelButton firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module, so the entire
//! coordination core builds and tests on the host.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod coordinator;
pub mod drivers;
pub mod error;
pub mod messages;

pub mod adapters;
