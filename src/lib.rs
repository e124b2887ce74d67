//! KitchenGuard node library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. Hardware and broker access is confined to [`adapters`];
//! everything else depends only on the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod app;
pub mod classifier;
pub mod config;
pub mod display;
pub mod session;
pub mod telemetry;

pub mod adapters;
