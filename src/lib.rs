//! Calsnap: calorie tracking backend.
//!
//! Users register, log food entries (optionally estimated from a photo by
//! an external AI vision service) and read daily/weekly dashboards.

pub mod app;
pub mod auth;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod entries;
pub mod error;
pub mod recognition;
pub mod state;
pub mod store;
