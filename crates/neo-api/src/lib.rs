//! # neo-api
//!
//! HTTP surface for the NEO Tracker.
//!
//! This crate serves the server-rendered dashboard (report mode and filter
//! mode) and a small JSON API over the same report catalog and approach
//! filter, plus health probes and optional Swagger UI.

pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod web;

pub use error::ApiError;
pub use server::{ApiServer, ApiServerConfig};
pub use state::AppState;
