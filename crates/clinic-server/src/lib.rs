//! # clinic-server
//!
//! HTTP server for the clinic records service: configuration loading, logging
//! setup, middleware and the axum router over the entity collections.

pub mod config;
pub mod config_watch;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;
pub mod store;

pub use config::AppConfig;
pub use server::{AppState, ClinicServer, ServerBuilder, build_app, build_router};
pub use store::{ClinicStore, Stored};
