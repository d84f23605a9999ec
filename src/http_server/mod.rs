//! # HTTP Server Module
//!
//! Axum server exposing every resource over REST.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/metrics` - Request and mutation counters
//! - `/{resource}/` and `/{resource}/:id/` for `employees`, `students`,
//!   `blogs`, `comments`, `chai` and `tweets`

pub mod config;
pub mod observability_routes;
pub mod resource_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{route_table, HttpServer, Services};
