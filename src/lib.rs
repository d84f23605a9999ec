//! restkit - CRUD REST resources with filtering, pagination and nested
//! serialization over an in-process entity store

pub mod auth;
pub mod cli;
pub mod controller;
pub mod filter;
pub mod http_server;
pub mod observability;
pub mod pagination;
pub mod schema;
pub mod serializer;
pub mod store;
