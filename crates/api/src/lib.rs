//! HTTP API: configuration, authority wiring, session validation and routes.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
