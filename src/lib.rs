pub mod api;
pub mod auth;
pub mod config;
pub mod mcp;
pub mod store;
