//! Model Context Protocol (MCP) server.
//!
//! Exposes the todo domain to AI-agent clients over the Streamable HTTP
//! transport: one resource template for reading todos and three tools for
//! mutating them. The bearer principal is established once per connection
//! by the `/sse` middleware; every call runs against that principal's list.

pub mod server;
mod service;


pub use server::TodoMcp;
pub use service::create_mcp_service;
