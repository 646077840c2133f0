//! Axum-based MCP trust-brief service.
//!
//! This crate provides:
//! - `GET /` - Liveness check
//! - `GET /mcp` - Static tool-descriptor document for the MCP integration
//! - `POST /mcp/validate` - Bearer-token validation returning the owner phone
//! - `POST /mcp/analyze_claim` - Trust Brief for a text claim or a URL

#![warn(missing_docs)]

pub mod fetch;
/// Service runtime and in-process app builder.
pub mod server;
