//! Datahub catalog client + MCP tool surface.
//!
//! This crate is the network-facing half of the Datahub MCP server:
//! - [`client`] speaks the Datahub REST API (basic or bearer auth)
//! - [`tools`] maps named MCP tool calls onto catalog operations
//!
//! It intentionally contains **no** transport logic and **no** process
//! configuration; the server binary owns both.

pub mod client;
pub mod config;
pub mod redact;
pub mod tools;
