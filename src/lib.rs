//! MCP server for Keycloak administration.
//!
//! Exposes `create-user`, `delete-user`, `list-realms`, and `list-users`
//! tools over JSON-RPC 2.0 stdio transport, compatible with any MCP-aware AI agent.
//! Every tool call opens a fresh admin session with a password grant.

pub mod admin;
pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod validation;
