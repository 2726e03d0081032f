//! Tracing subscriber initialization
//!
//! Both binaries install one global subscriber at startup. The HTTP server logs to stdout; the
//! MCP server logs to stderr because stdout carries the protocol.

mod init_basic;

pub use init_basic::{init_basic, LogFormat, LogTarget};
