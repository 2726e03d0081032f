//! Bodyscan MCP Server
//!
//! Model Context Protocol server that exposes photo upload and body composition analysis as
//! tools for AI assistants. Runs the pipeline in-process over stdio.

pub mod server;
pub mod tools;

pub use server::BodyscanService;
