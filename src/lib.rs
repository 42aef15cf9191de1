//! ChillMCP - break tools for overworked AI agents
//!
//! An MCP server whose tools are "breaks". Every break lowers a stress
//! counter and may raise a boss alert counter, while two background loops
//! keep pushing stress back up and letting the boss calm down.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`state`] - Immutable snapshots, pure transitions, and the concurrent engine
//! - [`tools`] - The break tool catalog
//! - [`response`] - Client-facing response formatting
//! - [`server`] - JSON-RPC/MCP server over stdio
//! - [`config`] - Command-line derived configuration and constants
//! - [`error`] - Custom error types and handling
//! - [`testing`] - Test doubles for the engine's seams
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chill_mcp::{EngineConfig, McpServer, ServerConfig, StateEngine};
//!
//! let engine = Arc::new(StateEngine::new(EngineConfig::from(ServerConfig::new(50, 300))));
//! let tasks = engine.start();
//!
//! let server = McpServer::new(Arc::clone(&engine));
//! server.serve(tokio::io::BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
//!
//! engine.shutdown();
//! tasks.join().await;
//! ```

pub mod config;
pub mod error;
pub mod response;
pub mod server;
pub mod state;
pub mod testing;
pub mod tools;

// Re-export commonly used types
pub use error::{ChillError, Result};

pub use config::{EngineConfig, ServerConfig};
pub use response::{format_response_text, parse_levels, BreakReport, ToolCallResult};
pub use server::McpServer;
pub use state::{DecayTasks, EscalationDecider, Levels, StateEngine, StateSnapshot};
pub use tools::BreakTool;
