//! Testing infrastructure for ChillMCP.
//!
//! Test doubles for the state engine's seams, usable from unit tests,
//! integration tests, and benchmarks alike.
//!
//! # Example
//!
//! ```rust,ignore
//! use chill_mcp::state::StateEngine;
//! use chill_mcp::testing::ScriptedEscalation;
//!
//! let engine = StateEngine::new(EngineConfig::default())
//!     .with_decider(ScriptedEscalation::new([false, true]));
//! ```

pub mod mocks;

pub use mocks::*;
