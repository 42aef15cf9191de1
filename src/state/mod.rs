//! State management module.
//!
//! - [`snapshot`] - Immutable state values and the pure transitions between them
//! - [`escalation`] - Probabilistic boss alert escalation
//! - [`engine`] - The concurrent engine that owns the current snapshot and
//!   runs the decay loops
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  apply_break   ┌──────────────┐  pure fns  ┌───────────────┐
//! │ Break tools  │──────────────> │ StateEngine  │──────────> │ StateSnapshot │
//! └──────────────┘                └──────────────┘            └───────────────┘
//!                                   ▲        ▲
//!                           stress loop    alert loop
//! ```

pub mod engine;
pub mod escalation;
pub mod snapshot;

// Re-exports for convenience
pub use engine::{DecayTasks, StateEngine};
pub use escalation::{
    should_escalate_alert, should_escalate_alert_with, EscalationDecider, RandomEscalation,
};
pub use snapshot::{
    decrease_alert, decrease_stress, increase_alert, increase_stress, Levels, StateSnapshot,
};
