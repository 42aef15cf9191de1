//! Mock implementations of the engine's seams.
//!
//! These mocks make escalation deterministic so scenario tests can assert
//! exact counter values.

use crate::state::EscalationDecider;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Escalation decider that replays a scripted sequence of decisions.
///
/// Once the script is exhausted every further call returns the fallback.
/// Each probability the engine passes in is recorded.
///
/// # Example
///
/// ```
/// use chill_mcp::state::EscalationDecider;
/// use chill_mcp::testing::ScriptedEscalation;
///
/// let decider = ScriptedEscalation::new([false, true]);
/// assert!(!decider.should_escalate(50));
/// assert!(decider.should_escalate(50));
/// assert!(!decider.should_escalate(50));
/// assert_eq!(decider.calls(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedEscalation {
    script: Mutex<VecDeque<bool>>,
    fallback: bool,
    seen: Mutex<Vec<u8>>,
}

impl ScriptedEscalation {
    /// Replay `decisions` in order, then answer `false`.
    #[must_use]
    pub fn new(decisions: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: Mutex::new(decisions.into_iter().collect()),
            fallback: false,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always answer `decision`.
    #[must_use]
    pub fn always(decision: bool) -> Self {
        Self::new([]).with_fallback(decision)
    }

    /// Set the answer used once the script runs out.
    #[must_use]
    pub fn with_fallback(mut self, decision: bool) -> Self {
        self.fallback = decision;
        self
    }

    /// Number of decisions requested so far.
    pub fn calls(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }

    /// Probabilities passed in, in call order.
    pub fn probabilities_seen(&self) -> Vec<u8> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

impl EscalationDecider for ScriptedEscalation {
    fn should_escalate(&self, probability_percent: u8) -> bool {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(probability_percent);
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or(self.fallback)
    }
}
