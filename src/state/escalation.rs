//! Probabilistic boss alert escalation.

use rand::Rng;

/// Roll whether a break raises the boss alert level.
///
/// Draws an integer uniformly from `1..=100` and escalates iff it is at
/// most `probability_percent`. `0` never escalates, `100` (or more) always
/// does.
#[must_use]
pub fn should_escalate_alert(probability_percent: u8) -> bool {
    should_escalate_alert_with(&mut rand::thread_rng(), probability_percent)
}

/// [`should_escalate_alert`] with an explicit random source.
pub fn should_escalate_alert_with<R: Rng>(rng: &mut R, probability_percent: u8) -> bool {
    let roll: u8 = rng.gen_range(1..=100);
    roll <= probability_percent
}

/// Decides whether a break escalates the boss alert.
///
/// The engine consults this once per break, inside its critical section.
pub trait EscalationDecider: Send + Sync {
    /// Return true if this break should raise the boss alert level.
    fn should_escalate(&self, probability_percent: u8) -> bool;
}

/// Uniform random escalation backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEscalation;

impl EscalationDecider for RandomEscalation {
    fn should_escalate(&self, probability_percent: u8) -> bool {
        should_escalate_alert(probability_percent)
    }
}
