//! Immutable state snapshots and the pure transitions between them.
//!
//! A [`StateSnapshot`] is never mutated. Each transition function reads a
//! snapshot and builds a new one, saturating at the counter bounds, so no
//! sequence of transitions can leave `0..=100` stress or `0..=5` alert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{BOSS_ALERT_MAX, BOSS_ALERT_MIN, INITIAL_STRESS, STRESS_MAX, STRESS_MIN};

/// The two counters as handed back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Levels {
    /// Stress level (0-100)
    pub stress: u8,
    /// Boss alert level (0-5)
    pub boss_alert: u8,
}

impl Levels {
    /// Create a new pair of levels.
    #[must_use]
    pub fn new(stress: u8, boss_alert: u8) -> Self {
        Self { stress, boss_alert }
    }
}

impl From<Levels> for (u8, u8) {
    fn from(levels: Levels) -> Self {
        (levels.stress, levels.boss_alert)
    }
}

impl std::fmt::Display for Levels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stress={} boss_alert={}", self.stress, self.boss_alert)
    }
}

/// State of the system at one instant.
///
/// Fields are private so the bounds hold for every value in existence;
/// [`StateSnapshot::new`] clamps its inputs.
///
/// # Example
///
/// ```
/// use chill_mcp::state::StateSnapshot;
///
/// let state = StateSnapshot::initial();
/// assert_eq!(state.stress_level(), 50);
/// assert_eq!(state.boss_alert_level(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    stress_level: u8,
    boss_alert_level: u8,
    last_activity_time: DateTime<Utc>,
}

impl StateSnapshot {
    /// Create a snapshot, clamping both counters into their bounds.
    #[must_use]
    pub fn new(stress_level: u8, boss_alert_level: u8, last_activity_time: DateTime<Utc>) -> Self {
        Self {
            stress_level: stress_level.clamp(STRESS_MIN, STRESS_MAX),
            boss_alert_level: boss_alert_level.clamp(BOSS_ALERT_MIN, BOSS_ALERT_MAX),
            last_activity_time,
        }
    }

    /// The state every engine starts from: stress 50, alert 0, now.
    #[must_use]
    pub fn initial() -> Self {
        Self::new(INITIAL_STRESS, BOSS_ALERT_MIN, Utc::now())
    }

    /// Current stress level.
    #[must_use]
    pub fn stress_level(&self) -> u8 {
        self.stress_level
    }

    /// Current boss alert level.
    #[must_use]
    pub fn boss_alert_level(&self) -> u8 {
        self.boss_alert_level
    }

    /// Time of the last caller-triggered stress change.
    #[must_use]
    pub fn last_activity_time(&self) -> DateTime<Utc> {
        self.last_activity_time
    }

    /// Whether the boss alert is pinned at its maximum.
    #[must_use]
    pub fn is_boss_alert_maxed(&self) -> bool {
        self.boss_alert_level == BOSS_ALERT_MAX
    }

    /// The two counters without the timestamp.
    #[must_use]
    pub fn levels(&self) -> Levels {
        Levels::new(self.stress_level, self.boss_alert_level)
    }
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}

/// Lower stress by `amount`, flooring at zero, and stamp the activity time.
#[must_use]
pub fn decrease_stress(state: &StateSnapshot, amount: u32) -> StateSnapshot {
    let remaining = u32::from(state.stress_level).saturating_sub(amount);
    StateSnapshot {
        // remaining <= stress_level, which already fits in u8
        stress_level: u8::try_from(remaining).unwrap_or(STRESS_MIN),
        boss_alert_level: state.boss_alert_level,
        last_activity_time: Utc::now(),
    }
}

/// Raise stress by one, capped at the maximum. Leaves the activity time alone.
#[must_use]
pub fn increase_stress(state: &StateSnapshot) -> StateSnapshot {
    StateSnapshot {
        stress_level: state.stress_level.saturating_add(1).min(STRESS_MAX),
        ..*state
    }
}

/// Raise the boss alert by one, capped at the maximum.
#[must_use]
pub fn increase_alert(state: &StateSnapshot) -> StateSnapshot {
    StateSnapshot {
        boss_alert_level: state.boss_alert_level.saturating_add(1).min(BOSS_ALERT_MAX),
        ..*state
    }
}

/// Lower the boss alert by one, floored at the minimum.
#[must_use]
pub fn decrease_alert(state: &StateSnapshot) -> StateSnapshot {
    StateSnapshot {
        boss_alert_level: state.boss_alert_level.saturating_sub(1).max(BOSS_ALERT_MIN),
        ..*state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_epoch(stress: u8, alert: u8) -> StateSnapshot {
        StateSnapshot::new(stress, alert, Utc.timestamp_opt(0, 0).unwrap())
    }

    #[test]
    fn test_initial_snapshot() {
        let state = StateSnapshot::initial();
        assert_eq!(state.levels(), Levels::new(50, 0));
        assert!(!state.is_boss_alert_maxed());
    }

    #[test]
    fn test_new_clamps_out_of_range_input() {
        let state = at_epoch(250, 9);
        assert_eq!(state.stress_level(), 100);
        assert_eq!(state.boss_alert_level(), 5);
        assert!(state.is_boss_alert_maxed());
    }

    #[test]
    fn test_decrease_stress_saturates_at_zero() {
        let next = decrease_stress(&at_epoch(5, 2), 50);
        assert_eq!(next.stress_level(), 0);
        assert_eq!(next.boss_alert_level(), 2);
    }

    #[test]
    fn test_decrease_stress_huge_amount() {
        let next = decrease_stress(&at_epoch(100, 0), u32::MAX);
        assert_eq!(next.stress_level(), 0);
    }

    #[test]
    fn test_decrease_stress_updates_activity_time() {
        let before = at_epoch(60, 1);
        let next = decrease_stress(&before, 10);
        assert_eq!(next.stress_level(), 50);
        assert!(next.last_activity_time() > before.last_activity_time());
    }

    #[test]
    fn test_decrease_stress_zero_amount() {
        let next = decrease_stress(&at_epoch(42, 3), 0);
        assert_eq!(next.levels(), Levels::new(42, 3));
    }

    #[test]
    fn test_decrease_stress_is_deterministic() {
        let state = at_epoch(70, 2);
        let a = decrease_stress(&state, 10);
        let b = decrease_stress(&state, 10);
        assert_eq!(a.levels(), b.levels());
        assert_eq!(state.levels(), Levels::new(70, 2));
    }

    #[test]
    fn test_increase_stress_caps_and_keeps_time() {
        let state = at_epoch(99, 4);
        let once = increase_stress(&state);
        let twice = increase_stress(&once);
        assert_eq!(once.stress_level(), 100);
        assert_eq!(twice.stress_level(), 100);
        assert_eq!(twice.boss_alert_level(), 4);
        assert_eq!(twice.last_activity_time(), state.last_activity_time());
    }

    #[test]
    fn test_increase_alert_caps_at_five() {
        let next = increase_alert(&at_epoch(10, 5));
        assert_eq!(next.boss_alert_level(), 5);

        let next = increase_alert(&at_epoch(10, 2));
        assert_eq!(next.boss_alert_level(), 3);
        assert_eq!(next.stress_level(), 10);
    }

    #[test]
    fn test_decrease_alert_floors_at_zero() {
        let state = at_epoch(30, 1);
        let once = decrease_alert(&state);
        let twice = decrease_alert(&once);
        assert_eq!(once.boss_alert_level(), 0);
        assert_eq!(twice.boss_alert_level(), 0);
        assert_eq!(twice.last_activity_time(), state.last_activity_time());
    }

    #[test]
    fn test_bounds_hold_over_mixed_sequence() {
        let mut state = at_epoch(50, 0);
        for step in 0..500u32 {
            state = match step % 5 {
                0 => decrease_stress(&state, step % 37),
                1 => increase_stress(&state),
                2 => increase_alert(&state),
                3 => increase_alert(&increase_alert(&state)),
                _ => decrease_alert(&state),
            };
            assert!(state.stress_level() <= STRESS_MAX);
            assert!(state.boss_alert_level() <= BOSS_ALERT_MAX);
        }
    }

    #[test]
    fn test_levels_into_tuple() {
        let (stress, alert): (u8, u8) = Levels::new(12, 3).into();
        assert_eq!((stress, alert), (12, 3));
        assert_eq!(Levels::new(12, 3).to_string(), "stress=12 boss_alert=3");
    }

    #[test]
    fn test_snapshot_serialize() {
        let json = serde_json::to_string(&at_epoch(20, 1)).unwrap();
        assert!(json.contains("\"stress_level\":20"));
        assert!(json.contains("\"boss_alert_level\":1"));
    }
}
