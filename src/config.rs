//! Configuration for the ChillMCP server and its state engine.
//!
//! Raw command-line values are never rejected: out-of-range input is
//! clamped to the nearest valid boundary when [`ServerConfig`] is built.
//! Both configs are immutable once constructed.

use std::time::Duration;

/// Lowest stress level.
pub const STRESS_MIN: u8 = 0;
/// Highest stress level.
pub const STRESS_MAX: u8 = 100;
/// Stress level a fresh engine starts from.
pub const INITIAL_STRESS: u8 = 50;
/// Lowest boss alert level.
pub const BOSS_ALERT_MIN: u8 = 0;
/// Highest boss alert level; reaching it triggers the threshold delay.
pub const BOSS_ALERT_MAX: u8 = 5;

/// Interval between automatic stress increases.
pub const STRESS_INCREASE_INTERVAL: Duration = Duration::from_secs(60);
/// Shortest decay loop interval the engine accepts.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);
/// Stall imposed on a break taken while the boss alert is maxed out.
pub const BOSS_ALERT_DELAY: Duration = Duration::from_secs(20);

/// Default escalation probability in percent.
pub const DEFAULT_BOSS_ALERTNESS: i64 = 50;
/// Default boss alert cooldown in seconds.
pub const DEFAULT_BOSS_ALERTNESS_COOLDOWN: i64 = 300;

/// Validated server configuration.
///
/// # Example
///
/// ```
/// use chill_mcp::config::ServerConfig;
///
/// let config = ServerConfig::new(150, 0);
/// assert_eq!(config.boss_alertness(), 100);
/// assert_eq!(config.boss_alertness_cooldown().as_secs(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    boss_alertness: u8,
    boss_alertness_cooldown_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BOSS_ALERTNESS, DEFAULT_BOSS_ALERTNESS_COOLDOWN)
    }
}

impl ServerConfig {
    /// Build a config from raw values, clamping alertness to `[0, 100]`
    /// and flooring the cooldown to at least one second.
    #[must_use]
    pub fn new(boss_alertness: i64, boss_alertness_cooldown: i64) -> Self {
        Self {
            boss_alertness: clamp_alertness(boss_alertness),
            boss_alertness_cooldown_secs: floor_cooldown(boss_alertness_cooldown),
        }
    }

    /// Probability (0-100) that a break raises the boss alert level.
    #[must_use]
    pub fn boss_alertness(&self) -> u8 {
        self.boss_alertness
    }

    /// Period of the boss alert decay loop.
    #[must_use]
    pub fn boss_alertness_cooldown(&self) -> Duration {
        Duration::from_secs(self.boss_alertness_cooldown_secs)
    }
}

fn clamp_alertness(value: i64) -> u8 {
    // Clamped into 0..=100, so the conversion cannot fail.
    u8::try_from(value.clamp(0, 100)).unwrap_or(100)
}

fn floor_cooldown(value: i64) -> u64 {
    u64::try_from(value.max(1)).unwrap_or(1)
}

/// Timing and probability parameters consumed by the state engine.
///
/// Production values come from [`ServerConfig`]; the `with_*` builders
/// exist so tests can shrink the intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Escalation probability in percent, already clamped to `[0, 100]`.
    pub escalation_probability: u8,
    /// Period of the stress decay-reversal loop.
    pub stress_interval: Duration,
    /// Period of the boss alert decay loop.
    pub alert_cooldown: Duration,
    /// Stall applied when a break starts at maximum boss alert.
    pub alert_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(ServerConfig::default())
    }
}

impl From<ServerConfig> for EngineConfig {
    fn from(config: ServerConfig) -> Self {
        Self {
            escalation_probability: config.boss_alertness(),
            stress_interval: STRESS_INCREASE_INTERVAL,
            alert_cooldown: config.boss_alertness_cooldown(),
            alert_delay: BOSS_ALERT_DELAY,
        }
    }
}

impl EngineConfig {
    /// Set the escalation probability, clamped to `[0, 100]`.
    #[must_use]
    pub fn with_escalation_probability(mut self, percent: u8) -> Self {
        self.escalation_probability = percent.min(100);
        self
    }

    /// Set the stress decay-reversal interval, floored at [`MIN_TICK_INTERVAL`].
    #[must_use]
    pub fn with_stress_interval(mut self, interval: Duration) -> Self {
        self.stress_interval = interval.max(MIN_TICK_INTERVAL);
        self
    }

    /// Set the boss alert cooldown interval, floored at [`MIN_TICK_INTERVAL`].
    #[must_use]
    pub fn with_alert_cooldown(mut self, cooldown: Duration) -> Self {
        self.alert_cooldown = cooldown.max(MIN_TICK_INTERVAL);
        self
    }

    /// Set the threshold delay.
    #[must_use]
    pub fn with_alert_delay(mut self, delay: Duration) -> Self {
        self.alert_delay = delay;
        self
    }
}
