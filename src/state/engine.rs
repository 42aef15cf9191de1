//! The concurrent state engine.
//!
//! Owns the single current [`StateSnapshot`] behind one `tokio` mutex.
//! Caller breaks and the two decay loops all replace the snapshot while
//! holding that mutex, so every operation observes either the state before
//! or after another operation, never a mix.
//!
//! ```text
//!   apply_break ──┐
//!   get_snapshot ─┼──► Mutex<StateSnapshot> ◄──┬── stress loop (every 60s: +1 stress)
//!   reset ────────┘                            └── alert loop  (every cooldown: -1 alert)
//! ```
//!
//! When the boss alert is maxed, `apply_break` sleeps for the threshold
//! delay *with the mutex held*. Every other caller and both loops queue up
//! behind it for the full duration. `tokio::sync::Mutex` is FIFO, so no
//! waiter starves.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::escalation::{EscalationDecider, RandomEscalation};
use super::snapshot::{
    decrease_alert, decrease_stress, increase_alert, increase_stress, Levels, StateSnapshot,
};
use crate::config::{EngineConfig, MIN_TICK_INTERVAL};
use crate::error::{ChillError, Result};

/// Shared handle to the current snapshot.
type SharedSnapshot = Arc<Mutex<StateSnapshot>>;

/// Owner of the current state and the background decay loops.
///
/// Construct one per process and share it by `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use chill_mcp::config::{EngineConfig, ServerConfig};
/// use chill_mcp::state::StateEngine;
///
/// let engine = Arc::new(StateEngine::new(EngineConfig::from(ServerConfig::default())));
/// let tasks = engine.start();
///
/// let levels = engine.apply_break(30).await?;
/// engine.shutdown();
/// tasks.join().await;
/// ```
pub struct StateEngine {
    state: SharedSnapshot,
    config: EngineConfig,
    decider: Arc<dyn EscalationDecider>,
    running: Arc<AtomicBool>,
}

impl std::fmt::Debug for StateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateEngine")
            .field("config", &self.config)
            .field("running", &self.running.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl StateEngine {
    /// Create an engine at the initial state with random escalation.
    ///
    /// No background loop runs until [`StateEngine::start`] is called.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_state(config, StateSnapshot::initial())
    }

    /// Create an engine that starts from `snapshot` instead of the initial
    /// state.
    #[must_use]
    pub fn with_state(config: EngineConfig, snapshot: StateSnapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(snapshot)),
            config,
            decider: Arc::new(RandomEscalation),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Replace the escalation decider.
    #[must_use]
    pub fn with_decider(mut self, decider: impl EscalationDecider + 'static) -> Self {
        self.decider = Arc::new(decider);
        self
    }

    /// The configuration this engine runs with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Spawn the stress decay-reversal and boss alert decay loops.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> DecayTasks {
        info!(
            escalation_probability = self.config.escalation_probability,
            stress_interval_secs = self.config.stress_interval.as_secs_f64(),
            alert_cooldown_secs = self.config.alert_cooldown.as_secs_f64(),
            "Starting state engine decay loops"
        );

        let stress = tokio::spawn(run_decay_loop(
            "stress_increase",
            self.config.stress_interval,
            Arc::clone(&self.state),
            Arc::clone(&self.running),
            increase_stress,
        ));
        let alert = tokio::spawn(run_decay_loop(
            "boss_alert_decrease",
            self.config.alert_cooldown,
            Arc::clone(&self.state),
            Arc::clone(&self.running),
            decrease_alert,
        ));

        DecayTasks { stress, alert }
    }

    /// Take a break: lower stress by `stress_decrease`, maybe escalate the
    /// boss alert, and return the resulting levels.
    ///
    /// The whole operation is one critical section. If the boss alert is
    /// maxed when the guard is acquired, the caller is stalled for the
    /// configured delay before anything changes, and so is everyone queued
    /// behind it.
    ///
    /// # Errors
    ///
    /// Returns [`ChillError::InvalidArgument`] if `stress_decrease` is negative.
    pub async fn apply_break(&self, stress_decrease: i64) -> Result<Levels> {
        if stress_decrease < 0 {
            warn!(stress_decrease, "Rejected break with negative stress decrease");
            return Err(ChillError::invalid_argument(
                "stress_decrease",
                format!("must be non-negative, got {stress_decrease}"),
            ));
        }
        let amount = u32::try_from(stress_decrease).unwrap_or(u32::MAX);

        let mut state = self.state.lock().await;

        if state.is_boss_alert_maxed() {
            warn!(
                delay_secs = self.config.alert_delay.as_secs_f64(),
                "Boss alert at maximum, stalling break"
            );
            tokio::time::sleep(self.config.alert_delay).await;
        }

        let escalate = self
            .decider
            .should_escalate(self.config.escalation_probability);

        let mut next = decrease_stress(&state, amount);
        if escalate {
            next = increase_alert(&next);
        }
        *state = next;

        debug!(amount, escalate, levels = %next.levels(), "Break applied");
        Ok(next.levels())
    }

    /// Current levels. Never subject to the threshold delay, though it does
    /// wait behind a break that is serving one.
    pub async fn get_snapshot(&self) -> Levels {
        self.state.lock().await.levels()
    }

    /// Full copy of the current snapshot, timestamp included.
    pub async fn snapshot(&self) -> StateSnapshot {
        *self.state.lock().await
    }

    /// Reinstall the initial state. Intended for test isolation.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        *state = StateSnapshot::initial();
        debug!("State engine reset");
    }

    /// Ask both decay loops to stop.
    ///
    /// Each loop exits the next time its sleep completes, without applying
    /// that tick. A break serving the threshold delay is not interrupted.
    pub fn shutdown(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            info!("State engine shutting down");
        }
    }

    /// Whether [`StateEngine::shutdown`] has not yet been called.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Join handles for the two decay loops.
#[derive(Debug)]
pub struct DecayTasks {
    stress: JoinHandle<()>,
    alert: JoinHandle<()>,
}

impl DecayTasks {
    /// Wait for both loops to exit. Only returns after a shutdown.
    pub async fn join(self) {
        let handles = [
            ("stress_increase", self.stress),
            ("boss_alert_decrease", self.alert),
        ];
        for (name, handle) in handles {
            if let Err(e) = handle.await {
                error!(loop_name = name, "Decay loop ended abnormally: {}", e);
            }
        }
    }
}

/// One periodic decay loop: sleep outside the guard, then apply `step`
/// under it. A panicking step is logged and the tick skipped.
async fn run_decay_loop(
    name: &'static str,
    interval: Duration,
    state: SharedSnapshot,
    running: Arc<AtomicBool>,
    step: fn(&StateSnapshot) -> StateSnapshot,
) {
    let interval = interval.max(MIN_TICK_INTERVAL);
    debug!(loop_name = name, interval_secs = interval.as_secs_f64(), "Decay loop started");

    while running.load(Ordering::Acquire) {
        tokio::time::sleep(interval).await;
        if !running.load(Ordering::Acquire) {
            break;
        }

        let mut guard = state.lock().await;
        let current = *guard;
        match panic::catch_unwind(AssertUnwindSafe(|| step(&current))) {
            Ok(next) => {
                *guard = next;
                debug!(loop_name = name, levels = %next.levels(), "Decay tick");
            }
            Err(_) => {
                error!(loop_name = name, "Decay tick panicked, keeping previous state");
            }
        }
    }

    debug!(loop_name = name, "Decay loop stopped");
}
