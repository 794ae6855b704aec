//! Clock domain — the single source of wall-clock time.
//!
//! Every idle clock (crops, weeds, bank interest) reconciles from stored
//! timestamps against `WallClock::now()`. Systems read the clock once per
//! run and hand the same instant to every core call they make, so an
//! "accrue then deposit" chain sees a consistent `now`.
//!
//! The 1 Hz external tick is gated on the same clock rather than on frame
//! time, so a test can move the clock and get exactly one tick.

use bevy::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::BalanceConfig;
use crate::shared::*;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Timestamp;
}

/// Reads the operating system's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Timestamp)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Resource)]
pub struct WallClock {
    source: Box<dyn Clock>,
}

impl WallClock {
    pub fn new(source: impl Clock) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.source.now()
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

/// Bookkeeping for the external tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct IdleTick {
    pub last_tick_at: Option<Timestamp>,
    pub ticks: u64,
    /// Set in `PreUpdate` for the frame that carries a tick.
    pub due: bool,
}

impl IdleTick {
    /// True when at least `interval` has passed since the last tick
    /// (always true for the first one).
    pub fn is_due(&self, now: Timestamp, interval: u64) -> bool {
        match self.last_tick_at {
            Some(last) => now.saturating_sub(last) >= interval,
            None => true,
        }
    }
}

/// Run condition for systems that run once per external tick.
pub fn idle_tick_due(tick: Res<IdleTick>) -> bool {
    tick.due
}

/// Decides once per frame whether this frame carries a tick.
pub fn begin_idle_tick(
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
    mut tick: ResMut<IdleTick>,
) {
    let now = clock.now();
    tick.due = tick.is_due(now, config.tick_interval_ms);
    if tick.due {
        tick.last_tick_at = Some(now);
        tick.ticks += 1;
    }
}

fn clear_idle_tick(mut tick: ResMut<IdleTick>) {
    tick.due = false;
}

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        // Tests insert a ManualClock before adding the plugin; keep it.
        if !app.world().contains_resource::<WallClock>() {
            app.insert_resource(WallClock::default());
        }
        app.init_resource::<BalanceConfig>()
            .init_resource::<IdleTick>()
            .add_systems(
                PreUpdate,
                begin_idle_tick.run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnExit(GameState::Playing), clear_idle_tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();
        handle.advance(500);
        assert_eq!(clock.now(), 1_500);
        handle.set(42);
        assert_eq!(clock.now(), 42);
    }

    #[test]
    fn wall_clock_reads_injected_source() {
        let manual = ManualClock::new(7);
        let wall = WallClock::new(manual.clone());
        manual.advance(3);
        assert_eq!(wall.now(), 10);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800_000);
    }

    #[test]
    fn first_tick_is_always_due() {
        let tick = IdleTick::default();
        assert!(tick.is_due(0, 1_000));
    }

    #[test]
    fn tick_waits_for_interval() {
        let tick = IdleTick {
            last_tick_at: Some(10_000),
            ticks: 1,
            due: false,
        };
        assert!(!tick.is_due(10_999, 1_000));
        assert!(tick.is_due(11_000, 1_000));
    }
}
