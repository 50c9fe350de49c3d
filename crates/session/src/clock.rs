use crate::SessionConfig;

/// Wall-clock to tick bookkeeping.
///
/// Time is kept in whole milliseconds so that accounting is exact: after any
/// sequence of frames, `ticks_accounted * tick_ms + leftover_ms` equals the
/// total milliseconds accounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationClock {
    tick_ms: u64,
    multiplier: u32,
    leftover_ms: u64,
    paused: bool,
    fast_forward: bool,
    ticks_accounted: u64,
    steps_executed: u64,
}

impl SimulationClock {
    /// Upper bound on the time a single frame may account for.
    pub const MAX_FRAME_MS: u64 = u32::MAX as u64;

    /// Zero durations and multipliers are raised to 1.
    pub fn new(tick_ms: u32, multiplier: u32) -> Self {
        Self {
            tick_ms: u64::from(tick_ms.max(1)),
            multiplier: multiplier.max(1),
            leftover_ms: 0,
            paused: false,
            fast_forward: false,
            ticks_accounted: 0,
            steps_executed: 0,
        }
    }

    /// Clock using the tick duration and multiplier from `config`.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.tick_duration_ms, config.fast_forward_multiplier)
    }

    /// Back to the state of a fresh session.
    pub fn reset(&mut self) {
        *self = Self {
            tick_ms: self.tick_ms,
            multiplier: self.multiplier,
            ..Self::new(1, 1)
        };
    }

    /// Frame seconds to whole milliseconds, truncating.
    ///
    /// Zero, negative and non-finite deltas account no time.
    pub fn to_milliseconds(frame_delta: f32) -> u64 {
        if !frame_delta.is_finite() || frame_delta <= 0.0 {
            return 0;
        }
        let ms = (f64::from(frame_delta) * 1000.0) as u64;
        ms.min(Self::MAX_FRAME_MS)
    }

    /// Account a frame and return how many whole ticks it completed.
    pub fn accumulate(&mut self, frame_delta: f32) -> u64 {
        let available = Self::to_milliseconds(frame_delta) + self.leftover_ms;
        let ticks = available / self.tick_ms;
        self.leftover_ms = available - ticks * self.tick_ms;
        self.ticks_accounted += ticks;
        ticks
    }

    /// World steps one tick runs with the current flags.
    pub fn steps_per_tick(&self) -> u32 {
        if self.paused {
            0
        } else if self.fast_forward {
            self.multiplier
        } else {
            1
        }
    }

    pub(crate) fn record_step(&mut self) {
        self.steps_executed += 1;
    }

    /// Milliseconds of wall time per tick.
    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    /// Steps per tick while fast-forwarding.
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Accounted time not yet forming a whole tick.
    pub fn leftover_ms(&self) -> u64 {
        self.leftover_ms
    }

    /// Whole ticks accounted, paused or not.
    pub fn ticks_accounted(&self) -> u64 {
        self.ticks_accounted
    }

    /// World steps actually run.
    pub fn steps_executed(&self) -> u64 {
        self.steps_executed
    }

    /// Returns true if ticks currently run no steps.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Returns true if ticks run `multiplier` steps.
    pub fn is_fast_forward(&self) -> bool {
        self.fast_forward
    }

    pub fn set_fast_forward(&mut self, fast_forward: bool) {
        self.fast_forward = fast_forward;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn frame_of_45ms_is_two_ticks_and_5_left() {
        let mut c = SimulationClock::new(20, 4);
        assert_eq!(c.accumulate(0.045), 2);
        assert_eq!(c.leftover_ms(), 5);
        assert_eq!(c.accumulate(0.015), 1);
        assert_eq!(c.leftover_ms(), 0);
        assert_eq!(c.ticks_accounted(), 3);
    }

    #[test]
    fn degenerate_deltas_account_nothing() {
        for delta in [0.0, -0.5, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(SimulationClock::to_milliseconds(delta), 0, "{delta}");
        }
        let mut c = SimulationClock::new(20, 4);
        c.accumulate(0.013);
        assert_eq!(c.accumulate(-1.0), 0);
        assert_eq!(c.leftover_ms(), 13);
    }

    #[test]
    fn huge_frame_is_capped() {
        assert_eq!(
            SimulationClock::to_milliseconds(1.0e30),
            SimulationClock::MAX_FRAME_MS
        );
    }

    #[test]
    fn steps_follow_flags() {
        let mut c = SimulationClock::new(20, 3);
        assert_eq!(c.steps_per_tick(), 1);
        c.set_fast_forward(true);
        assert_eq!(c.steps_per_tick(), 3);
        c.set_paused(true);
        assert_eq!(c.steps_per_tick(), 0);
    }

    #[test]
    fn zero_settings_are_raised() {
        let c = SimulationClock::new(0, 0);
        assert_eq!(c.tick_ms(), 1);
        assert_eq!(c.multiplier(), 1);
    }

    #[test]
    fn reset_keeps_timing_and_clears_state() {
        let mut c = SimulationClock::new(25, 6);
        c.set_paused(true);
        c.set_fast_forward(true);
        c.accumulate(0.130);
        c.record_step();
        c.reset();
        assert_eq!(c, SimulationClock::new(25, 6));
    }

    proptest! {
        #[test]
        fn accounting_is_exact(
            tick_ms in 1u32..100,
            deltas in proptest::collection::vec(-0.1f32..0.5, 0..64),
        ) {
            let mut c = SimulationClock::new(tick_ms, 4);
            let mut total_ms = 0u64;
            for d in deltas {
                total_ms += SimulationClock::to_milliseconds(d);
                c.accumulate(d);
                prop_assert!(c.leftover_ms() < c.tick_ms());
                prop_assert_eq!(
                    c.ticks_accounted() * c.tick_ms() + c.leftover_ms(),
                    total_ms
                );
            }
        }
    }
}
