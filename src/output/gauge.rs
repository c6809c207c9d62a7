//! Speedometer gauge geometry and easing

use std::time::{Duration, Instant};

/// Speed at which the gauge is full, in Mbps
pub const MAX_SPEED: f64 = 500.0;

/// Length of the gauge arc in drawing units
pub const ARC_LENGTH: f64 = 377.0;

const ANIMATION: Duration = Duration::from_millis(800);

/// Quadratic ease-out on `t ∈ [0, 1]`
pub fn ease_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Gauge state: the readout eases from its previous value to the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speedometer {
    from: f64,
    target: f64,
    started: Option<Instant>,
    duration: Duration,
}

impl Default for Speedometer {
    fn default() -> Self {
        Self {
            from: 0.0,
            target: 0.0,
            started: None,
            duration: ANIMATION,
        }
    }
}

impl Speedometer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start moving towards `speed`, continuing from wherever the readout is now
    pub fn set_target(&mut self, speed: f64, now: Instant) {
        self.from = self.value_at(now);
        self.target = speed.max(0.0);
        self.started = Some(now);
    }

    /// Jump straight to `speed`
    pub fn snap_to(&mut self, speed: f64) {
        self.from = speed.max(0.0);
        self.target = self.from;
        self.started = None;
    }

    /// Finish any easing in progress so the readout equals the target
    pub fn settle(&mut self) {
        self.snap_to(self.target);
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Interpolated readout at `now`
    pub fn value_at(&self, now: Instant) -> f64 {
        let Some(started) = self.started else {
            return self.target;
        };
        let elapsed = now.saturating_duration_since(started);
        if elapsed >= self.duration {
            return self.target;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.target - self.from) * ease_out_quad(t)
    }

    /// Share of the arc that is filled, in `[0, 1]`
    pub fn fraction(speed: f64) -> f64 {
        speed.clamp(0.0, MAX_SPEED) / MAX_SPEED
    }

    /// Dash offset of the arc stroke: `ARC_LENGTH` when empty, 0 when full
    pub fn arc_offset(speed: f64) -> f64 {
        ARC_LENGTH - Self::fraction(speed) * ARC_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_offset() {
        assert_eq!(Speedometer::arc_offset(0.0), ARC_LENGTH);
        assert_eq!(Speedometer::arc_offset(500.0), 0.0);
        assert_eq!(Speedometer::arc_offset(900.0), 0.0);
        assert!((Speedometer::arc_offset(250.0) - 188.5).abs() < 1e-9);
    }

    #[test]
    fn test_ease_out_quad_endpoints() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert_eq!(ease_out_quad(2.0), 1.0);
        assert!(ease_out_quad(0.5) > 0.5);
    }

    #[test]
    fn test_readout_eases_to_target() {
        let start = Instant::now();
        let mut gauge = Speedometer::new();
        gauge.set_target(100.0, start);

        let early = gauge.value_at(start + Duration::from_millis(100));
        let middle = gauge.value_at(start + Duration::from_millis(400));
        let done = gauge.value_at(start + Duration::from_millis(900));

        assert!(early > 0.0 && early < middle);
        assert!(middle < 100.0);
        assert_eq!(done, 100.0);
    }

    #[test]
    fn test_retarget_starts_from_current_readout() {
        let start = Instant::now();
        let mut gauge = Speedometer::new();
        gauge.set_target(100.0, start);

        let retarget_at = start + Duration::from_millis(400);
        let current = gauge.value_at(retarget_at);
        gauge.set_target(20.0, retarget_at);

        assert!((gauge.value_at(retarget_at) - current).abs() < 1e-9);
        assert_eq!(gauge.value_at(retarget_at + Duration::from_secs(1)), 20.0);
    }

    #[test]
    fn test_settle_finishes_easing() {
        let start = Instant::now();
        let mut gauge = Speedometer::new();
        gauge.set_target(300.0, start);
        gauge.set_target(20.0, start + Duration::from_millis(300));

        gauge.settle();
        assert_eq!(gauge.value_at(start + Duration::from_millis(310)), 20.0);
        assert_eq!(gauge.target(), 20.0);
    }

    #[test]
    fn test_snap_to() {
        let mut gauge = Speedometer::new();
        gauge.set_target(300.0, Instant::now());
        gauge.snap_to(0.0);
        assert_eq!(gauge.value_at(Instant::now()), 0.0);
    }
}
