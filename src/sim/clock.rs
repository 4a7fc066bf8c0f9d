use tracing::info;

/// Discrete game-speed multiplier cycled by the player
#[derive(Debug, Clone)]
pub struct SpeedControl {
    steps: Vec<f32>,
    index: usize,
}

impl SpeedControl {
    pub fn new(steps: Vec<f32>, index: usize) -> Self {
        let steps = if steps.is_empty() { vec![1.0] } else { steps };
        let index = index.min(steps.len() - 1);
        Self { steps, index }
    }

    /// Advance to the next step, wrapping to the first
    pub fn cycle(&mut self) -> f32 {
        self.index = (self.index + 1) % self.steps.len();
        info!("Game speed {}", self.label());
        self.current()
    }

    pub fn current(&self) -> f32 {
        self.steps[self.index]
    }

    pub fn label(&self) -> String {
        format!("{}x", self.current())
    }
}

/// Simulated time. Each tick advances by real delta times the speed.
#[derive(Debug, Clone)]
pub struct SimClock {
    now: f64,
    pub speed: SpeedControl,
}

impl SimClock {
    pub fn new(speed: SpeedControl) -> Self {
        Self { now: 0.0, speed }
    }

    /// Advance by `real_dt` seconds; returns the scaled delta
    pub fn advance(&mut self, real_dt: f64) -> f64 {
        let dt = real_dt.max(0.0) * f64::from(self.speed.current());
        self.now += dt;
        dt
    }

    pub fn now(&self) -> f64 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_cycle_wraps() {
        let mut speed = SpeedControl::new(vec![0.5, 1.0, 2.0, 3.0, 5.0], 1);
        assert_eq!(speed.current(), 1.0);
        assert_eq!(speed.cycle(), 2.0);
        assert_eq!(speed.cycle(), 3.0);
        assert_eq!(speed.cycle(), 5.0);
        assert_eq!(speed.cycle(), 0.5);
        assert_eq!(speed.label(), "0.5x");
    }

    #[test]
    fn test_clock_scales_delta() {
        let mut clock = SimClock::new(SpeedControl::new(vec![0.5, 1.0, 2.0], 2));
        assert_eq!(clock.advance(0.05), 0.1);
        assert_eq!(clock.advance(-1.0), 0.0);
        assert!((clock.now() - 0.1).abs() < 1e-12);
    }
}
