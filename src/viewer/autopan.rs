use super::timer::FixedHz;

/// Auto-pan step interval in milliseconds
pub const STEP_MILLIS: u32 = 20;
/// Default azimuth change per step, in degrees
pub const DEFAULT_SPEED: f32 = 0.30;

/// Turntable auto-rotation, paused while the user drags the view
#[derive(Debug, Clone, Copy)]
pub struct AutoPan {
    enabled: bool,
    interacting: bool,
    speed: f32,
    timer: FixedHz,
}

impl Default for AutoPan {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}

impl AutoPan {
    /// Enabled auto-pan turning `speed` degrees per step
    pub fn new(speed: f32) -> Self {
        Self {
            enabled: true,
            interacting: false,
            speed: speed.clamp(-360.0, 360.0),
            timer: FixedHz::every_millis(STEP_MILLIS),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.timer.reset();
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(-360.0, 360.0);
    }

    /// Running right now: enabled and not suspended by a drag
    pub fn is_active(&self) -> bool {
        self.enabled && !self.interacting
    }

    /// Left button pressed over the view
    pub fn pointer_pressed(&mut self) {
        if self.is_active() {
            self.interacting = true;
        }
    }

    /// Left button released; resumes if still enabled
    pub fn pointer_released(&mut self) {
        if self.interacting {
            self.interacting = false;
            self.timer.reset();
        }
    }

    /// Azimuth change in degrees for `delta` seconds of wall time
    pub fn update(&mut self, delta: f32) -> f32 {
        if !self.is_active() {
            return 0.0;
        }
        self.timer.ticks(delta) as f32 * self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_steps_per_interval() {
        let mut pan = AutoPan::default();
        assert!(pan.is_enabled());
        assert_relative_eq!(pan.update(0.1), 5.0 * DEFAULT_SPEED, epsilon = 1e-4);
    }

    #[test]
    fn test_drag_suspends_and_release_resumes() {
        let mut pan = AutoPan::default();
        pan.pointer_pressed();
        assert_eq!(pan.update(1.0), 0.0);
        pan.pointer_released();
        assert!(pan.is_active());
        assert!(pan.update(0.02) != 0.0);
    }

    #[test]
    fn test_release_does_not_resume_when_disabled() {
        let mut pan = AutoPan::default();
        pan.pointer_pressed();
        pan.set_enabled(false);
        pan.pointer_released();
        assert!(!pan.is_active());
        assert_eq!(pan.update(1.0), 0.0);
    }

    #[test]
    fn test_speed_clamped() {
        let mut pan = AutoPan::new(1000.0);
        assert_eq!(pan.speed(), 360.0);
        pan.set_speed(-2.0);
        assert_eq!(pan.speed(), -2.0);
    }
}
