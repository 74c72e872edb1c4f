/// Fixed rate timer driven by frame deltas
#[derive(Debug, Clone, Copy)]
pub struct FixedHz {
    pub interval: f32,
    pub accumulator: f32,
}

impl FixedHz {
    /// Timer that fires every `millis` milliseconds
    pub fn every_millis(millis: u32) -> Self {
        Self {
            interval: millis as f32 / 1000.0,
            accumulator: 0.0,
        }
    }

    /// Update with delta, returns how many intervals elapsed
    pub fn ticks(&mut self, delta: f32) -> u32 {
        self.accumulator += delta;
        let fired = (self.accumulator / self.interval).floor();
        self.accumulator -= fired * self.interval;
        fired as u32
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_counts_whole_intervals() {
        let mut timer = FixedHz::every_millis(20);
        assert_eq!(timer.ticks(0.065), 3);
        assert_eq!(timer.ticks(0.016), 1);
        assert_eq!(timer.ticks(0.0), 0);
    }

    #[test]
    fn test_reset() {
        let mut timer = FixedHz::every_millis(1000);
        assert_eq!(timer.ticks(0.9), 0);
        timer.reset();
        assert_eq!(timer.ticks(0.5), 0);
    }
}
