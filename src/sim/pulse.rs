//! Ping-pong glow animation shared by every neon entity

/// Glow intensity bouncing between 0 and 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub intensity: f32,
    rising: bool,
    step: f32,
}

impl Pulse {
    pub fn new(step: f32) -> Self {
        Self {
            intensity: 0.0,
            rising: true,
            step,
        }
    }

    /// Advance one frame, clamping and turning around at either end
    pub fn advance(&mut self) {
        if self.rising {
            self.intensity += self.step;
        } else {
            self.intensity -= self.step;
        }
        if self.intensity >= 1.0 {
            self.intensity = 1.0;
            self.rising = false;
        } else if self.intensity <= 0.0 {
            self.intensity = 0.0;
            self.rising = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_stays_in_range() {
        let mut pulse = Pulse::new(0.03);
        for _ in 0..500 {
            pulse.advance();
            assert!((0.0..=1.0).contains(&pulse.intensity));
        }
    }

    #[test]
    fn test_pulse_reverses_at_top() {
        let mut pulse = Pulse::new(0.5);
        pulse.advance(); // 0.5
        pulse.advance(); // 1.0, turn
        assert!(!pulse.rising);
        pulse.advance();
        assert!((pulse.intensity - 0.5).abs() < 0.001);
    }
}
