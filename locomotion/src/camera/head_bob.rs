use crate::math::{Vec3, decay_factor};
use crate::settings::HeadBobSettings;

/// Phase accumulators and current offset of the head bob.
///
/// Both phases only ever increase; the waveform is `sin(π·phase)`, one full bob per 2 units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BobCycleState {
    pub cycle_x: f32,
    pub cycle_y: f32,
    pub offset: Vec3,
}

/// Cyclic camera offset driven by stride progress.
#[derive(Clone, Debug)]
pub struct HeadBob {
    settings: HeadBobSettings,
    interval: f32,
    state: BobCycleState,
}

impl HeadBob {
    /// `interval` is the stride length that makes up one half bob.
    pub fn new(settings: HeadBobSettings, interval: f32) -> Self {
        Self {
            settings,
            interval,
            state: BobCycleState::default(),
        }
    }

    pub fn state(&self) -> &BobCycleState {
        &self.state
    }

    /// Sample the waveform at the current phase, then advance by `speed * dt` stride units.
    pub fn advance(&mut self, speed: f32, dt: f32) -> Vec3 {
        let x = bob_wave(self.state.cycle_x) * self.settings.horizontal_range;
        let y = bob_wave(self.state.cycle_y) * self.settings.vertical_range;

        let step = (speed.max(0.0) * dt.max(0.0)) / self.interval;
        self.state.cycle_x += step;
        self.state.cycle_y += step * self.settings.vertical_to_horizontal_ratio;

        self.state.offset = Vec3::new(x, y, 0.0);
        self.state.offset
    }

    /// Ease the offset back toward neutral; the phase is kept so motion resumes smoothly.
    pub fn settle(&mut self, dt: f32) -> Vec3 {
        let k = decay_factor(self.settings.decay_rate, dt);
        self.state.offset -= self.state.offset * k;
        self.state.offset
    }
}

/// `0 → 1 → 0 → -1 → 0` over a phase of 2.
#[inline]
fn bob_wave(phase: f32) -> f32 {
    (std::f32::consts::PI * phase.rem_euclid(2.0)).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_hits_its_keys() {
        assert!(bob_wave(0.0).abs() < 1.0e-6);
        assert!((bob_wave(0.5) - 1.0).abs() < 1.0e-6);
        assert!(bob_wave(1.0).abs() < 1.0e-5);
        assert!((bob_wave(1.5) + 1.0).abs() < 1.0e-5);
        assert!((bob_wave(2.5) - 1.0).abs() < 1.0e-5);
    }

    #[test]
    fn vertical_phase_runs_faster() {
        let mut bob = HeadBob::new(HeadBobSettings::default(), 5.0);
        bob.advance(10.0, 0.1);
        let state = bob.state();
        assert!((state.cycle_x - 0.2).abs() < 1.0e-6);
        assert!((state.cycle_y - 0.4).abs() < 1.0e-6);
    }

    #[test]
    fn offsets_stay_within_range() {
        let mut bob = HeadBob::new(HeadBobSettings::default(), 5.0);
        for _ in 0..500 {
            let o = bob.advance(13.0, 0.02);
            assert!(o.x.abs() <= 0.1 + 1.0e-6);
            assert!(o.y.abs() <= 0.1 + 1.0e-6);
        }
    }

    #[test]
    fn settling_returns_to_neutral_without_losing_phase() {
        let mut bob = HeadBob::new(HeadBobSettings::default(), 5.0);
        for _ in 0..7 {
            bob.advance(8.0, 0.02);
        }
        let phase = bob.state().cycle_x;
        for _ in 0..200 {
            bob.settle(0.02);
        }
        assert!(bob.state().offset.norm() < 1.0e-4);
        assert_eq!(bob.state().cycle_x, phase);
    }
}
