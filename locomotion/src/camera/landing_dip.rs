use crate::math::lerp;
use crate::settings::LandingDipSettings;

/// Bounded "dip and recover" after a landing.
///
/// The offset ramps linearly from 0 to `amount` over `duration`, then back to 0 over another
/// `duration`. A new landing restarts the sequence from the top.
#[derive(Clone, Debug)]
pub struct LandingDip {
    settings: LandingDipSettings,
    elapsed: Option<f32>,
}

impl LandingDip {
    pub fn new(settings: LandingDipSettings) -> Self {
        Self {
            settings,
            elapsed: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn restart(&mut self) {
        if self.is_active() {
            log::debug!("landing dip restarted mid-sequence");
        }
        self.elapsed = Some(0.0);
    }

    /// Downward offset (meters, non-negative) at the current point of the sequence.
    pub fn offset(&self) -> f32 {
        let Some(t) = self.elapsed else {
            return 0.0;
        };
        let d = self.settings.duration;
        let amount = self.settings.amount;
        if t < d {
            lerp(0.0, amount, t / d)
        } else if t < 2.0 * d {
            lerp(amount, 0.0, (t - d) / d)
        } else {
            0.0
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if let Some(t) = self.elapsed.as_mut() {
            *t += dt.max(0.0);
            if *t >= 2.0 * self.settings.duration {
                self.elapsed = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dip() -> LandingDip {
        LandingDip::new(LandingDipSettings::default())
    }

    #[test]
    fn dips_then_recovers() {
        let mut d = dip();
        d.restart();
        d.advance(0.1);
        assert!((d.offset() - 0.05).abs() < 1.0e-6);
        d.advance(0.1);
        assert!((d.offset() - 0.1).abs() < 1.0e-6);
        d.advance(0.1);
        assert!((d.offset() - 0.05).abs() < 1.0e-6);
        d.advance(0.15);
        assert_eq!(d.offset(), 0.0);
        assert!(!d.is_active());
    }

    #[test]
    fn new_landing_restarts_the_sequence() {
        let mut d = dip();
        d.restart();
        d.advance(0.3);
        d.restart();
        assert!(d.is_active());
        assert_eq!(d.offset(), 0.0);
        d.advance(0.2);
        assert!((d.offset() - 0.1).abs() < 1.0e-6);
    }

    #[test]
    fn idle_dip_has_no_offset() {
        let mut d = dip();
        d.advance(1.0);
        assert_eq!(d.offset(), 0.0);
    }
}
