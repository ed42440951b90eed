use crate::math::smoothstep;
use crate::settings::FovKickSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KickDirection {
    Up,
    Down,
}

/// Field-of-view kick on walk/run transitions.
///
/// `progress` runs from 0 (base FOV) to 1 (base + increase) and is eased with smoothstep. A new
/// kick replaces the running one and continues from the current progress, so reversing
/// mid-kick never jumps.
#[derive(Clone, Debug)]
pub struct FovKick {
    settings: FovKickSettings,
    progress: f32,
    direction: Option<KickDirection>,
}

impl FovKick {
    pub fn new(settings: FovKickSettings) -> Self {
        Self {
            settings,
            progress: 0.0,
            direction: None,
        }
    }

    pub fn start(&mut self, direction: KickDirection) {
        if !self.settings.enabled {
            return;
        }
        log::debug!("fov kick {:?} from progress {:.2}", direction, self.progress);
        self.direction = Some(direction);
    }

    pub fn in_flight(&self) -> Option<KickDirection> {
        self.direction
    }

    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        match self.direction {
            Some(KickDirection::Up) => {
                self.progress += dt / self.settings.time_to_increase;
                if self.progress >= 1.0 {
                    self.progress = 1.0;
                    self.direction = None;
                }
            }
            Some(KickDirection::Down) => {
                self.progress -= dt / self.settings.time_to_decrease;
                if self.progress <= 0.0 {
                    self.progress = 0.0;
                    self.direction = None;
                }
            }
            None => {}
        }
    }

    pub fn field_of_view(&self) -> f32 {
        self.settings.base_fov_deg + smoothstep(self.progress) * self.settings.increase_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kick() -> FovKick {
        FovKick::new(FovKickSettings::default())
    }

    #[test]
    fn kicks_up_and_holds() {
        let mut k = kick();
        k.start(KickDirection::Up);
        k.advance(0.5);
        assert!((k.field_of_view() - 61.5).abs() < 1.0e-4);
        k.advance(0.6);
        assert_eq!(k.field_of_view(), 63.0);
        assert_eq!(k.in_flight(), None);
    }

    #[test]
    fn kick_down_finishes_exactly_on_base() {
        let mut k = kick();
        k.start(KickDirection::Up);
        k.advance(2.0);
        k.start(KickDirection::Down);
        for _ in 0..70 {
            k.advance(0.016);
        }
        assert_eq!(k.field_of_view(), 60.0);
    }

    #[test]
    fn reversal_continues_from_current_progress() {
        let mut k = kick();
        k.start(KickDirection::Up);
        k.advance(0.25);
        let before = k.field_of_view();
        k.start(KickDirection::Down);
        assert_eq!(k.field_of_view(), before);
        k.advance(0.1);
        assert!(k.field_of_view() < before);
    }

    #[test]
    fn disabled_kick_is_inert() {
        let mut k = FovKick::new(FovKickSettings {
            enabled: false,
            ..FovKickSettings::default()
        });
        k.start(KickDirection::Up);
        k.advance(1.0);
        assert_eq!(k.field_of_view(), 60.0);
    }
}
