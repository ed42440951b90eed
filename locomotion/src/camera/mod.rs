//! Camera-space feedback derived from the motion that was just applied.
//!
//! Nothing here feeds back into physics. The actor calls [`CameraFeedback::update`] once per
//! fixed tick after integration and forwards the result to a [`CameraSink`].

mod fov_kick;
mod head_bob;
mod landing_dip;

pub use fov_kick::{FovKick, KickDirection};
pub use head_bob::{BobCycleState, HeadBob};
pub use landing_dip::LandingDip;

use crate::math::{EPSILON, Vec3};
use crate::settings::{FovKickSettings, HeadBobSettings, LandingDipSettings};

/// Camera transform collaborator.
pub trait CameraSink {
    /// Camera position relative to the actor body.
    fn set_local_position(&mut self, position: Vec3);
    fn set_field_of_view(&mut self, fov_deg: f32);
}

#[derive(Clone, Debug)]
pub struct CameraFeedback {
    neutral: Vec3,
    bob_enabled: bool,
    head_bob: HeadBob,
    landing_dip: LandingDip,
    fov_kick: FovKick,
}

impl CameraFeedback {
    pub fn new(
        head_bob: HeadBobSettings,
        stride_interval: f32,
        landing_dip: LandingDipSettings,
        fov_kick: FovKickSettings,
    ) -> Self {
        Self {
            neutral: Vec3::new(0.0, head_bob.eye_height, 0.0),
            bob_enabled: head_bob.enabled,
            head_bob: HeadBob::new(head_bob, stride_interval),
            landing_dip: LandingDip::new(landing_dip),
            fov_kick: FovKick::new(fov_kick),
        }
    }

    pub fn neutral(&self) -> Vec3 {
        self.neutral
    }

    pub fn bob(&self) -> &BobCycleState {
        self.head_bob.state()
    }

    pub fn landing_dip(&self) -> &LandingDip {
        &self.landing_dip
    }

    /// Camera local position for this tick.
    ///
    /// While grounded and moving the bob advances with `speed + stride_bonus`; otherwise the
    /// bob eases back to neutral. A landing (re)starts the dip, which is subtracted from the
    /// vertical offset in both cases.
    pub fn update(
        &mut self,
        speed: f32,
        stride_bonus: f32,
        grounded: bool,
        just_landed: bool,
        dt: f32,
    ) -> Vec3 {
        if just_landed {
            self.landing_dip.restart();
        }

        let bob = if self.bob_enabled && grounded && speed > EPSILON {
            self.head_bob.advance(speed + stride_bonus, dt)
        } else {
            self.head_bob.settle(dt)
        };

        let offset = Vec3::new(bob.x, bob.y - self.landing_dip.offset(), 0.0);
        self.landing_dip.advance(dt);
        self.fov_kick.advance(dt);

        self.neutral + offset
    }

    /// Kick the FOV toward running (`true`) or walking (`false`).
    pub fn on_gait_change(&mut self, running: bool) {
        self.fov_kick.start(if running {
            KickDirection::Up
        } else {
            KickDirection::Down
        });
    }

    pub fn field_of_view(&self) -> f32 {
        self.fov_kick.field_of_view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback() -> CameraFeedback {
        CameraFeedback::new(
            HeadBobSettings::default(),
            5.0,
            LandingDipSettings::default(),
            FovKickSettings::default(),
        )
    }

    #[test]
    fn resting_camera_sits_at_eye_height() {
        let mut camera = feedback();
        let p = camera.update(0.0, 8.0, true, false, 0.02);
        assert_eq!(p, Vec3::new(0.0, 0.8, 0.0));
    }

    #[test]
    fn moving_on_ground_bobs() {
        let mut camera = feedback();
        let mut max_dev: f32 = 0.0;
        for _ in 0..100 {
            let p = camera.update(8.0, 8.0, true, false, 0.02);
            max_dev = max_dev.max((p - camera.neutral()).norm());
        }
        assert!(max_dev > 0.05);
    }

    #[test]
    fn airborne_camera_does_not_bob() {
        let mut camera = feedback();
        for _ in 0..50 {
            camera.update(8.0, 8.0, false, false, 0.02);
        }
        assert_eq!(camera.bob().cycle_x, 0.0);
    }

    #[test]
    fn landing_dips_below_neutral_then_recovers() {
        let mut camera = feedback();
        camera.update(0.0, 0.0, true, true, 0.02);
        let mut lowest = f32::MAX;
        for _ in 0..10 {
            lowest = lowest.min(camera.update(0.0, 0.0, true, false, 0.02).y);
        }
        assert!(lowest < 0.8 - 0.05);
        for _ in 0..20 {
            camera.update(0.0, 0.0, true, false, 0.02);
        }
        assert!(!camera.landing_dip().is_active());
        assert_eq!(camera.update(0.0, 0.0, true, false, 0.02).y, 0.8);
    }

    #[test]
    fn gait_change_kicks_fov() {
        let mut camera = feedback();
        camera.on_gait_change(true);
        for _ in 0..60 {
            camera.update(16.0, 11.2, true, false, 0.02);
        }
        assert!((camera.field_of_view() - 63.0).abs() < 1.0e-4);
    }
}
