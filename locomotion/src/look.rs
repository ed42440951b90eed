//! Mouse-look: yaw/pitch integration, optional smoothing, and the cursor lock policy.

use crate::math::{EPSILON, Quat, Vec2, Vec3, decay_factor, forward_from_yaw, right_from_yaw, yaw_rotation};
use crate::settings::LookSettings;

/// Actor heading and camera pitch, in degrees.
///
/// Yaw accumulates without wrapping; use [`Orientation::display_yaw_deg`] for UI.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub yaw_deg: f32,
    pub pitch_deg: f32,
}

impl Orientation {
    pub fn new(yaw_deg: f32, pitch_deg: f32) -> Self {
        Self { yaw_deg, pitch_deg }
    }

    /// Yaw wrapped into `[0, 360)`.
    pub fn display_yaw_deg(&self) -> f32 {
        self.yaw_deg.rem_euclid(360.0)
    }

    /// Rotation of the actor body (yaw only).
    #[inline]
    pub fn body_rotation(&self) -> Quat {
        yaw_rotation(self.yaw_deg)
    }

    /// Camera rotation relative to the body (pitch only).
    #[inline]
    pub fn camera_local_rotation(&self) -> Quat {
        Quat::from_axis_angle(&Vec3::x_axis(), self.pitch_deg.to_radians())
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw_deg)
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        right_from_yaw(self.yaw_deg)
    }

    /// Unit view direction including pitch.
    pub fn view_direction(&self) -> Vec3 {
        self.body_rotation() * (self.camera_local_rotation() * Vec3::new(0.0, 0.0, -1.0))
    }
}

/// Integrate one look delta into `orientation`.
///
/// `delta.x` turns right, `delta.y` looks up. Pitch is clamped to `±pitch_clamp_deg`; yaw is
/// unbounded. Non-finite deltas are ignored.
pub fn integrate_look(
    orientation: Orientation,
    delta: Vec2,
    sensitivity: Vec2,
    pitch_clamp_deg: f32,
) -> Orientation {
    if !delta.x.is_finite() || !delta.y.is_finite() {
        return orientation;
    }
    Orientation {
        yaw_deg: orientation.yaw_deg + delta.x * sensitivity.x,
        pitch_deg: clamp_pitch(orientation.pitch_deg + delta.y * sensitivity.y, pitch_clamp_deg),
    }
}

/// Clamp to `±limit`. A NaN limit leaves the pitch unclamped instead of panicking.
fn clamp_pitch(pitch_deg: f32, limit_deg: f32) -> f32 {
    let limit = limit_deg.abs();
    pitch_deg.max(-limit).min(limit)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    Locked,
    Free,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorRequest {
    Lock,
    Unlock,
    Toggle,
}

/// Cursor lock policy. Requests are idempotent: asking for the current state is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct CursorLock {
    enabled: bool,
    state: CursorState,
}

impl CursorLock {
    /// Starts locked when the policy is enabled.
    pub fn new(enabled: bool) -> Self {
        let state = if enabled {
            CursorState::Locked
        } else {
            CursorState::Free
        };
        Self { enabled, state }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Apply a request; returns the new state only if it changed.
    pub fn request(&mut self, request: CursorRequest) -> Option<CursorState> {
        if !self.enabled {
            return None;
        }
        let next = match request {
            CursorRequest::Lock => CursorState::Locked,
            CursorRequest::Unlock => CursorState::Free,
            CursorRequest::Toggle => match self.state {
                CursorState::Locked => CursorState::Free,
                CursorState::Free => CursorState::Locked,
            },
        };
        if next == self.state {
            return None;
        }
        log::debug!("cursor {:?} -> {:?}", self.state, next);
        self.state = next;
        Some(next)
    }
}

/// Result of one look pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookUpdate {
    pub orientation: Orientation,
    /// Change of the applied yaw this pass (degrees).
    pub yaw_delta_deg: f32,
}

#[derive(Clone, Debug)]
pub struct LookController {
    settings: LookSettings,
    target: Orientation,
    current: Orientation,
    cursor: CursorLock,
}

impl LookController {
    pub fn new(settings: LookSettings, initial: Orientation) -> Self {
        let pitch = clamp_pitch(initial.pitch_deg, settings.pitch_clamp_deg);
        let initial = Orientation::new(initial.yaw_deg, pitch);
        Self {
            settings,
            target: initial,
            current: initial,
            cursor: CursorLock::new(settings.lock_cursor),
        }
    }

    /// Orientation currently applied to the body and camera.
    pub fn orientation(&self) -> Orientation {
        self.current
    }

    pub fn cursor(&self) -> CursorState {
        self.cursor.state()
    }

    pub fn request_cursor(&mut self, request: CursorRequest) -> Option<CursorState> {
        self.cursor.request(request)
    }

    /// Integrate one frame of raw look input.
    ///
    /// With `time_scale` ≈ 0 (paused) the input is dropped entirely and nothing changes.
    pub fn apply(&mut self, raw_delta: Vec2, dt: f32, time_scale: f32) -> LookUpdate {
        if time_scale.abs() <= EPSILON {
            return LookUpdate {
                orientation: self.current,
                yaw_delta_deg: 0.0,
            };
        }

        let sensitivity = Vec2::new(self.settings.x_sensitivity, self.settings.y_sensitivity);
        self.target = integrate_look(
            self.target,
            raw_delta,
            sensitivity,
            self.settings.pitch_clamp_deg,
        );

        let previous_yaw = self.current.yaw_deg;
        self.current = if self.settings.smooth {
            let k = decay_factor(self.settings.smooth_time, dt);
            Orientation {
                yaw_deg: self.current.yaw_deg + (self.target.yaw_deg - self.current.yaw_deg) * k,
                pitch_deg: self.current.pitch_deg
                    + (self.target.pitch_deg - self.current.pitch_deg) * k,
            }
        } else {
            self.target
        };

        LookUpdate {
            orientation: self.current,
            yaw_delta_deg: self.current.yaw_deg - previous_yaw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn controller(smooth: bool) -> LookController {
        LookController::new(
            LookSettings {
                smooth,
                ..LookSettings::default()
            },
            Orientation::default(),
        )
    }

    #[rstest]
    #[case(1.0e4)]
    #[case(-1.0e4)]
    #[case(1.0e30)]
    #[case(-1.0e30)]
    fn pitch_stays_clamped_for_extreme_deltas(#[case] dy: f32) {
        let mut look = controller(false);
        for _ in 0..3 {
            let update = look.apply(Vec2::new(0.0, dy), 0.016, 1.0);
            assert!(update.orientation.pitch_deg.abs() <= 89.0);
        }
    }

    #[test]
    fn non_finite_deltas_are_ignored() {
        let o = integrate_look(
            Orientation::new(10.0, 5.0),
            Vec2::new(f32::NAN, f32::INFINITY),
            Vec2::new(2.0, 2.0),
            89.0,
        );
        assert_eq!(o, Orientation::new(10.0, 5.0));
    }

    #[test]
    fn yaw_accumulates_unbounded_and_wraps_for_display() {
        let mut look = controller(false);
        for _ in 0..4 {
            look.apply(Vec2::new(50.0, 0.0), 0.016, 1.0);
        }
        let o = look.orientation();
        assert!((o.yaw_deg - 400.0).abs() < 1.0e-3);
        assert!((o.display_yaw_deg() - 40.0).abs() < 1.0e-3);
    }

    #[test]
    fn paused_time_drops_look_input() {
        let mut look = controller(false);
        let update = look.apply(Vec2::new(30.0, 30.0), 0.016, 1.0e-9);
        assert_eq!(update.orientation, Orientation::default());
        assert_eq!(update.yaw_delta_deg, 0.0);
        // Nothing leaks through once time resumes.
        let update = look.apply(Vec2::zeros(), 0.016, 1.0);
        assert_eq!(update.orientation, Orientation::default());
    }

    #[test]
    fn smoothing_approaches_the_target() {
        let mut look = controller(true);
        let first = look.apply(Vec2::new(10.0, 0.0), 0.02, 1.0);
        assert!(first.orientation.yaw_deg > 0.0 && first.orientation.yaw_deg < 20.0);
        let mut yaw = first.orientation.yaw_deg;
        for _ in 0..200 {
            yaw = look.apply(Vec2::zeros(), 0.02, 1.0).orientation.yaw_deg;
        }
        assert!((yaw - 20.0).abs() < 1.0e-2);
    }

    #[test]
    fn cursor_requests_are_idempotent() {
        let mut cursor = CursorLock::new(true);
        assert_eq!(cursor.state(), CursorState::Locked);
        assert_eq!(cursor.request(CursorRequest::Lock), None);
        assert_eq!(cursor.request(CursorRequest::Unlock), Some(CursorState::Free));
        assert_eq!(cursor.request(CursorRequest::Unlock), None);
        assert_eq!(cursor.request(CursorRequest::Toggle), Some(CursorState::Locked));
    }

    #[test]
    fn disabled_cursor_policy_never_changes() {
        let mut cursor = CursorLock::new(false);
        assert_eq!(cursor.request(CursorRequest::Toggle), None);
        assert_eq!(cursor.state(), CursorState::Free);
    }

    #[rstest]
    #[case(-30.0, 30.0)]
    #[case(f32::NAN, 60.0)]
    #[case(30.0, 30.0)]
    fn unvalidated_pitch_limits_do_not_panic(#[case] limit: f32, #[case] expected: f32) {
        let settings = LookSettings {
            pitch_clamp_deg: limit,
            ..LookSettings::default()
        };
        let mut look = LookController::new(settings, Orientation::new(0.0, 60.0));
        assert_eq!(look.orientation().pitch_deg, expected);
        let update = look.apply(Vec2::new(0.0, -200.0), 0.016, 1.0);
        assert!(update.orientation.pitch_deg.is_finite());
    }

    #[test]
    fn view_direction_pitches_up() {
        let o = Orientation::new(0.0, 45.0);
        let v = o.view_direction();
        assert!(v.y > 0.7 && v.z < -0.7);
    }
}
