//! Turning input into motion.
//!
//! Both strategies share the same preamble, computed once per tick by the actor: the
//! camera-relative desired direction projected onto the ground plane, the target speed, and
//! the slope multiplier. What differs is how the result reaches the world: a kinematic
//! sweep-and-slide move ([`KinematicSweep`]) or impulses on a dynamics body
//! ([`ForceAccumulation`]).

pub mod dynamics;
pub mod kinematic;

pub use dynamics::{DynamicBody, ForceAccumulation};
pub use kinematic::{KinematicMover, KinematicSweep};

use crate::ground::{ContactInfo, GroundSensor, SphereCaster};
use crate::input::MoveInput;
use crate::math::{EPSILON, Vec3, normalize_or_zero, project_on_plane};
use crate::settings::MovementSettings;
use crate::state::{ActorState, Transitions};

/// Speed the actor is currently trying to reach, and whether it is running.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetSpeed {
    pub current: f32,
    pub running: bool,
}

impl TargetSpeed {
    pub fn new(settings: &MovementSettings) -> Self {
        Self {
            current: settings.forward_speed,
            running: false,
        }
    }

    /// Pick the per-axis speed for this input.
    ///
    /// Zero input keeps the previous target. Strafing selects the strafe speed, backward
    /// input the backward speed, and forward input wins over both.
    pub fn update(&mut self, settings: &MovementSettings, input: &MoveInput) {
        if !input.has_input() {
            return;
        }
        let mut speed = self.current;
        if input.axes.x.abs() > EPSILON {
            speed = settings.strafe_speed;
        }
        if input.axes.y < -EPSILON {
            speed = settings.backward_speed;
        }
        if input.axes.y > EPSILON {
            speed = settings.forward_speed;
        }
        self.running = input.run_held;
        if self.running {
            speed *= settings.run_multiplier;
        }
        self.current = speed;
    }

    /// Stride bonus added to the measured speed when advancing bob and footstep cycles.
    #[inline]
    pub fn stride_bonus(&self, settings: &MovementSettings) -> f32 {
        if self.running {
            self.current * settings.run_step_lengthen
        } else {
            self.current
        }
    }
}

/// Camera-relative input projected onto the contact plane and normalized.
///
/// Zero input yields a zero vector rather than a NaN.
pub fn desired_direction(input: &MoveInput, forward: &Vec3, right: &Vec3, normal: &Vec3) -> Vec3 {
    if !input.has_input() {
        return Vec3::zeros();
    }
    let raw = forward * input.axes.y + right * input.axes.x;
    normalize_or_zero(&project_on_plane(&raw, normal))
}

/// Everything a strategy needs for one fixed tick.
#[derive(Clone, Copy, Debug)]
pub struct MotionStep<'a> {
    pub input: &'a MoveInput,
    /// Unit direction on the contact plane, or zero.
    pub desired: Vec3,
    pub target_speed: f32,
    pub slope_multiplier: f32,
    pub contact: &'a ContactInfo,
    /// State after this tick's transitions.
    pub actor: &'a ActorState,
    pub transitions: Transitions,
    /// Whether the actor stood on ground when contact was evaluated (before any take-off).
    pub supported: bool,
    pub air_control: bool,
    pub dt: f32,
}

/// Applies one tick of motion to the world.
///
/// Implementations share ground sensing, slope scaling and state handling; they only decide
/// how velocity reaches the body.
pub trait LocomotionStrategy {
    type World: SphereCaster;

    fn name(&self) -> &'static str;

    fn position(&self, world: &Self::World) -> Vec3;

    fn velocity(&self, world: &Self::World) -> Vec3;

    fn integrate(&mut self, world: &mut Self::World, sensor: &GroundSensor, step: &MotionStep<'_>);

    /// Called when the look yaw changes. `steerable` is true when grounded or with air control.
    fn follow_look(&mut self, _world: &mut Self::World, _yaw_delta_deg: f32, _steerable: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec2, up};

    fn settings() -> MovementSettings {
        MovementSettings::default()
    }

    #[test]
    fn target_speed_follows_input_precedence() {
        let s = settings();
        let mut target = TargetSpeed::new(&s);

        target.update(&s, &MoveInput::new(Vec2::new(1.0, 0.0), false));
        assert_eq!(target.current, s.strafe_speed);

        target.update(&s, &MoveInput::new(Vec2::new(0.0, -1.0), false));
        assert_eq!(target.current, s.backward_speed);

        target.update(&s, &MoveInput::new(Vec2::new(1.0, 1.0), false));
        assert_eq!(target.current, s.forward_speed);

        target.update(&s, &MoveInput::new(Vec2::new(0.0, 1.0), true));
        assert_eq!(target.current, s.forward_speed * s.run_multiplier);
        assert!(target.running);

        // No input keeps the last target.
        target.update(&s, &MoveInput::default());
        assert_eq!(target.current, s.forward_speed * s.run_multiplier);
    }

    #[test]
    fn stride_bonus_lengthens_when_running() {
        let s = settings();
        let walking = TargetSpeed {
            current: 8.0,
            running: false,
        };
        let running = TargetSpeed {
            current: 16.0,
            running: true,
        };
        assert_eq!(walking.stride_bonus(&s), 8.0);
        assert!((running.stride_bonus(&s) - 16.0 * 0.7).abs() < 1.0e-5);
    }

    #[test]
    fn desired_direction_lies_on_the_slope() {
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let input = MoveInput::new(Vec2::new(0.0, 1.0), false);
        let d = desired_direction(&input, &Vec3::new(0.0, 0.0, -1.0), &Vec3::x(), &normal);
        assert!((d.norm() - 1.0).abs() < 1.0e-5);
        assert!(d.dot(&normal).abs() < 1.0e-5);
        // Walking into the slope goes uphill.
        assert!(d.y > 0.0);
    }

    #[test]
    fn zero_input_has_no_direction() {
        let d = desired_direction(&MoveInput::default(), &Vec3::z(), &Vec3::x(), &up());
        assert_eq!(d, Vec3::zeros());
    }
}
