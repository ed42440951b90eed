use std::marker::PhantomData;

use super::{LocomotionStrategy, MotionStep};
use crate::ground::{GroundSensor, SphereCaster};
use crate::math::{Vec3, approx_zero, rotate_about_up};
use crate::settings::DynamicsSettings;

/// Physics-world collaborator for the force-accumulation strategy: one rigid body with
/// locked rotations, integrated by the world.
pub trait DynamicBody {
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    /// Linear drag (damping) coefficient.
    fn set_drag(&mut self, drag: f32);
    fn apply_impulse(&mut self, impulse: Vec3);
    fn sleep(&mut self);
}

/// Physically-reactive strategy: input becomes impulses on a dynamics body; gravity and
/// collisions are left to the world's integrator.
///
/// - Input impulses are only applied below the target speed (squared comparison) and only
///   when grounded or with air control.
/// - Grounded: high drag; take-off zeroes drag and vertical speed before the jump impulse; an
///   idle, slow body is put to sleep.
/// - Airborne: zero drag; on the tick the actor walks off an edge its velocity is reprojected
///   onto the floor below (if any is in reach and not too steep).
#[derive(Clone, Debug)]
pub struct ForceAccumulation<W> {
    settings: DynamicsSettings,
    jump_force: f32,
    _world: PhantomData<fn(&W)>,
}

impl<W> ForceAccumulation<W> {
    pub fn new(settings: DynamicsSettings, jump_force: f32) -> Self {
        Self {
            settings,
            jump_force,
            _world: PhantomData,
        }
    }
}

impl<W: DynamicBody + SphereCaster> LocomotionStrategy for ForceAccumulation<W> {
    type World = W;

    fn name(&self) -> &'static str {
        "force-accumulation"
    }

    fn position(&self, world: &W) -> Vec3 {
        world.position()
    }

    fn velocity(&self, world: &W) -> Vec3 {
        world.velocity()
    }

    fn integrate(&mut self, world: &mut W, sensor: &GroundSensor, step: &MotionStep<'_>) {
        let has_input = step.input.has_input();

        if has_input && (step.supported || step.air_control) {
            let target_sq = step.target_speed * step.target_speed;
            if world.velocity().norm_squared() < target_sq {
                world.apply_impulse(step.desired * step.target_speed * step.slope_multiplier);
            }
        }

        if step.supported {
            world.set_drag(self.settings.grounded_drag);

            if step.transitions.jumped {
                world.set_drag(0.0);
                let v = world.velocity();
                world.set_velocity(Vec3::new(v.x, 0.0, v.z));
                world.apply_impulse(Vec3::new(0.0, self.jump_force, 0.0));
            }

            if !step.actor.jumping
                && !has_input
                && world.velocity().norm_squared() < self.settings.sleep_speed.powi(2)
            {
                world.sleep();
            }
        } else {
            world.set_drag(0.0);
            if step.transitions.left_ground {
                let velocity = world.velocity();
                if let Some(stuck) = sensor.stick_to_ground(&*world, world.position(), &velocity) {
                    world.set_velocity(stuck);
                }
            }
        }
    }

    /// Turn the body's momentum with the view.
    fn follow_look(&mut self, world: &mut W, yaw_delta_deg: f32, steerable: bool) {
        if !steerable || approx_zero(yaw_delta_deg) {
            return;
        }
        let velocity = world.velocity();
        world.set_velocity(rotate_about_up(&velocity, yaw_delta_deg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::{CastHit, ContactInfo, QueryTriggers};
    use crate::input::MoveInput;
    use crate::math::Vec2;
    use crate::settings::{CapsuleSpec, GroundSettings};
    use crate::state::{ActorState, Transitions};

    #[derive(Default)]
    struct Body {
        velocity: Vec3,
        drag: f32,
        impulses: Vec<Vec3>,
        asleep: bool,
    }

    impl SphereCaster for Body {
        fn sphere_cast(&self, _: Vec3, _: f32, _: Vec3, _: f32, _: QueryTriggers) -> Option<CastHit> {
            Some(CastHit {
                normal: Vec3::y(),
                distance: 0.6,
            })
        }
    }

    impl DynamicBody for Body {
        fn position(&self) -> Vec3 {
            Vec3::zeros()
        }
        fn velocity(&self) -> Vec3 {
            self.velocity
        }
        fn set_velocity(&mut self, velocity: Vec3) {
            self.velocity = velocity;
        }
        fn set_drag(&mut self, drag: f32) {
            self.drag = drag;
        }
        fn apply_impulse(&mut self, impulse: Vec3) {
            self.impulses.push(impulse);
            self.velocity += impulse / 10.0;
            self.asleep = false;
        }
        fn sleep(&mut self) {
            self.asleep = true;
        }
    }

    fn integrate(body: &mut Body, input: MoveInput, actor: ActorState, t: Transitions, supported: bool) {
        let contact = ContactInfo::none(0.45);
        let step = MotionStep {
            input: &input,
            desired: if input.has_input() {
                Vec3::new(0.0, 0.0, -1.0)
            } else {
                Vec3::zeros()
            },
            target_speed: 8.0,
            slope_multiplier: 1.0,
            contact: &contact,
            actor: &actor,
            transitions: t,
            supported,
            air_control: false,
            dt: 0.02,
        };
        let sensor = GroundSensor::new(CapsuleSpec::default(), GroundSettings::default());
        ForceAccumulation::new(DynamicsSettings::default(), 30.0).integrate(body, &sensor, &step);
    }

    fn forward() -> MoveInput {
        MoveInput::new(Vec2::new(0.0, 1.0), false)
    }

    fn grounded() -> ActorState {
        ActorState {
            grounded: true,
            ..ActorState::default()
        }
    }

    #[test]
    fn grounded_input_pushes_until_target_speed() {
        let mut body = Body::default();
        integrate(&mut body, forward(), grounded(), Transitions::default(), true);
        assert_eq!(body.impulses, vec![Vec3::new(0.0, 0.0, -8.0)]);
        assert_eq!(body.drag, 5.0);

        body.velocity = Vec3::new(0.0, 0.0, -8.5);
        integrate(&mut body, forward(), grounded(), Transitions::default(), true);
        assert_eq!(body.impulses.len(), 1);
    }

    #[test]
    fn no_steering_in_the_air_without_air_control() {
        let mut body = Body::default();
        integrate(&mut body, forward(), ActorState::default(), Transitions::default(), false);
        assert!(body.impulses.is_empty());
        assert_eq!(body.drag, 0.0);
    }

    #[test]
    fn jump_zeroes_drag_and_vertical_speed_first() {
        let mut body = Body {
            velocity: Vec3::new(1.0, -0.5, 0.0),
            ..Body::default()
        };
        let jumped = Transitions {
            jumped: true,
            ..Transitions::default()
        };
        let actor = ActorState {
            jumping: true,
            ..ActorState::default()
        };
        integrate(&mut body, MoveInput::default(), actor, jumped, true);
        assert_eq!(body.drag, 0.0);
        assert_eq!(body.impulses, vec![Vec3::new(0.0, 30.0, 0.0)]);
        assert!((body.velocity.y - 3.0).abs() < 1.0e-6);
        assert!(!body.asleep);
    }

    #[test]
    fn idle_slow_body_sleeps() {
        let mut body = Body {
            velocity: Vec3::new(0.2, 0.0, 0.0),
            ..Body::default()
        };
        integrate(&mut body, MoveInput::default(), grounded(), Transitions::default(), true);
        assert!(body.asleep);
    }

    #[test]
    fn walking_off_an_edge_sticks_to_the_floor_below() {
        let mut body = Body {
            velocity: Vec3::new(0.0, 1.5, -6.0),
            ..Body::default()
        };
        let left = Transitions {
            left_ground: true,
            ..Transitions::default()
        };
        integrate(&mut body, forward(), ActorState::default(), left, false);
        assert!(body.velocity.y.abs() < 1.0e-6);
        assert_eq!(body.velocity.z, -6.0);
    }

    #[test]
    fn look_rotates_momentum_only_when_steerable() {
        let mut body = Body {
            velocity: Vec3::new(0.0, 0.0, -4.0),
            ..Body::default()
        };
        let mut strategy = ForceAccumulation::<Body>::new(DynamicsSettings::default(), 30.0);
        strategy.follow_look(&mut body, 90.0, false);
        assert_eq!(body.velocity, Vec3::new(0.0, 0.0, -4.0));
        strategy.follow_look(&mut body, 90.0, true);
        assert!((body.velocity - Vec3::new(4.0, 0.0, 0.0)).norm() < 1.0e-5);
    }
}
