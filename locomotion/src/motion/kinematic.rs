use std::marker::PhantomData;

use super::{LocomotionStrategy, MotionStep};
use crate::ground::{GroundSensor, SphereCaster};
use crate::math::{EPSILON, Vec3};
use crate::settings::{GRAVITY_MPS2, KinematicSettings, MovementSettings};

/// Physics-world collaborator for the kinematic strategy.
pub trait KinematicMover {
    /// Sweep the actor capsule from `position` by `translation`, sliding along whatever it hits.
    /// Returns the translation actually applied.
    fn sweep(&self, position: Vec3, translation: Vec3, dt: f32) -> Vec3;
}

/// Directly-driven strategy: the strategy owns the position and a move vector, and every tick
/// asks the world to sweep the capsule by `move_dir * dt`.
///
/// Vertical handling
/// - grounded: a constant downward `stick_to_ground_force` keeps the capsule on the floor;
/// - take-off: vertical speed becomes `jump_speed` (no gravity on that tick);
/// - airborne: `gravity * gravity_multiplier` accumulates;
/// - landing or walking off an edge zeroes the vertical component first.
///
/// Without air control the horizontal part is frozen while airborne, so a jump keeps its
/// momentum; with `air_control` input is re-read every tick, as in a classic
/// character-controller script.
#[derive(Clone, Debug)]
pub struct KinematicSweep<W> {
    position: Vec3,
    move_dir: Vec3,
    velocity: Vec3,
    jump_speed: f32,
    settings: KinematicSettings,
    _world: PhantomData<fn(&W)>,
}

impl<W> KinematicSweep<W> {
    pub fn new(position: Vec3, movement: &MovementSettings, settings: KinematicSettings) -> Self {
        Self {
            position,
            move_dir: Vec3::zeros(),
            velocity: Vec3::zeros(),
            jump_speed: movement.jump_speed,
            settings,
            _world: PhantomData,
        }
    }

    /// Requested velocity for the next sweep (before collision).
    pub fn move_dir(&self) -> Vec3 {
        self.move_dir
    }
}

impl<W: KinematicMover + SphereCaster> LocomotionStrategy for KinematicSweep<W> {
    type World = W;

    fn name(&self) -> &'static str {
        "kinematic-sweep"
    }

    fn position(&self, _world: &W) -> Vec3 {
        self.position
    }

    /// Effective velocity of the last sweep (applied translation over `dt`).
    fn velocity(&self, _world: &W) -> Vec3 {
        self.velocity
    }

    fn integrate(&mut self, world: &mut W, _sensor: &GroundSensor, step: &MotionStep<'_>) {
        if step.supported || step.air_control {
            let speed = step.target_speed * step.slope_multiplier;
            self.move_dir.x = step.desired.x * speed;
            self.move_dir.z = step.desired.z * speed;
        }

        if step.transitions.landed || step.transitions.left_ground {
            self.move_dir.y = 0.0;
        }

        if step.transitions.jumped {
            self.move_dir.y = self.jump_speed;
        } else if step.actor.grounded {
            self.move_dir.y = -self.settings.stick_to_ground_force;
        } else {
            self.move_dir.y -= GRAVITY_MPS2 * self.settings.gravity_multiplier * step.dt;
        }

        let applied = world.sweep(self.position, self.move_dir * step.dt, step.dt);
        self.position += applied;
        self.velocity = if step.dt > EPSILON {
            applied / step.dt
        } else {
            Vec3::zeros()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::{CastHit, ContactInfo, QueryTriggers};
    use crate::input::MoveInput;
    use crate::math::Vec2;
    use crate::settings::{CapsuleSpec, DEFAULT_STICK_TO_GROUND_FORCE, GroundSettings};
    use crate::state::{ActorState, Transitions};

    /// Free space: sweeps apply the full translation and casts never hit.
    struct Void;

    impl SphereCaster for Void {
        fn sphere_cast(&self, _: Vec3, _: f32, _: Vec3, _: f32, _: QueryTriggers) -> Option<CastHit> {
            None
        }
    }

    impl KinematicMover for Void {
        fn sweep(&self, _position: Vec3, translation: Vec3, _dt: f32) -> Vec3 {
            translation
        }
    }

    fn sensor() -> GroundSensor {
        GroundSensor::new(CapsuleSpec::default(), GroundSettings::default())
    }

    fn run(
        strategy: &mut KinematicSweep<Void>,
        input: MoveInput,
        actor: ActorState,
        transitions: Transitions,
        supported: bool,
    ) {
        run_with(strategy, input, actor, transitions, supported, false);
    }

    fn run_with(
        strategy: &mut KinematicSweep<Void>,
        input: MoveInput,
        actor: ActorState,
        transitions: Transitions,
        supported: bool,
        air_control: bool,
    ) {
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
            transitions,
            supported,
            air_control,
            dt: 0.02,
        };
        strategy.integrate(&mut Void, &sensor(), &step);
    }

    fn strategy() -> KinematicSweep<Void> {
        KinematicSweep::new(Vec3::zeros(), &MovementSettings::default(), KinematicSettings::default())
    }

    fn grounded() -> ActorState {
        ActorState {
            grounded: true,
            ..ActorState::default()
        }
    }

    #[test]
    fn grounded_motion_sticks_down_and_moves_forward() {
        let mut s = strategy();
        run(&mut s, MoveInput::new(Vec2::new(0.0, 1.0), false), grounded(), Transitions::default(), true);
        assert!((s.move_dir().z + 8.0).abs() < 1.0e-5);
        assert_eq!(s.move_dir().y, -DEFAULT_STICK_TO_GROUND_FORCE);
        assert!((s.velocity(&Void).z + 8.0).abs() < 1.0e-4);
    }

    #[test]
    fn take_off_sets_jump_speed_then_gravity_accumulates() {
        let mut s = strategy();
        let jumped = Transitions {
            jumped: true,
            ..Transitions::default()
        };
        let airborne = ActorState {
            jumping: true,
            ..ActorState::default()
        };
        run(&mut s, MoveInput::default(), airborne, jumped, true);
        assert_eq!(s.move_dir().y, 10.0);

        run(&mut s, MoveInput::default(), airborne, Transitions::default(), false);
        let expected = 10.0 - GRAVITY_MPS2 * 2.0 * 0.02;
        assert!((s.move_dir().y - expected).abs() < 1.0e-5);
    }

    #[test]
    fn airborne_without_air_control_keeps_momentum() {
        let mut s = strategy();
        run(&mut s, MoveInput::new(Vec2::new(0.0, 1.0), false), grounded(), Transitions::default(), true);
        let left = Transitions {
            left_ground: true,
            ..Transitions::default()
        };
        run(&mut s, MoveInput::default(), ActorState::default(), left, false);
        assert!((s.move_dir().z + 8.0).abs() < 1.0e-5);
        // Vertical speed restarts from zero when walking off an edge.
        let expected = -GRAVITY_MPS2 * 2.0 * 0.02;
        assert!((s.move_dir().y - expected).abs() < 1.0e-5);
    }

    #[test]
    fn air_control_rereads_input_in_the_air() {
        let mut s = strategy();
        run(&mut s, MoveInput::new(Vec2::new(0.0, 1.0), false), grounded(), Transitions::default(), true);
        run_with(
            &mut s,
            MoveInput::default(),
            ActorState::default(),
            Transitions::default(),
            false,
            true,
        );
        assert_eq!(s.move_dir().z, 0.0);
        assert_eq!(s.move_dir().x, 0.0);
    }
}
