//! One controlled first-person actor.
//!
//! The host drives two passes:
//! - [`FirstPersonActor::frame_update`] once per rendered frame: look, cursor policy, input
//!   sampling, and latching jump presses into the mailbox;
//! - [`FirstPersonActor::fixed_update`] once per physics step: ground sensing, slope scaling,
//!   state transitions, motion, then camera feedback and footsteps, all on this tick's contact.
//!
//! The physics world is borrowed per call; the actor owns everything else.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{AudioCue, AudioSink, CueId};
use crate::camera::{CameraFeedback, CameraSink};
use crate::error::ConfigError;
use crate::footstep::FootstepCycler;
use crate::ground::{ContactInfo, GroundSensor};
use crate::input::{InputSource, JumpMailbox, MoveInput};
use crate::look::{CursorRequest, CursorState, LookController, Orientation};
use crate::math::Vec3;
use crate::motion::{LocomotionStrategy, MotionStep, TargetSpeed, desired_direction};
use crate::settings::LocomotionConfig;
use crate::slope::SlopeModel;
use crate::state::{ActorState, LocomotionState, LocomotionStateMachine, Transitions};

/// Outcome of one frame pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub orientation: Orientation,
    /// Set when the cursor lock state changed this frame.
    pub cursor: Option<CursorState>,
    pub jump_latched: bool,
}

/// Outcome of one fixed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub state: LocomotionState,
    pub grounded: bool,
    pub jumping: bool,
    pub position: Vec3,
    pub velocity: Vec3,
    pub contact: ContactInfo,
    pub slope_multiplier: f32,
    pub transitions: Transitions,
    pub camera_position: Vec3,
    pub fov_deg: f32,
    pub footstep: Option<CueId>,
}

pub struct FirstPersonActor<S: LocomotionStrategy, R = StdRng> {
    config: LocomotionConfig,
    sensor: GroundSensor,
    slope: SlopeModel,
    look: LookController,
    machine: LocomotionStateMachine,
    strategy: S,
    camera: CameraFeedback,
    footsteps: FootstepCycler<R>,
    jump: JumpMailbox,
    input: MoveInput,
    target: TargetSpeed,
    was_running: bool,
}

impl<S: LocomotionStrategy> FirstPersonActor<S, StdRng> {
    /// Build an actor with an OS-seeded footstep RNG.
    pub fn new(
        config: LocomotionConfig,
        strategy: S,
        world: &S::World,
        orientation: Orientation,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(config, strategy, world, orientation, StdRng::from_os_rng())
    }
}

impl<S: LocomotionStrategy, R: Rng> FirstPersonActor<S, R> {
    /// Build an actor with an explicit footstep RNG (seed it for reproducible cue order).
    ///
    /// Ground contact is sensed once here, so an actor spawned on the floor starts grounded
    /// without a landing.
    pub fn with_rng(
        config: LocomotionConfig,
        strategy: S,
        world: &S::World,
        orientation: Orientation,
        rng: R,
    ) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            log::warn!("rejected locomotion config: {err}");
            return Err(err);
        }

        let sensor = GroundSensor::new(config.capsule, config.ground);
        let position = strategy.position(world);
        let mut machine = LocomotionStateMachine::new(position, orientation);
        machine.settle(&sensor.sense(world, position));

        let look = LookController::new(config.look, orientation);
        machine.set_orientation(look.orientation());

        log::info!(
            "actor spawned at {:?} using {} (capsule r={} h={}, grounded={})",
            position,
            strategy.name(),
            config.capsule.radius,
            config.capsule.height,
            machine.actor().grounded
        );

        Ok(Self {
            sensor,
            slope: SlopeModel::new(config.movement.slope_curve.clone()),
            look,
            machine,
            strategy,
            camera: CameraFeedback::new(
                config.head_bob,
                config.footsteps.stride_interval,
                config.landing_dip,
                config.fov_kick,
            ),
            footsteps: FootstepCycler::new(&config.footsteps, rng)?,
            jump: JumpMailbox::default(),
            input: MoveInput::default(),
            target: TargetSpeed::new(&config.movement),
            was_running: false,
            config,
        })
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> LocomotionState {
        self.machine.state()
    }

    pub fn actor(&self) -> &ActorState {
        self.machine.actor()
    }

    pub fn orientation(&self) -> Orientation {
        self.look.orientation()
    }

    pub fn cursor(&self) -> CursorState {
        self.look.cursor()
    }

    pub fn jump_pending(&self) -> bool {
        self.jump.is_pending()
    }

    pub fn camera(&self) -> &CameraFeedback {
        &self.camera
    }

    pub fn footsteps(&self) -> &FootstepCycler<R> {
        &self.footsteps
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Variable-rate pass.
    pub fn frame_update(
        &mut self,
        world: &mut S::World,
        input: &impl InputSource,
        dt: f32,
        time_scale: f32,
    ) -> FrameReport {
        let look = self.look.apply(input.look_delta(), dt, time_scale);
        self.machine.set_orientation(look.orientation);

        let steerable = self.machine.actor().grounded || self.config.movement.air_control;
        self.strategy.follow_look(world, look.yaw_delta_deg, steerable);

        let mut cursor = None;
        for (down, request) in [
            (input.cursor_toggle_down(), CursorRequest::Toggle),
            (input.cursor_lock_down(), CursorRequest::Lock),
            (input.cursor_unlock_down(), CursorRequest::Unlock),
        ] {
            if !down {
                continue;
            }
            if let Some(state) = self.look.request_cursor(request) {
                cursor = Some(state);
            }
        }

        self.input = MoveInput::new(input.move_axes(), input.run_held());
        if input.jump_down() {
            self.jump.post();
        }

        FrameReport {
            orientation: look.orientation,
            cursor,
            jump_latched: self.jump.is_pending(),
        }
    }

    /// Fixed-rate pass.
    pub fn fixed_update(
        &mut self,
        world: &mut S::World,
        dt: f32,
        audio: &mut impl AudioSink,
        camera: &mut impl CameraSink,
    ) -> TickReport {
        let movement = &self.config.movement;

        // Ground, slope, state.
        let position = self.strategy.position(&*world);
        let contact = self.sensor.sense(&*world, position);
        let slope_multiplier = self.slope.multiplier(&contact.normal);
        let mut transitions = self.machine.observe_contact(&contact);
        let supported = self.machine.actor().grounded;

        let input = self.input.normalized();
        self.target.update(movement, &input);

        // The mailbox is emptied whether or not the jump happens.
        transitions.jumped = self.machine.try_jump(self.jump.take());

        // Motion.
        let orientation = self.look.orientation();
        let desired = desired_direction(
            &input,
            &orientation.forward(),
            &orientation.right(),
            &contact.normal,
        );
        let actor = *self.machine.actor();
        let step = MotionStep {
            input: &input,
            desired,
            target_speed: self.target.current,
            slope_multiplier,
            contact: &contact,
            actor: &actor,
            transitions,
            supported,
            air_control: movement.air_control,
            dt,
        };
        self.strategy.integrate(world, &self.sensor, &step);

        let position = self.strategy.position(&*world);
        let velocity = self.strategy.velocity(&*world);
        self.machine.record_motion(position, velocity);
        let grounded = self.machine.actor().grounded;

        // Presentation.
        if transitions.jumped {
            audio.play(AudioCue::Jump);
        }
        if transitions.landed {
            audio.play(AudioCue::Land);
            self.footsteps.on_landed();
        }

        let speed = velocity.norm();
        let stride_bonus = self.target.stride_bonus(movement);

        if input.run_held != self.was_running && velocity.norm_squared() > 0.0 {
            self.camera.on_gait_change(input.run_held);
        }
        self.was_running = input.run_held;

        let camera_position =
            self.camera.update(speed, stride_bonus, grounded, transitions.landed, dt);
        let fov_deg = self.camera.field_of_view();
        camera.set_local_position(camera_position);
        camera.set_field_of_view(fov_deg);

        let footstep = self
            .footsteps
            .advance(speed, stride_bonus, input.has_input(), grounded, dt);
        if let Some(cue) = footstep {
            audio.play_one_shot(AudioCue::Footstep(cue));
        }

        log::trace!(
            "{:?} pos={:?} speed={:.2} contact={} slope={:.2}",
            self.machine.state(),
            position,
            speed,
            contact.hit,
            slope_multiplier
        );

        TickReport {
            state: self.machine.state(),
            grounded,
            jumping: self.machine.actor().jumping,
            position,
            velocity,
            contact,
            slope_multiplier,
            transitions,
            camera_position,
            fov_deg,
            footstep,
        }
    }
}
