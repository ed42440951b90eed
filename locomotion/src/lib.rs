//! First-person character locomotion.
//!
//! Ground sensing, slope-scaled speed, jump/land state, look control, and the feel layer on
//! top (head bob, landing dip, FOV kick, footstep timing). Motion reaches the physics world
//! through one of two strategies: a kinematic sweep or force accumulation on a dynamics body.
//! The host engine plugs in through the collaborator traits re-exported below; `world`
//! provides rapier-backed implementations.

pub mod actor;
pub mod audio;
pub mod camera;
pub mod error;
pub mod footstep;
pub mod ground;
pub mod input;
pub mod interaction;
pub mod look;
pub mod math;
pub mod motion;
pub mod settings;
pub mod slope;
pub mod state;
pub mod world;

pub use actor::{FirstPersonActor, FrameReport, TickReport};
pub use audio::{AudioCue, AudioSink, CueId};
pub use camera::{CameraFeedback, CameraSink};
pub use error::ConfigError;
pub use footstep::{FootstepCycler, FootstepPlaylist};
pub use ground::{CastHit, ContactInfo, GroundSensor, QueryTriggers, SphereCaster};
pub use input::{FrameInput, InputSource, JumpMailbox, MoveInput};
pub use interaction::{Interactable, InteractableLookup, LabelUpdate, LookAtProbe};
pub use look::{CursorRequest, CursorState, LookController, Orientation};
pub use motion::{
    DynamicBody, ForceAccumulation, KinematicMover, KinematicSweep, LocomotionStrategy,
    MotionStep, TargetSpeed,
};
pub use settings::{CapsuleSpec, LocomotionConfig};
pub use slope::{Keyframe, SlopeCurve, SlopeModel};
pub use state::{ActorState, LocomotionState, LocomotionStateMachine, Transitions};
pub use world::{
    ColliderShapeDef, RapierDynamicsWorld, RapierQueryWorld, WorldLabel, WorldStaticDef,
    collider_from_def,
};
