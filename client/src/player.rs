//! The locally controlled first-person actor.
//!
//! The locomotion core owns the actor; Bevy only mirrors its pose. Look, cursor and jump
//! latching run in `Update`, motion and feedback in `FixedUpdate`.

use std::env;
use std::fs;

use bevy::prelude::*;
use bevy::transform::TransformSystems;
use leafwing_input_manager::prelude::ActionState;
use locomotion::math;
use locomotion::{
    AudioCue, AudioSink, CameraSink, DynamicBody, FirstPersonActor, ForceAccumulation,
    FrameReport, KinematicSweep, LabelUpdate, LocomotionConfig, LookAtProbe, Orientation,
    RapierDynamicsWorld, RapierQueryWorld, TickReport,
};

use crate::audio::PlayCue;
use crate::convert::{to_bevy, to_bevy_quat, to_na};
use crate::cursor::CursorChanged;
use crate::input::{ActionInput, PlayerAction};
use crate::world::level;

/// Path of a JSON file overriding any subset of [`LocomotionConfig`].
const CONFIG_ENV: &str = "LOCOMOTION_CONFIG";
/// `kinematic` (default) or `dynamic`.
const STRATEGY_ENV: &str = "LOCOMOTION_STRATEGY";

const SPAWN_XZ: Vec2 = Vec2::new(0.0, 4.0);

pub(super) fn plugin(app: &mut App) {
    app.add_message::<LookAtChanged>();
    app.init_resource::<CameraState>();
    app.init_resource::<LastTick>();

    app.add_systems(Startup, spawn_player);
    app.add_systems(
        Update,
        (frame_update, look_at)
            .chain()
            .run_if(resource_exists::<Locomotion>),
    );
    app.add_systems(
        FixedUpdate,
        fixed_update.run_if(resource_exists::<Locomotion>),
    );
    app.add_systems(
        PostUpdate,
        sync_transform
            .before(TransformSystems::Propagate)
            .run_if(resource_exists::<Locomotion>),
    );
}

#[derive(Component)]
pub struct Player;

/// Latest camera pose requested by the core, applied by the camera plugin.
#[derive(Resource, Clone, Copy, Debug)]
pub struct CameraState {
    pub local_position: Vec3,
    pub local_rotation: Quat,
    pub fov_deg: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        let config = LocomotionConfig::default();
        Self {
            local_position: Vec3::new(0.0, config.head_bob.eye_height, 0.0),
            local_rotation: Quat::IDENTITY,
            fov_deg: config.fov_kick.base_fov_deg,
        }
    }
}

/// Last fixed tick, for overlays.
#[derive(Resource, Default)]
pub struct LastTick(pub Option<TickReport>);

/// The crosshair label changed.
#[derive(Message, Clone, Debug)]
pub struct LookAtChanged(pub LabelUpdate);

enum Driver {
    Kinematic {
        world: RapierQueryWorld,
        actor: FirstPersonActor<KinematicSweep<RapierQueryWorld>>,
    },
    Dynamic {
        world: RapierDynamicsWorld,
        actor: FirstPersonActor<ForceAccumulation<RapierDynamicsWorld>>,
    },
}

#[derive(Resource)]
pub struct Locomotion {
    driver: Driver,
    probe: LookAtProbe,
}

impl Locomotion {
    pub fn config(&self) -> &LocomotionConfig {
        match &self.driver {
            Driver::Kinematic { actor, .. } => actor.config(),
            Driver::Dynamic { actor, .. } => actor.config(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        match &self.driver {
            Driver::Kinematic { actor, .. } => actor.orientation(),
            Driver::Dynamic { actor, .. } => actor.orientation(),
        }
    }

    pub fn position(&self) -> math::Vec3 {
        match &self.driver {
            Driver::Kinematic { actor, .. } => actor.actor().position,
            Driver::Dynamic { world, .. } => world.position(),
        }
    }

    pub fn cursor_locked(&self) -> bool {
        let cursor = match &self.driver {
            Driver::Kinematic { actor, .. } => actor.cursor(),
            Driver::Dynamic { actor, .. } => actor.cursor(),
        };
        cursor == locomotion::CursorState::Locked
    }

    fn frame_update(&mut self, input: &ActionInput, dt: f32, time_scale: f32) -> FrameReport {
        match &mut self.driver {
            Driver::Kinematic { world, actor } => actor.frame_update(world, input, dt, time_scale),
            Driver::Dynamic { world, actor } => actor.frame_update(world, input, dt, time_scale),
        }
    }

    fn fixed_update(
        &mut self,
        dt: f32,
        audio: &mut CueBuffer,
        camera: &mut CameraTarget<'_>,
    ) -> TickReport {
        match &mut self.driver {
            Driver::Kinematic { world, actor } => actor.fixed_update(world, dt, audio, camera),
            Driver::Dynamic { world, actor } => {
                let report = actor.fixed_update(world, dt, audio, camera);
                world.step(dt);
                report
            }
        }
    }

    fn look_at(&mut self, origin: math::Vec3, direction: math::Vec3) -> Option<LabelUpdate> {
        match &self.driver {
            Driver::Kinematic { world, .. } => self.probe.update(world, origin, direction),
            Driver::Dynamic { world, .. } => self.probe.update(world, origin, direction),
        }
    }
}

/// Cues emitted during one tick, forwarded as messages afterwards.
#[derive(Default)]
struct CueBuffer(Vec<PlayCue>);

impl AudioSink for CueBuffer {
    fn play(&mut self, cue: AudioCue) {
        self.0.push(PlayCue {
            cue,
            one_shot: false,
        });
    }

    fn play_one_shot(&mut self, cue: AudioCue) {
        self.0.push(PlayCue {
            cue,
            one_shot: true,
        });
    }
}

struct CameraTarget<'a>(&'a mut CameraState);

impl CameraSink for CameraTarget<'_> {
    fn set_local_position(&mut self, position: math::Vec3) {
        self.0.local_position = to_bevy(&position);
    }

    fn set_field_of_view(&mut self, fov_deg: f32) {
        self.0.fov_deg = fov_deg;
    }
}

fn load_config() -> LocomotionConfig {
    let Ok(path) = env::var(CONFIG_ENV) else {
        return LocomotionConfig::default();
    };
    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| LocomotionConfig::from_json_str(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => {
            info!("loaded locomotion config from {path}");
            config
        }
        Err(err) => {
            warn!("ignoring {CONFIG_ENV}={path}: {err}");
            LocomotionConfig::default()
        }
    }
}

fn spawn_player(mut commands: Commands) {
    let config = load_config();
    let spawn = math::Vec3::new(SPAWN_XZ.x, config.capsule.half_extent() + 0.05, SPAWN_XZ.y);
    let orientation = Orientation::default();
    let reach = config.interaction.reach;

    let driver = match env::var(STRATEGY_ENV).as_deref() {
        Ok("dynamic") => {
            let world =
                RapierDynamicsWorld::build(level(), config.capsule, &config.dynamics, spawn);
            let strategy = ForceAccumulation::new(config.dynamics, config.movement.jump_force);
            FirstPersonActor::new(config, strategy, &world, orientation)
                .map(|actor| Driver::Dynamic { world, actor })
        }
        _ => {
            let world = RapierQueryWorld::build(level(), config.capsule);
            let strategy = KinematicSweep::new(spawn, &config.movement, config.kinematic);
            FirstPersonActor::new(config, strategy, &world, orientation)
                .map(|actor| Driver::Kinematic { world, actor })
        }
    };

    let driver = match driver {
        Ok(driver) => driver,
        Err(err) => {
            error!("could not create the player: {err}");
            return;
        }
    };

    commands.spawn((
        Name::new("Player"),
        Player,
        Transform::from_translation(to_bevy(&spawn)),
        Visibility::default(),
    ));
    commands.insert_resource(Locomotion {
        driver,
        probe: LookAtProbe::new(reach),
    });
}

fn frame_update(
    mut locomotion: ResMut<Locomotion>,
    mut camera: ResMut<CameraState>,
    mut cursor_changed: MessageWriter<CursorChanged>,
    actions: Res<ActionState<PlayerAction>>,
    time: Res<Time<Virtual>>,
) {
    let time_scale = if time.is_paused() {
        0.0
    } else {
        time.relative_speed()
    };
    let report = locomotion.frame_update(&ActionInput(&actions), time.delta_secs(), time_scale);

    camera.local_rotation = to_bevy_quat(&report.orientation.camera_local_rotation());
    if let Some(state) = report.cursor {
        cursor_changed.write(CursorChanged(state));
    }
}

fn fixed_update(
    mut locomotion: ResMut<Locomotion>,
    mut camera: ResMut<CameraState>,
    mut last_tick: ResMut<LastTick>,
    mut cues: MessageWriter<PlayCue>,
    time: Res<Time>,
) {
    let mut audio = CueBuffer::default();
    let report = locomotion.fixed_update(
        time.delta_secs(),
        &mut audio,
        &mut CameraTarget(&mut *camera),
    );
    cues.write_batch(audio.0);

    if report.transitions.any() {
        debug!("{:?} {:?}", report.state, report.transitions);
    }
    last_tick.0 = Some(report);
}

fn look_at(
    mut locomotion: ResMut<Locomotion>,
    camera: Res<CameraState>,
    mut changed: MessageWriter<LookAtChanged>,
) {
    let orientation = locomotion.orientation();
    let eye = orientation.body_rotation() * to_na(camera.local_position);
    let origin = locomotion.position() + eye;
    if let Some(update) = locomotion.look_at(origin, orientation.view_direction()) {
        changed.write(LookAtChanged(update));
    }
}

pub(crate) fn sync_transform(
    locomotion: Res<Locomotion>,
    mut player: Single<&mut Transform, With<Player>>,
) {
    player.translation = to_bevy(&locomotion.position());
    player.rotation = to_bevy_quat(&locomotion.orientation().body_rotation());
}
