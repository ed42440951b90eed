use bevy::prelude::*;
use locomotion::AudioCue;

use crate::player::Locomotion;

/// A cue picked by the core.
#[derive(Message, Clone, Copy, Debug)]
pub struct PlayCue {
    pub cue: AudioCue,
    /// Layered over the current clip instead of replacing it.
    pub one_shot: bool,
}

#[derive(Resource)]
struct CueAssets {
    footsteps: Vec<Handle<AudioSource>>,
    jump: Handle<AudioSource>,
    land: Handle<AudioSource>,
}

/// The actor's own source; `play` replaces whatever it is playing.
#[derive(Component)]
struct ActorVoice;

pub(super) fn plugin(app: &mut App) {
    app.add_message::<PlayCue>();
    app.add_systems(
        PostStartup,
        load_cue_assets.run_if(resource_exists::<Locomotion>),
    );
    app.add_systems(Update, play_cues.run_if(resource_exists::<CueAssets>));
}

fn load_cue_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    locomotion: Res<Locomotion>,
) {
    let footsteps = locomotion
        .config()
        .footsteps
        .cues
        .iter()
        .map(|id| asset_server.load(format!("audio/footstep_{}.ogg", id.0)))
        .collect();
    commands.insert_resource(CueAssets {
        footsteps,
        jump: asset_server.load("audio/jump.ogg"),
        land: asset_server.load("audio/land.ogg"),
    });
}

impl CueAssets {
    fn handle(&self, cue: AudioCue, pool: &[locomotion::CueId]) -> Option<Handle<AudioSource>> {
        match cue {
            AudioCue::Footstep(id) => {
                let slot = pool.iter().position(|c| *c == id)?;
                self.footsteps.get(slot).cloned()
            }
            AudioCue::Jump => Some(self.jump.clone()),
            AudioCue::Land => Some(self.land.clone()),
        }
    }
}

fn play_cues(
    mut commands: Commands,
    mut messages: MessageReader<PlayCue>,
    assets: Res<CueAssets>,
    locomotion: Res<Locomotion>,
    voice: Query<Entity, With<ActorVoice>>,
) {
    let pool = &locomotion.config().footsteps.cues;
    for PlayCue { cue, one_shot } in messages.read() {
        let Some(handle) = assets.handle(*cue, pool) else {
            warn!("no clip for {cue:?}");
            continue;
        };
        if *one_shot {
            commands.spawn((AudioPlayer::new(handle), PlaybackSettings::DESPAWN));
            continue;
        }
        for entity in &voice {
            commands.entity(entity).despawn();
        }
        commands.spawn((ActorVoice, AudioPlayer::new(handle), PlaybackSettings::DESPAWN));
    }
}
