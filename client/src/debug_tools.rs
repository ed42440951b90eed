//! Debug/performance tooling for native dev builds.
//!
//! This plugin is compiled/used only when the caller gates it behind `dev_native`
//! (recommended: `#[cfg(feature = "dev_native")] mod debug_tools;` in `main.rs`).

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;

use crate::convert::to_bevy;
use crate::player::{LastTick, Locomotion, Player};

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(
        Update,
        draw_ground_probe.run_if(resource_exists::<Locomotion>),
    );
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

/// Ground probe and contact normal of the last fixed tick.
fn draw_ground_probe(
    mut gizmos: Gizmos,
    locomotion: Res<Locomotion>,
    last_tick: Res<LastTick>,
    player: Single<&Transform, With<Player>>,
) {
    let Some(tick) = last_tick.0 else {
        return;
    };
    let capsule = locomotion.config().capsule;
    let center = player.translation;
    let color = if tick.grounded {
        Color::srgb(0.2, 0.9, 0.3)
    } else {
        Color::srgb(0.9, 0.3, 0.2)
    };

    // Probe sphere where the cast stopped.
    let probe = center - Vec3::Y * tick.contact.distance;
    gizmos.line(center, probe, color);
    gizmos.sphere(Isometry3d::from_translation(probe), capsule.radius, color);

    if tick.contact.hit {
        let foot = probe - Vec3::Y * capsule.radius;
        gizmos.arrow(
            foot,
            foot + to_bevy(&tick.contact.normal),
            Color::srgb(0.3, 0.5, 1.0),
        );
    }
}
