use bevy::{
    camera::Exposure,
    pbr::{AtmosphereMode, AtmosphereSettings},
    prelude::*,
    transform::TransformSystems,
};

use crate::player::{CameraState, Player, sync_transform};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(
        PostUpdate,
        follow_player
            .after(sync_transform)
            .before(TransformSystems::Propagate),
    );
}

fn add_camera(mut commands: Commands, state: Res<CameraState>) {
    commands.spawn((
        Exposure { ev100: 16.0 },
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: state.fov_deg.to_radians(),
            ..default()
        }),
        Transform::from_translation(state.local_position),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                1000.0, // Fog distance
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
        AtmosphereSettings {
            rendering_method: AtmosphereMode::Raymarched,
            ..default()
        },
    ));
}

/// Place the eye on the player: body yaw, then the core's local offset and pitch.
fn follow_player(
    mut camera: Single<(&mut Transform, &mut Projection), With<Camera3d>>,
    player: Single<&Transform, (With<Player>, Without<Camera3d>)>,
    state: Res<CameraState>,
) {
    let (transform, projection) = &mut *camera;

    transform.translation = player.transform_point(state.local_position);
    transform.rotation = player.rotation * state.local_rotation;

    if let Projection::Perspective(perspective) = &mut **projection {
        let fov = state.fov_deg.to_radians();
        if perspective.fov != fov {
            perspective.fov = fov;
        }
    }
}
