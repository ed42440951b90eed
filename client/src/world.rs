use bevy::prelude::*;
use locomotion::{ColliderShapeDef, WorldStaticDef};
use nalgebra::{UnitQuaternion, Vector3, vector};

use crate::convert::to_bevy_quat;

/// Side length of the rendered floor (the collider is an infinite plane).
const FLOOR_SIZE: f32 = 60.0;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
}

/// Sandbox level: flat floor, a 20° and a 40° ramp, a low step, a labelled crate and a trigger
/// volume the ground probe must ignore.
pub fn level() -> Vec<WorldStaticDef> {
    let ramp = |id: u32, z: f32, angle_deg: f32| {
        WorldStaticDef::new(
            id,
            vector![6.0, 0.0, z],
            ColliderShapeDef::Cuboid {
                half_extents: vector![2.0, 0.1, 4.0],
            },
        )
        .rotated(UnitQuaternion::from_axis_angle(
            &Vector3::x_axis(),
            angle_deg.to_radians(),
        ))
    };

    vec![
        WorldStaticDef::new(
            1,
            vector![0.0, 0.0, 0.0],
            ColliderShapeDef::Plane {
                offset_along_normal: 0.0,
            },
        ),
        ramp(2, -4.0, 20.0),
        ramp(3, -14.0, 40.0),
        WorldStaticDef::new(
            4,
            vector![-6.0, 0.1, -6.0],
            ColliderShapeDef::Cuboid {
                half_extents: vector![2.0, 0.1, 2.0],
            },
        ),
        WorldStaticDef::new(
            5,
            vector![0.0, 0.5, -8.0],
            ColliderShapeDef::Cuboid {
                half_extents: vector![0.5, 0.5, 0.5],
            },
        )
        .labelled("Supply Crate"),
        WorldStaticDef::new(
            6,
            vector![-6.0, 1.0, 4.0],
            ColliderShapeDef::Cuboid {
                half_extents: vector![2.0, 1.0, 2.0],
            },
        )
        .sensor(),
    ]
}

fn mesh_for(shape: &ColliderShapeDef) -> Mesh {
    match shape {
        ColliderShapeDef::Plane { .. } => Plane3d::default()
            .mesh()
            .size(FLOOR_SIZE, FLOOR_SIZE)
            .build(),
        ColliderShapeDef::Cuboid { half_extents } => {
            Cuboid::new(half_extents.x * 2.0, half_extents.y * 2.0, half_extents.z * 2.0).into()
        }
        ColliderShapeDef::Sphere { radius } => Sphere::new(*radius).into(),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => Capsule3d::new(*radius, *half_height * 2.0).into(),
    }
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let solid = materials.add(StandardMaterial {
        base_color: Color::linear_rgb(0.2, 0.3, 0.25),
        perceptual_roughness: 1.0,
        metallic: 0.0,
        ..default()
    });
    let labelled = materials.add(Color::srgb_u8(124, 144, 255));
    let trigger = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 0.8, 0.2, 0.25),
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    let defs = level();
    for def in &defs {
        let material = if def.sensor {
            trigger.clone()
        } else if def.label.is_some() {
            labelled.clone()
        } else {
            solid.clone()
        };
        let t = def.translation;
        commands.spawn((
            Name::new(format!("level collider {}", def.id)),
            Transform::from_xyz(t.x, t.y, t.z).with_rotation(to_bevy_quat(&def.rotation)),
            Mesh3d(meshes.add(mesh_for(&def.shape))),
            MeshMaterial3d(material),
        ));
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!("level spawned: {} colliders", defs.len());
}
