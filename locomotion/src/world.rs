//! Rapier-backed physics collaborators.
//!
//! - [`RapierQueryWorld`]: immutable level geometry for the kinematic strategy. Answers sphere
//!   casts and sweeps the actor capsule with Rapier's `KinematicCharacterController`.
//! - [`RapierDynamicsWorld`]: the same level plus one rotation-locked capsule body stepped by
//!   Rapier's `PhysicsPipeline`, for the force-accumulation strategy.
//!
//! Level geometry is described with [`WorldStaticDef`]s. Inserting them sorted by `id` makes
//! two worlds built from the same list identical.

use std::collections::HashMap;

use rapier3d::control::{CharacterLength, KinematicCharacterController};
use rapier3d::na::{Translation3, UnitQuaternion};
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;

use crate::ground::{CastHit, QueryTriggers, SphereCaster};
use crate::interaction::{Interactable, InteractableLookup};
use crate::math::{EPSILON, Vec3, up};
use crate::motion::{DynamicBody, KinematicMover};
use crate::settings::{CapsuleSpec, DynamicsSettings, GRAVITY_MPS2};

/// Gap the character controller keeps between the capsule and the level (meters).
pub const CONTROLLER_OFFSET: f32 = 0.01;

/// Definition of one immutable level collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - Planes are half-spaces whose normal is `rotation * +Y`, shifted by `offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier; also stored as the collider's user data.
    pub id: u32,
    pub translation: Vector<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub shape: ColliderShapeDef,
    /// Trigger volume: reported by queries only when asked for.
    pub sensor: bool,
    /// Name shown by the look-at probe. Only labelled colliders are interactable.
    pub label: Option<String>,
}

impl WorldStaticDef {
    pub fn new(id: u32, translation: Vector<f32>, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
            sensor: false,
            label: None,
        }
    }

    pub fn rotated(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn pose(&self) -> Isometry<f32> {
        Isometry::from_parts(Translation3::from(self.translation), self.rotation)
    }
}

#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space).
    Plane { offset_along_normal: f32 },
    Cuboid { half_extents: Vector<f32> },
    Sphere { radius: f32 },
    /// Y-aligned capsule; `half_height` is the cylinder half-length.
    CapsuleY { radius: f32, half_height: f32 },
}

/// Build a parentless collider placed at the definition's pose.
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let (builder, local_offset) = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => (
            ColliderBuilder::halfspace(Vector::y_axis()),
            Vector::y() * *offset_along_normal,
        ),
        ColliderShapeDef::Cuboid { half_extents } => (
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z),
            Vector::zeros(),
        ),
        ColliderShapeDef::Sphere { radius } => (ColliderBuilder::ball(*radius), Vector::zeros()),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => (
            ColliderBuilder::capsule_y(*half_height, *radius),
            Vector::zeros(),
        ),
    };

    let mut collider = builder
        .sensor(def.sensor)
        .user_data(u128::from(def.id))
        .build();
    collider.set_position(def.pose() * Translation3::from(local_offset));
    collider
}

/// Plain-text label attached to a level collider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldLabel(pub String);

impl Interactable for WorldLabel {
    fn display_name(&self) -> &str {
        &self.0
    }
}

fn insert_statics(
    mut defs: Vec<WorldStaticDef>,
    colliders: &mut ColliderSet,
) -> HashMap<u32, WorldLabel> {
    defs.sort_by_key(|d| d.id);

    let mut labels = HashMap::new();
    for def in defs {
        colliders.insert(collider_from_def(&def));
        if let Some(label) = def.label {
            labels.insert(def.id, WorldLabel(label));
        }
    }
    labels
}

/// Collision detection only (no dynamics): updates the broad phase and the contact graph for
/// everything currently in the sets, so queries can run.
fn detect_collisions(
    broad_phase: &mut BroadPhaseBvh,
    narrow_phase: &mut NarrowPhase,
    bodies: &mut RigidBodySet,
    colliders: &mut ColliderSet,
) {
    CollisionPipeline::new().step(0.0, broad_phase, narrow_phase, bodies, colliders, &(), &());
}

fn query_filter<'a>(triggers: QueryTriggers) -> QueryFilter<'a> {
    match triggers {
        QueryTriggers::Ignore => QueryFilter::default().exclude_sensors(),
        QueryTriggers::Collide => QueryFilter::default(),
    }
}

fn cast_sphere(
    query: &QueryPipeline<'_>,
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    max_distance: f32,
) -> Option<CastHit> {
    let direction = direction.try_normalize(EPSILON)?;
    if radius <= 0.0 || max_distance < 0.0 {
        return None;
    }

    let shape_pos = Isometry::translation(origin.x, origin.y, origin.z);
    let options = ShapeCastOptions::with_max_time_of_impact(max_distance);
    let (_handle, hit) = query.cast_shape(&shape_pos, &direction, &Ball::new(radius), options)?;

    // Unit cast velocity: time of impact is the travelled distance.
    let normal = hit.normal1.into_inner();
    Some(CastHit {
        normal: if normal.norm_squared() > EPSILON {
            normal
        } else {
            up()
        },
        distance: hit.time_of_impact,
    })
}

fn labelled_along<'a>(
    query: &QueryPipeline<'_>,
    colliders: &ColliderSet,
    labels: &'a HashMap<u32, WorldLabel>,
    origin: Vec3,
    direction: Vec3,
    reach: f32,
) -> Option<&'a WorldLabel> {
    let direction = direction.try_normalize(EPSILON)?;
    let ray = Ray::new(Point::from(origin), direction);
    let (handle, _toi) = query.cast_ray(&ray, reach, true)?;
    let id = u32::try_from(colliders.get(handle)?.user_data).ok()?;
    labels.get(&id)
}

/// Static level for scene queries and the kinematic character controller.
pub struct RapierQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    labels: HashMap<u32, WorldLabel>,
    capsule: CapsuleSpec,
    controller: KinematicCharacterController,
}

impl RapierQueryWorld {
    /// Build the level; `capsule` is the shape swept by [`KinematicMover::sweep`].
    pub fn build(defs: Vec<WorldStaticDef>, capsule: CapsuleSpec) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let labels = insert_statics(defs, &mut colliders);

        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        detect_collisions(&mut broad_phase, &mut narrow_phase, &mut bodies, &mut colliders);

        let controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(CONTROLLER_OFFSET),
            // Ground following is owned by the locomotion state (stick-to-ground speed).
            snap_to_ground: None,
            ..KinematicCharacterController::default()
        };

        log::info!(
            "query world built: {} colliders, {} labelled",
            colliders.len(),
            labels.len()
        );

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
            labels,
            capsule,
            controller,
        }
    }

    /// Borrowed query view over the level.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    pub fn capsule(&self) -> &CapsuleSpec {
        &self.capsule
    }
}

impl SphereCaster for RapierQueryWorld {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        triggers: QueryTriggers,
    ) -> Option<CastHit> {
        let query = self.query_pipeline(query_filter(triggers));
        cast_sphere(&query, origin, radius, direction, max_distance)
    }
}

impl KinematicMover for RapierQueryWorld {
    fn sweep(&self, position: Vec3, translation: Vec3, dt: f32) -> Vec3 {
        let query = self.query_pipeline(QueryFilter::default().exclude_sensors());
        let corrected = self.controller.move_shape(
            dt,
            &query,
            &Capsule::new_y(self.capsule.half_height(), self.capsule.radius),
            &Isometry::translation(position.x, position.y, position.z),
            translation,
            |_| {},
        );
        corrected.translation
    }
}

impl InteractableLookup for RapierQueryWorld {
    fn interactable_along(
        &self,
        origin: Vec3,
        direction: Vec3,
        reach: f32,
    ) -> Option<&dyn Interactable> {
        let query = self.query_pipeline(QueryFilter::default().exclude_sensors());
        labelled_along(&query, &self.colliders, &self.labels, origin, direction, reach)
            .map(|label| label as &dyn Interactable)
    }
}

/// Static level plus the actor's dynamic capsule body.
pub struct RapierDynamicsWorld {
    gravity: Vector<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    labels: HashMap<u32, WorldLabel>,
    body: RigidBodyHandle,
}

impl RapierDynamicsWorld {
    /// Build the level and spawn the actor body with its center at `spawn`.
    ///
    /// The capsule collider is frictionless; the body's linear damping is driven by the
    /// strategy (drag).
    pub fn build(
        defs: Vec<WorldStaticDef>,
        capsule: CapsuleSpec,
        settings: &DynamicsSettings,
        spawn: Vec3,
    ) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let labels = insert_statics(defs, &mut colliders);

        // Queries must see the level before the first step. The actor body goes in after this
        // pass so that the first physics step registers it.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        detect_collisions(&mut broad_phase, &mut narrow_phase, &mut bodies, &mut colliders);

        let rb = RigidBodyBuilder::dynamic()
            .translation(spawn)
            .lock_rotations()
            .linear_damping(settings.grounded_drag)
            .ccd_enabled(true)
            .build();
        let body = bodies.insert(rb);
        let collider = ColliderBuilder::capsule_y(capsule.half_height(), capsule.radius)
            .mass(settings.mass)
            .friction(0.0)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .build();
        colliders.insert_with_parent(collider, body, &mut bodies);

        log::info!(
            "dynamics world built: {} colliders, body mass {:.1} kg",
            colliders.len(),
            settings.mass
        );

        Self {
            gravity: vector![0.0, -GRAVITY_MPS2, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase,
            narrow_phase,
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            labels,
            body,
        }
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if dt <= EPSILON {
            return;
        }
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Borrowed query view that never reports the actor's own body.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter.exclude_rigid_body(self.body),
        )
    }

    pub fn is_sleeping(&self) -> bool {
        self.bodies
            .get(self.body)
            .is_some_and(|rb| rb.is_sleeping())
    }

    fn with_body(&mut self, f: impl FnOnce(&mut RigidBody)) {
        if let Some(rb) = self.bodies.get_mut(self.body) {
            f(rb);
        }
    }
}

impl SphereCaster for RapierDynamicsWorld {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        triggers: QueryTriggers,
    ) -> Option<CastHit> {
        let query = self.query_pipeline(query_filter(triggers));
        cast_sphere(&query, origin, radius, direction, max_distance)
    }
}

impl DynamicBody for RapierDynamicsWorld {
    fn position(&self) -> Vec3 {
        self.bodies
            .get(self.body)
            .map(|rb| *rb.translation())
            .unwrap_or_else(Vec3::zeros)
    }

    fn velocity(&self) -> Vec3 {
        self.bodies
            .get(self.body)
            .map(|rb| *rb.linvel())
            .unwrap_or_else(Vec3::zeros)
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.with_body(|rb| rb.set_linvel(velocity, true));
    }

    fn set_drag(&mut self, drag: f32) {
        self.with_body(|rb| rb.set_linear_damping(drag));
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.with_body(|rb| rb.apply_impulse(impulse, true));
    }

    fn sleep(&mut self) {
        self.with_body(|rb| rb.sleep());
    }
}

impl InteractableLookup for RapierDynamicsWorld {
    fn interactable_along(
        &self,
        origin: Vec3,
        direction: Vec3,
        reach: f32,
    ) -> Option<&dyn Interactable> {
        let query = self.query_pipeline(QueryFilter::default().exclude_sensors());
        labelled_along(&query, &self.colliders, &self.labels, origin, direction, reach)
            .map(|label| label as &dyn Interactable)
    }
}
