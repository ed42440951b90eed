//! Ground classification beneath the actor.
//!
//! A sphere slightly smaller than (or equal to) the capsule radius is cast straight down from
//! the capsule center. The cast starts at the center of the capsule and has to travel the
//! cylinder half-length before the sphere reaches the capsule's bottom hemisphere, so the
//! distance is `cast_height + ground_check_distance`.

use crate::math::{Vec3, angle_from_up_deg, project_on_plane, up};
use crate::settings::{CapsuleSpec, GroundSettings};

/// Whether scene queries should report trigger volumes (sensors).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryTriggers {
    Ignore,
    Collide,
}

/// First surface found by a sphere cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastHit {
    /// World-space surface normal at the impact point.
    pub normal: Vec3,
    /// Distance travelled by the sphere center before impact.
    pub distance: f32,
}

/// Physics-world collaborator: read-only sphere casts.
pub trait SphereCaster {
    /// Cast a sphere of `radius` from `origin` along the unit vector `direction`.
    ///
    /// Returns the earliest hit within `max_distance`, or `None`.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        triggers: QueryTriggers,
    ) -> Option<CastHit>;
}

/// Ground contact for one fixed tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactInfo {
    pub hit: bool,
    /// Surface normal; world up when there is no contact.
    pub normal: Vec3,
    /// Cast distance to the surface; the full probe length when there is no contact.
    pub distance: f32,
}

impl ContactInfo {
    pub fn none(probe_length: f32) -> Self {
        Self {
            hit: false,
            normal: up(),
            distance: probe_length,
        }
    }

    /// Surface steepness in degrees (0 without contact).
    #[inline]
    pub fn angle_deg(&self) -> f32 {
        angle_from_up_deg(&self.normal)
    }
}

/// Downward sphere cast from `position`.
///
/// The sphere radius is `radius * (1 - shell_offset)`; a positive shell offset keeps the probe
/// from touching walls beside the actor. Trigger volumes are ignored.
pub fn sense(
    world: &impl SphereCaster,
    position: Vec3,
    radius: f32,
    cast_height: f32,
    shell_offset: f32,
    ground_check_distance: f32,
) -> ContactInfo {
    let probe_radius = radius * (1.0 - shell_offset);
    let probe_length = cast_height + ground_check_distance;

    match world.sphere_cast(
        position,
        probe_radius,
        -up(),
        probe_length,
        QueryTriggers::Ignore,
    ) {
        Some(hit) => ContactInfo {
            hit: true,
            normal: hit.normal.try_normalize(1.0e-6).unwrap_or_else(up),
            distance: hit.distance,
        },
        None => ContactInfo::none(probe_length),
    }
}

/// Ground probe configured for one capsule.
#[derive(Clone, Copy, Debug)]
pub struct GroundSensor {
    capsule: CapsuleSpec,
    settings: GroundSettings,
}

impl GroundSensor {
    pub fn new(capsule: CapsuleSpec, settings: GroundSettings) -> Self {
        Self { capsule, settings }
    }

    pub fn capsule(&self) -> &CapsuleSpec {
        &self.capsule
    }

    pub fn settings(&self) -> &GroundSettings {
        &self.settings
    }

    /// Contact state beneath a capsule centered at `position`.
    pub fn sense(&self, world: &impl SphereCaster, position: Vec3) -> ContactInfo {
        sense(
            world,
            position,
            self.capsule.radius,
            self.capsule.half_height(),
            self.settings.shell_offset,
            self.settings.ground_check_distance,
        )
    }

    /// Reproject `velocity` onto a nearby floor so the actor follows it down small steps.
    ///
    /// Probes `stick_helper_distance` below the capsule. Returns `None` when nothing is in
    /// reach or the surface is at least `max_stick_angle_deg` steep; steep faces are left alone.
    pub fn stick_to_ground(
        &self,
        world: &impl SphereCaster,
        position: Vec3,
        velocity: &Vec3,
    ) -> Option<Vec3> {
        let hit = world.sphere_cast(
            position,
            self.capsule.radius * (1.0 - self.settings.shell_offset),
            -up(),
            self.capsule.half_height() + self.settings.stick_helper_distance,
            QueryTriggers::Ignore,
        )?;

        if angle_from_up_deg(&hit.normal) >= self.settings.max_stick_angle_deg {
            return None;
        }
        Some(project_on_plane(velocity, &hit.normal))
    }
}
