//! nalgebra <-> Bevy math.

use bevy::prelude::{Quat, Vec2, Vec3};
use locomotion::math;

#[inline]
pub fn to_bevy(v: &math::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_bevy_quat(q: &math::Quat) -> Quat {
    let c = q.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

#[inline]
pub fn to_na(v: Vec3) -> math::Vec3 {
    math::Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_na2(v: Vec2) -> math::Vec2 {
    math::Vec2::new(v.x, v.y)
}
