//! Small vector helpers shared by the locomotion subsystems.
//!
//! Conventions
//! - Right-handed, Y up, the default forward is `-Z`.
//! - Yaw is a clockwise heading in degrees when seen from above (0 = `-Z`, 90 = `+X`).
//! - Positive pitch looks up.

use nalgebra as na;

pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// Threshold for "effectively zero" input axes, speeds, and normals.
pub const EPSILON: f32 = 1.0e-6;

#[inline]
pub fn up() -> Vec3 {
    Vec3::y()
}

#[inline]
pub fn approx_zero(x: f32) -> bool {
    x.abs() <= EPSILON
}

/// `v` with its component along `normal` removed. A degenerate normal leaves `v` unchanged.
pub fn project_on_plane(v: &Vec3, normal: &Vec3) -> Vec3 {
    let n_sq = normal.norm_squared();
    if n_sq <= EPSILON {
        return *v;
    }
    v - normal * (v.dot(normal) / n_sq)
}

#[inline]
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    v.try_normalize(EPSILON).unwrap_or_else(Vec3::zeros)
}

/// Angle between `normal` and world up, in degrees (0 = flat floor, 90 = wall).
pub fn angle_from_up_deg(normal: &Vec3) -> f32 {
    let len = normal.norm();
    if len <= EPSILON {
        return 0.0;
    }
    (normal.y / len).clamp(-1.0, 1.0).acos().to_degrees()
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic ease between 0 and 1 (input clamped).
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fraction of the remaining distance covered by exponential decay over `dt`.
///
/// Frame-rate independent: applying it twice with `dt / 2` covers the same distance as once
/// with `dt`.
#[inline]
pub fn decay_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt.max(0.0)).exp()
}

/// Body rotation for a yaw heading.
#[inline]
pub fn yaw_rotation(yaw_deg: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), -yaw_deg.to_radians())
}

/// Unit forward vector on the ground plane for a yaw heading.
#[inline]
pub fn forward_from_yaw(yaw_deg: f32) -> Vec3 {
    let (s, c) = yaw_deg.to_radians().sin_cos();
    Vec3::new(s, 0.0, -c)
}

/// Unit right vector on the ground plane for a yaw heading.
#[inline]
pub fn right_from_yaw(yaw_deg: f32) -> Vec3 {
    let (s, c) = yaw_deg.to_radians().sin_cos();
    Vec3::new(c, 0.0, s)
}

/// Rotate `v` clockwise (seen from above) about world up.
#[inline]
pub fn rotate_about_up(v: &Vec3, angle_deg: f32) -> Vec3 {
    yaw_rotation(angle_deg) * v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < 1.0e-5
    }

    #[test]
    fn projection_removes_normal_component() {
        let n = Vec3::new(0.0, 1.0, 1.0).normalize();
        let p = project_on_plane(&Vec3::new(0.0, 0.0, -1.0), &n);
        assert!(p.dot(&n).abs() < 1.0e-6);
    }

    #[test]
    fn projection_with_zero_normal_is_identity() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(project_on_plane(&v, &Vec3::zeros()), v);
    }

    #[test]
    fn angle_from_up_matches_geometry() {
        assert!(angle_from_up_deg(&up()).abs() < 1.0e-4);
        assert!((angle_from_up_deg(&Vec3::x()) - 90.0).abs() < 1.0e-4);
        let slope = Vec3::new(0.0, 1.0, 1.0);
        assert!((angle_from_up_deg(&slope) - 45.0).abs() < 1.0e-3);
    }

    #[test]
    fn yaw_axes_follow_the_heading() {
        assert!(close(&forward_from_yaw(0.0), &Vec3::new(0.0, 0.0, -1.0)));
        assert!(close(&forward_from_yaw(90.0), &Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(&right_from_yaw(0.0), &Vec3::new(1.0, 0.0, 0.0)));
        // Body rotation agrees with the helpers.
        let q = yaw_rotation(37.0);
        assert!(close(&(q * Vec3::new(0.0, 0.0, -1.0)), &forward_from_yaw(37.0)));
        assert!(close(&(q * Vec3::x()), &right_from_yaw(37.0)));
    }

    #[test]
    fn decay_factor_is_frame_rate_independent() {
        let once = decay_factor(12.0, 0.1);
        let half = decay_factor(12.0, 0.05);
        let twice = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((once - twice).abs() < 1.0e-6);
        assert_eq!(decay_factor(12.0, 0.0), 0.0);
    }

    #[test]
    fn smoothstep_clamps() {
        assert_eq!(smoothstep(-1.0), 0.0);
        assert_eq!(smoothstep(2.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1.0e-6);
    }
}
