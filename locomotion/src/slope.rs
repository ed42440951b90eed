//! Slope-aware speed scaling.
//!
//! The angle between the contact normal and world up is looked up in a piecewise-linear
//! curve of `(angle_deg, multiplier)` keyframes. The curve is validated once when it is built
//! (or deserialized), so evaluation never fails.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::{Vec3, angle_from_up_deg};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub angle_deg: f32,
    pub multiplier: f32,
}

impl Keyframe {
    pub const fn new(angle_deg: f32, multiplier: f32) -> Self {
        Self {
            angle_deg,
            multiplier,
        }
    }
}

/// Validated angle → multiplier curve.
///
/// Invariants
/// - At least two keyframes, strictly ascending in angle.
/// - Every multiplier is within `0..=1`.
/// - Over `0°..=90°` the multiplier never increases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct SlopeCurve {
    keys: Vec<Keyframe>,
}

impl Default for SlopeCurve {
    /// Full speed on flat ground and downhill, linearly down to zero on a vertical wall.
    fn default() -> Self {
        Self {
            keys: vec![
                Keyframe::new(-90.0, 1.0),
                Keyframe::new(0.0, 1.0),
                Keyframe::new(90.0, 0.0),
            ],
        }
    }
}

impl SlopeCurve {
    pub fn new(keys: Vec<Keyframe>) -> Result<Self, ConfigError> {
        if keys.len() < 2 {
            return Err(ConfigError::TooFewKeyframes(keys.len()));
        }

        for (index, key) in keys.iter().enumerate() {
            if !(0.0..=1.0).contains(&key.multiplier) {
                return Err(ConfigError::MultiplierOutOfRange {
                    angle_deg: key.angle_deg,
                    value: key.multiplier,
                });
            }
            if !key.angle_deg.is_finite() {
                return Err(ConfigError::UnorderedKeyframes { index });
            }
        }

        for (i, pair) in keys.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            if b.angle_deg <= a.angle_deg {
                return Err(ConfigError::UnorderedKeyframes { index: i + 1 });
            }
            // Only segments reaching into positive angles are constrained. Linear segments
            // make the endpoint check sufficient.
            if b.angle_deg > 0.0 && b.multiplier > a.multiplier {
                return Err(ConfigError::RisingSlopeCurve {
                    from_deg: a.angle_deg,
                    to_deg: b.angle_deg,
                });
            }
        }

        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Piecewise-linear evaluation, clamped to the first and last keyframe.
    pub fn evaluate(&self, angle_deg: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if angle_deg.is_nan() || angle_deg <= first.angle_deg {
            return first.multiplier;
        }
        if angle_deg >= last.angle_deg {
            return last.multiplier;
        }

        // First key strictly above the angle; bounded by the checks above.
        let upper = self.keys.partition_point(|k| k.angle_deg <= angle_deg);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        let t = (angle_deg - a.angle_deg) / (b.angle_deg - a.angle_deg);
        a.multiplier + (b.multiplier - a.multiplier) * t
    }
}

impl TryFrom<Vec<Keyframe>> for SlopeCurve {
    type Error = ConfigError;

    fn try_from(keys: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<SlopeCurve> for Vec<Keyframe> {
    fn from(curve: SlopeCurve) -> Self {
        curve.keys
    }
}

/// Maps a contact normal to a speed multiplier.
#[derive(Clone, Debug, Default)]
pub struct SlopeModel {
    curve: SlopeCurve,
}

impl SlopeModel {
    pub fn new(curve: SlopeCurve) -> Self {
        Self { curve }
    }

    /// Speed multiplier in `0..=1` for a surface with the given normal.
    #[inline]
    pub fn multiplier(&self, contact_normal: &Vec3) -> f32 {
        self.curve.evaluate(angle_from_up_deg(contact_normal))
    }

    pub fn curve(&self) -> &SlopeCurve {
        &self.curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn normal_at(angle_deg: f32) -> Vec3 {
        let (s, c) = angle_deg.to_radians().sin_cos();
        Vec3::new(0.0, c, s)
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(45.0, 0.5)]
    #[case(90.0, 0.0)]
    #[case(-45.0, 1.0)]
    #[case(-200.0, 1.0)]
    #[case(200.0, 0.0)]
    fn default_curve_evaluates(#[case] angle: f32, #[case] expected: f32) {
        assert_relative_eq!(SlopeCurve::default().evaluate(angle), expected, epsilon = 1.0e-5);
    }

    #[test]
    fn multiplier_never_increases_with_steepness() {
        let model = SlopeModel::default();
        let mut previous = model.multiplier(&normal_at(0.0));
        for step in 1..=900 {
            let m = model.multiplier(&normal_at(step as f32 * 0.1));
            assert!(m <= previous + 1.0e-6, "rose at {}°", step as f32 * 0.1);
            previous = m;
        }
    }

    #[test]
    fn flat_ground_is_full_speed() {
        assert_relative_eq!(SlopeModel::default().multiplier(&Vec3::y()), 1.0);
    }

    #[test]
    fn inverted_curve_is_rejected() {
        let err = SlopeCurve::new(vec![Keyframe::new(0.0, 0.2), Keyframe::new(90.0, 1.0)]);
        assert!(matches!(err, Err(ConfigError::RisingSlopeCurve { .. })));
    }

    #[test]
    fn negative_angles_are_unconstrained() {
        let curve = SlopeCurve::new(vec![
            Keyframe::new(-90.0, 0.5),
            Keyframe::new(0.0, 1.0),
            Keyframe::new(90.0, 0.0),
        ]);
        assert!(curve.is_ok());
    }

    #[test]
    fn keys_must_ascend() {
        let err = SlopeCurve::new(vec![Keyframe::new(10.0, 1.0), Keyframe::new(10.0, 0.5)]);
        assert_eq!(err, Err(ConfigError::UnorderedKeyframes { index: 1 }));
        assert_eq!(
            SlopeCurve::new(vec![Keyframe::new(0.0, 1.0)]),
            Err(ConfigError::TooFewKeyframes(1))
        );
    }

    #[test]
    fn deserializing_validates() {
        let ok: Result<SlopeCurve, _> =
            serde_json::from_str(r#"[{"angle_deg":0,"multiplier":1},{"angle_deg":60,"multiplier":0}]"#);
        assert!(ok.is_ok());
        let bad: Result<SlopeCurve, _> =
            serde_json::from_str(r#"[{"angle_deg":0,"multiplier":1.5},{"angle_deg":60,"multiplier":0}]"#);
        assert!(bad.is_err());
    }
}
