use thiserror::Error;

/// Configuration problems detected when an actor (or one of its parts) is built.
///
/// These are the only failures the locomotion core reports. Everything that can go wrong at
/// runtime (no ground, zero input, steep normals, paused time) degrades silently instead.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("footstep cue pool is empty")]
    EmptyCuePool,

    #[error("slope curve needs at least two keyframes, got {0}")]
    TooFewKeyframes(usize),

    #[error("slope curve keyframes must be strictly ascending in angle (keyframe {index})")]
    UnorderedKeyframes { index: usize },

    #[error("slope curve multiplier rises between {from_deg}° and {to_deg}°")]
    RisingSlopeCurve { from_deg: f32, to_deg: f32 },

    #[error("slope curve multiplier {value} at {angle_deg}° is outside 0..=1")]
    MultiplierOutOfRange { angle_deg: f32, value: f32 },

    #[error("`{name}` must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("`{name}` must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("invalid locomotion config: {0}")]
    Parse(String),
}

/// Reject non-finite or non-positive values.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Reject values outside the closed range `min..=max` (NaN is always rejected).
pub(crate) fn ensure_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check_rejects_zero_and_nan() {
        assert!(ensure_positive("speed", 1.0).is_ok());
        assert_eq!(
            ensure_positive("speed", 0.0),
            Err(ConfigError::NonPositive {
                name: "speed",
                value: 0.0
            })
        );
        assert!(ensure_positive("speed", f32::NAN).is_err());
        assert!(ensure_positive("speed", f32::INFINITY).is_err());
    }

    #[test]
    fn range_check_is_inclusive() {
        assert!(ensure_range("shell", 0.0, 0.0, 0.99).is_ok());
        assert!(ensure_range("shell", 0.99, 0.0, 0.99).is_ok());
        assert!(ensure_range("shell", 1.0, 0.0, 0.99).is_err());
        assert!(ensure_range("shell", f32::NAN, 0.0, 0.99).is_err());
    }

    #[test]
    fn messages_name_the_offending_setting() {
        let err = ConfigError::NonPositive {
            name: "stride_interval",
            value: -1.0,
        };
        assert!(err.to_string().contains("stride_interval"));
    }
}
