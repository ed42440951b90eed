//! Tunables for every locomotion subsystem.
//!
//! Defaults live in `DEFAULT_*` constants so that both the structs below and callers that only
//! need a single number (e.g. a debug overlay) read the same value. Every struct is
//! `#[serde(default)]`, so a JSON document only has to name the fields it overrides.

use serde::{Deserialize, Serialize};

use crate::audio::CueId;
use crate::error::{ConfigError, ensure_positive, ensure_range};
use crate::slope::SlopeCurve;

/// Standard gravity (m/s²), pointing down the world Y axis.
pub const GRAVITY_MPS2: f32 = 9.81;

// Movement speeds (m/s).
pub const DEFAULT_FORWARD_SPEED: f32 = 8.0;
pub const DEFAULT_BACKWARD_SPEED: f32 = 4.0;
pub const DEFAULT_STRAFE_SPEED: f32 = 4.0;
pub const DEFAULT_RUN_MULTIPLIER: f32 = 2.0;

/// Vertical speed given to the kinematic body on jump (m/s).
pub const DEFAULT_JUMP_SPEED: f32 = 10.0;
/// Upward impulse applied to the dynamic body on jump (N·s).
pub const DEFAULT_JUMP_FORCE: f32 = 30.0;

/// Downward speed used to keep a grounded kinematic body glued to the floor (m/s).
pub const DEFAULT_STICK_TO_GROUND_FORCE: f32 = 10.0;
pub const DEFAULT_GRAVITY_MULTIPLIER: f32 = 2.0;

/// Fraction of the target speed added to the stride cycle while running.
pub const DEFAULT_RUN_STEP_LENGTHEN: f32 = 0.7;

// Capsule (meters).
pub const DEFAULT_CAPSULE_RADIUS: f32 = 0.5;
pub const DEFAULT_CAPSULE_HEIGHT: f32 = 1.8;

/// Extra reach of the ground probe below the capsule bottom (meters).
pub const DEFAULT_GROUND_CHECK_DISTANCE: f32 = 0.05;
/// Fraction of the capsule radius shaved off the probe sphere.
pub const DEFAULT_SHELL_OFFSET: f32 = 0.0;
/// Reach of the stick-to-ground helper below the capsule bottom (meters).
pub const DEFAULT_STICK_HELPER_DISTANCE: f32 = 0.5;
/// Surfaces steeper than this are not stuck to by the helper (degrees).
pub const DEFAULT_MAX_STICK_ANGLE_DEG: f32 = 85.0;

pub const DEFAULT_GROUNDED_DRAG: f32 = 5.0;
pub const DEFAULT_BODY_MASS: f32 = 10.0;
/// Below this speed an idle grounded dynamic body is put to sleep (m/s).
pub const DEFAULT_SLEEP_SPEED: f32 = 1.0;

// Look.
pub const DEFAULT_LOOK_SENSITIVITY: f32 = 2.0;
pub const DEFAULT_PITCH_CLAMP_DEG: f32 = 89.0;
pub const DEFAULT_LOOK_SMOOTH_TIME: f32 = 5.0;

// Head bob (meters / ratios).
pub const DEFAULT_BOB_HORIZONTAL_RANGE: f32 = 0.1;
pub const DEFAULT_BOB_VERTICAL_RANGE: f32 = 0.1;
pub const DEFAULT_BOB_VERTICAL_RATIO: f32 = 2.0;
/// Rate at which the bob offset returns to neutral when not moving (1/s).
pub const DEFAULT_BOB_DECAY_RATE: f32 = 12.0;
pub const DEFAULT_EYE_HEIGHT: f32 = 0.8;

/// Stride cycle units between footstep cues.
pub const DEFAULT_STRIDE_INTERVAL: f32 = 5.0;
/// Stride cycle units between a landing and the next footstep cue.
pub const DEFAULT_LAND_STEP_DELAY: f32 = 0.5;

pub const DEFAULT_LANDING_DIP_AMOUNT: f32 = 0.1;
pub const DEFAULT_LANDING_DIP_DURATION: f32 = 0.2;

// Field of view (degrees / seconds).
pub const DEFAULT_BASE_FOV_DEG: f32 = 60.0;
pub const DEFAULT_FOV_INCREASE_DEG: f32 = 3.0;
pub const DEFAULT_FOV_TIME_TO_INCREASE: f32 = 1.0;
pub const DEFAULT_FOV_TIME_TO_DECREASE: f32 = 1.0;

/// Look-at probe reach (meters).
pub const DEFAULT_INTERACTION_REACH: f32 = 2.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    pub forward_speed: f32,
    pub backward_speed: f32,
    pub strafe_speed: f32,
    pub run_multiplier: f32,
    pub jump_speed: f32,
    pub jump_force: f32,
    pub run_step_lengthen: f32,
    /// Whether the player can steer while airborne.
    pub air_control: bool,
    pub slope_curve: SlopeCurve,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            forward_speed: DEFAULT_FORWARD_SPEED,
            backward_speed: DEFAULT_BACKWARD_SPEED,
            strafe_speed: DEFAULT_STRAFE_SPEED,
            run_multiplier: DEFAULT_RUN_MULTIPLIER,
            jump_speed: DEFAULT_JUMP_SPEED,
            jump_force: DEFAULT_JUMP_FORCE,
            run_step_lengthen: DEFAULT_RUN_STEP_LENGTHEN,
            air_control: false,
            slope_curve: SlopeCurve::default(),
        }
    }
}

impl MovementSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("forward_speed", self.forward_speed)?;
        ensure_positive("backward_speed", self.backward_speed)?;
        ensure_positive("strafe_speed", self.strafe_speed)?;
        ensure_positive("run_multiplier", self.run_multiplier)?;
        ensure_positive("jump_speed", self.jump_speed)?;
        ensure_positive("jump_force", self.jump_force)?;
        ensure_range("run_step_lengthen", self.run_step_lengthen, 0.0, 10.0)
    }
}

/// Y-aligned capsule dimensions.
///
/// `height` is the full tip-to-tip height, so the cylinder half-length is
/// `height / 2 - radius`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub height: f32,
}

impl Default for CapsuleSpec {
    fn default() -> Self {
        Self {
            radius: DEFAULT_CAPSULE_RADIUS,
            height: DEFAULT_CAPSULE_HEIGHT,
        }
    }
}

impl CapsuleSpec {
    /// Half-length of the cylindrical section; also the distance from the capsule center to
    /// the center of its bottom hemisphere.
    #[inline]
    pub fn half_height(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }

    /// Distance from the capsule center to its lowest point.
    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.half_height() + self.radius
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("capsule.radius", self.radius)?;
        ensure_positive("capsule.height", self.height)?;
        if self.height < self.radius * 2.0 {
            return Err(ConfigError::OutOfRange {
                name: "capsule.height",
                value: self.height,
                min: self.radius * 2.0,
                max: f32::INFINITY,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundSettings {
    pub ground_check_distance: f32,
    pub shell_offset: f32,
    pub stick_helper_distance: f32,
    pub max_stick_angle_deg: f32,
}

impl Default for GroundSettings {
    fn default() -> Self {
        Self {
            ground_check_distance: DEFAULT_GROUND_CHECK_DISTANCE,
            shell_offset: DEFAULT_SHELL_OFFSET,
            stick_helper_distance: DEFAULT_STICK_HELPER_DISTANCE,
            max_stick_angle_deg: DEFAULT_MAX_STICK_ANGLE_DEG,
        }
    }
}

impl GroundSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("ground.ground_check_distance", self.ground_check_distance)?;
        ensure_range("ground.shell_offset", self.shell_offset, 0.0, 0.99)?;
        ensure_positive("ground.stick_helper_distance", self.stick_helper_distance)?;
        ensure_range("ground.max_stick_angle_deg", self.max_stick_angle_deg, 0.0, 90.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicSettings {
    pub stick_to_ground_force: f32,
    pub gravity_multiplier: f32,
}

impl Default for KinematicSettings {
    fn default() -> Self {
        Self {
            stick_to_ground_force: DEFAULT_STICK_TO_GROUND_FORCE,
            gravity_multiplier: DEFAULT_GRAVITY_MULTIPLIER,
        }
    }
}

impl KinematicSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("kinematic.stick_to_ground_force", self.stick_to_ground_force, 0.0, 1000.0)?;
        ensure_positive("kinematic.gravity_multiplier", self.gravity_multiplier)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsSettings {
    pub grounded_drag: f32,
    pub mass: f32,
    pub sleep_speed: f32,
}

impl Default for DynamicsSettings {
    fn default() -> Self {
        Self {
            grounded_drag: DEFAULT_GROUNDED_DRAG,
            mass: DEFAULT_BODY_MASS,
            sleep_speed: DEFAULT_SLEEP_SPEED,
        }
    }
}

impl DynamicsSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("dynamics.grounded_drag", self.grounded_drag, 0.0, 1000.0)?;
        ensure_positive("dynamics.mass", self.mass)?;
        ensure_range("dynamics.sleep_speed", self.sleep_speed, 0.0, 1000.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookSettings {
    pub x_sensitivity: f32,
    pub y_sensitivity: f32,
    pub pitch_clamp_deg: f32,
    pub smooth: bool,
    pub smooth_time: f32,
    pub lock_cursor: bool,
}

impl Default for LookSettings {
    fn default() -> Self {
        Self {
            x_sensitivity: DEFAULT_LOOK_SENSITIVITY,
            y_sensitivity: DEFAULT_LOOK_SENSITIVITY,
            pitch_clamp_deg: DEFAULT_PITCH_CLAMP_DEG,
            smooth: false,
            smooth_time: DEFAULT_LOOK_SMOOTH_TIME,
            lock_cursor: true,
        }
    }
}

impl LookSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("look.x_sensitivity", self.x_sensitivity)?;
        ensure_positive("look.y_sensitivity", self.y_sensitivity)?;
        ensure_positive("look.pitch_clamp_deg", self.pitch_clamp_deg)?;
        ensure_range("look.pitch_clamp_deg", self.pitch_clamp_deg, 0.0, 90.0)?;
        ensure_positive("look.smooth_time", self.smooth_time)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadBobSettings {
    pub enabled: bool,
    pub horizontal_range: f32,
    pub vertical_range: f32,
    pub vertical_to_horizontal_ratio: f32,
    pub decay_rate: f32,
    /// Neutral camera height above the capsule center (meters).
    pub eye_height: f32,
}

impl Default for HeadBobSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            horizontal_range: DEFAULT_BOB_HORIZONTAL_RANGE,
            vertical_range: DEFAULT_BOB_VERTICAL_RANGE,
            vertical_to_horizontal_ratio: DEFAULT_BOB_VERTICAL_RATIO,
            decay_rate: DEFAULT_BOB_DECAY_RATE,
            eye_height: DEFAULT_EYE_HEIGHT,
        }
    }
}

impl HeadBobSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("head_bob.horizontal_range", self.horizontal_range, 0.0, 10.0)?;
        ensure_range("head_bob.vertical_range", self.vertical_range, 0.0, 10.0)?;
        ensure_positive(
            "head_bob.vertical_to_horizontal_ratio",
            self.vertical_to_horizontal_ratio,
        )?;
        ensure_positive("head_bob.decay_rate", self.decay_rate)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingDipSettings {
    pub amount: f32,
    pub duration: f32,
}

impl Default for LandingDipSettings {
    fn default() -> Self {
        Self {
            amount: DEFAULT_LANDING_DIP_AMOUNT,
            duration: DEFAULT_LANDING_DIP_DURATION,
        }
    }
}

impl LandingDipSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("landing_dip.amount", self.amount, 0.0, 10.0)?;
        ensure_positive("landing_dip.duration", self.duration)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FovKickSettings {
    pub enabled: bool,
    pub base_fov_deg: f32,
    pub increase_deg: f32,
    pub time_to_increase: f32,
    pub time_to_decrease: f32,
}

impl Default for FovKickSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_fov_deg: DEFAULT_BASE_FOV_DEG,
            increase_deg: DEFAULT_FOV_INCREASE_DEG,
            time_to_increase: DEFAULT_FOV_TIME_TO_INCREASE,
            time_to_decrease: DEFAULT_FOV_TIME_TO_DECREASE,
        }
    }
}

impl FovKickSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("fov_kick.base_fov_deg", self.base_fov_deg, 1.0, 179.0)?;
        ensure_range("fov_kick.increase_deg", self.increase_deg, 0.0, 90.0)?;
        ensure_positive("fov_kick.time_to_increase", self.time_to_increase)?;
        ensure_positive("fov_kick.time_to_decrease", self.time_to_decrease)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootstepSettings {
    pub stride_interval: f32,
    pub land_step_delay: f32,
    /// Footstep cue pool. Cue ids are opaque to the core; the audio sink maps them to clips.
    pub cues: Vec<CueId>,
}

impl Default for FootstepSettings {
    fn default() -> Self {
        Self {
            stride_interval: DEFAULT_STRIDE_INTERVAL,
            land_step_delay: DEFAULT_LAND_STEP_DELAY,
            cues: (0..4).map(CueId).collect(),
        }
    }
}

impl FootstepSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("footsteps.stride_interval", self.stride_interval)?;
        ensure_range("footsteps.land_step_delay", self.land_step_delay, 0.0, 1000.0)?;
        if self.cues.is_empty() {
            return Err(ConfigError::EmptyCuePool);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub reach: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            reach: DEFAULT_INTERACTION_REACH,
        }
    }
}

/// Everything an actor needs, grouped per subsystem.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub movement: MovementSettings,
    pub capsule: CapsuleSpec,
    pub ground: GroundSettings,
    pub kinematic: KinematicSettings,
    pub dynamics: DynamicsSettings,
    pub look: LookSettings,
    pub head_bob: HeadBobSettings,
    pub landing_dip: LandingDipSettings,
    pub fov_kick: FovKickSettings,
    pub footsteps: FootstepSettings,
    pub interaction: InteractionSettings,
}

impl LocomotionConfig {
    /// Parse a (possibly partial) JSON document and validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.movement.validate()?;
        self.capsule.validate()?;
        self.ground.validate()?;
        self.kinematic.validate()?;
        self.dynamics.validate()?;
        self.look.validate()?;
        self.head_bob.validate()?;
        self.landing_dip.validate()?;
        self.fov_kick.validate()?;
        self.footsteps.validate()?;
        ensure_positive("interaction.reach", self.interaction.reach)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(LocomotionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn capsule_half_height_excludes_the_caps() {
        let capsule = CapsuleSpec::default();
        assert!((capsule.half_height() - 0.4).abs() < 1.0e-6);
        assert!((capsule.half_extent() - 0.9).abs() < 1.0e-6);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = LocomotionConfig::from_json_str(
            r#"{ "movement": { "forward_speed": 6.5 }, "look": { "smooth": true } }"#,
        )
        .unwrap();
        assert_eq!(config.movement.forward_speed, 6.5);
        assert_eq!(config.movement.backward_speed, DEFAULT_BACKWARD_SPEED);
        assert!(config.look.smooth);
        assert_eq!(config.capsule, CapsuleSpec::default());
    }

    #[test]
    fn empty_cue_pool_is_rejected() {
        let err = LocomotionConfig::from_json_str(r#"{ "footsteps": { "cues": [] } }"#);
        assert_eq!(err, Err(ConfigError::EmptyCuePool));
    }

    #[test]
    fn shell_offset_must_leave_a_probe() {
        let mut config = LocomotionConfig::default();
        config.ground.shell_offset = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "ground.shell_offset",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            LocomotionConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn json_round_trip_preserves_defaults() {
        let json = LocomotionConfig::default().to_json_string().unwrap();
        assert_eq!(
            LocomotionConfig::from_json_str(&json).unwrap(),
            LocomotionConfig::default()
        );
    }
}
