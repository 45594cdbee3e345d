//! Tunable configuration, loadable from JSON.
//!
//! Every field has a default taken from [`crate::constants`], so a config
//! document only needs to name the values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// Failure to load a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Combat agent tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub detect_range: f32,
    pub detect_half_angle_degrees: f32,
    pub eye_height: f32,
    pub wander_radius: f32,
    pub wander_interval: f32,
    pub wander_speed: f32,
    pub chase_speed: f32,
    pub dash_distance: f32,
    pub dash_duration: f32,
    pub dash_speed_factor: f32,
    pub wander_arrival_distance: f32,
    pub nav_projection_radius: f32,
    pub max_health: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            detect_range: DETECT_RANGE,
            detect_half_angle_degrees: DETECT_HALF_ANGLE_DEGREES,
            eye_height: EYE_HEIGHT,
            wander_radius: WANDER_RADIUS,
            wander_interval: WANDER_INTERVAL,
            wander_speed: WANDER_SPEED,
            chase_speed: CHASE_SPEED,
            dash_distance: DASH_DISTANCE,
            dash_duration: DASH_DURATION,
            dash_speed_factor: DASH_SPEED_FACTOR,
            wander_arrival_distance: WANDER_ARRIVAL_DISTANCE,
            nav_projection_radius: NAV_PROJECTION_RADIUS,
            max_health: ENEMY_MAX_HEALTH,
        }
    }
}

impl CombatConfig {
    /// Navigation speed used while dashing.
    pub fn dash_speed(&self) -> f32 {
        self.chase_speed * self.dash_speed_factor
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("combat.detect_range", self.detect_range)?;
        if !(self.detect_half_angle_degrees > 0.0 && self.detect_half_angle_degrees <= 180.0) {
            return Err(ConfigError::Invalid {
                field: "combat.detect_half_angle_degrees",
                reason: "must be in (0, 180]",
            });
        }
        positive("combat.wander_interval", self.wander_interval)?;
        positive("combat.dash_duration", self.dash_duration)?;
        positive("combat.dash_speed_factor", self.dash_speed_factor)?;
        non_negative("combat.eye_height", self.eye_height)?;
        non_negative("combat.wander_arrival_distance", self.wander_arrival_distance)?;
        non_negative("combat.wander_radius", self.wander_radius)?;
        non_negative("combat.wander_speed", self.wander_speed)?;
        non_negative("combat.chase_speed", self.chase_speed)?;
        non_negative("combat.dash_distance", self.dash_distance)?;
        non_negative("combat.nav_projection_radius", self.nav_projection_radius)?;
        if self.max_health == 0 {
            return Err(ConfigError::Invalid {
                field: "combat.max_health",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Player locomotion tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub move_speed: f32,
    pub jump_amount: f32,
    pub run_multiplier: f32,
    pub mouse_sensitivity: f32,
    pub max_look_angle: f32,
    pub max_jumps: u32,
    pub max_health: u32,
    pub collider_height: f32,
    pub ground_probe_radius: f32,
    pub ground_probe_skin: f32,
    pub ground_layer_mask: u32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            jump_amount: JUMP_AMOUNT,
            run_multiplier: RUN_MULTIPLIER,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            max_look_angle: MAX_LOOK_ANGLE,
            max_jumps: MAX_JUMPS,
            max_health: PLAYER_MAX_HEALTH,
            collider_height: COLLIDER_HEIGHT,
            ground_probe_radius: GROUND_PROBE_RADIUS,
            ground_probe_skin: GROUND_PROBE_SKIN,
            ground_layer_mask: GROUND_LAYER_MASK,
        }
    }
}

impl LocomotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("locomotion.move_speed", self.move_speed)?;
        non_negative("locomotion.jump_amount", self.jump_amount)?;
        positive("locomotion.run_multiplier", self.run_multiplier)?;
        positive("locomotion.ground_probe_radius", self.ground_probe_radius)?;
        non_negative("locomotion.ground_probe_skin", self.ground_probe_skin)?;
        non_negative("locomotion.mouse_sensitivity", self.mouse_sensitivity)?;
        positive("locomotion.collider_height", self.collider_height)?;
        if !(0.0..=90.0).contains(&self.max_look_angle) {
            return Err(ConfigError::Invalid {
                field: "locomotion.max_look_angle",
                reason: "must be in [0, 90]",
            });
        }
        if self.max_jumps == 0 {
            return Err(ConfigError::Invalid {
                field: "locomotion.max_jumps",
                reason: "must be at least 1",
            });
        }
        if self.max_health == 0 {
            return Err(ConfigError::Invalid {
                field: "locomotion.max_health",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Match rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Time limit in seconds.
    pub duration: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            duration: MATCH_DURATION,
        }
    }
}

/// Player projectile tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub lifetime: f32,
    pub radius: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: PROJECTILE_SPEED,
            lifetime: PROJECTILE_LIFETIME,
            radius: PROJECTILE_RADIUS,
        }
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub combat: CombatConfig,
    pub locomotion: LocomotionConfig,
    #[serde(rename = "match")]
    pub match_rules: MatchConfig,
    pub projectile: ProjectileConfig,
}

impl GameConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.combat.validate()?;
        self.locomotion.validate()?;
        positive("match.duration", self.match_rules.duration)?;
        positive("projectile.lifetime", self.projectile.lifetime)?;
        non_negative("projectile.speed", self.projectile.speed)?;
        non_negative("projectile.radius", self.projectile.radius)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be greater than zero",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must not be negative",
        })
    }
}
