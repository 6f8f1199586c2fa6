//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads goes through [`Tuning`]. The
//! defaults reproduce the classic feel; hosts may override any subset from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a tuning document was rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`speed_step` must not be negative (got {0})")]
    NegativeSpeedStep(f32),
    #[error("`gravity` must pull downward (got {0})")]
    GravityNotNegative(f32),
    #[error("`slide_squash` must be in (0, 1] (got {0})")]
    SquashOutOfRange(f32),
    #[error("`spawn_z` ({spawn_z}) must be in front of `player_z` ({player_z})")]
    SpawnBehindPlayer { spawn_z: f32, player_z: f32 },
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub lane_width: f32,
    pub player_z: f32,
    pub spawn_z: f32,
    pub coin_height: f32,
    pub cull_margin: f32,

    pub gravity: f32,
    pub jump_velocity: f32,
    pub slide_squash: f32,

    pub base_speed: f32,
    pub speed_step: f32,
    /// Points between speed-ups
    pub score_milestone: u64,

    pub coin_spin: f32,
    pub hit_distance: f32,

    pub obstacle_period_ms: f64,
    pub coin_period_ms: f64,
    pub slide_duration_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_width: LANE_WIDTH,
            player_z: PLAYER_Z,
            spawn_z: SPAWN_Z,
            coin_height: COIN_HEIGHT,
            cull_margin: CULL_MARGIN,

            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            slide_squash: SLIDE_SQUASH,

            base_speed: BASE_SPEED,
            speed_step: SPEED_STEP,
            score_milestone: SCORE_MILESTONE,

            coin_spin: COIN_SPIN,
            hit_distance: HIT_DISTANCE,

            obstacle_period_ms: OBSTACLE_PERIOD_MS,
            coin_period_ms: COIN_PERIOD_MS,
            slide_duration_ms: SLIDE_DURATION_MS,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive: [(&'static str, f64); 9] = [
            ("lane_width", self.lane_width as f64),
            ("jump_velocity", self.jump_velocity as f64),
            ("base_speed", self.base_speed as f64),
            ("score_milestone", self.score_milestone as f64),
            ("hit_distance", self.hit_distance as f64),
            ("cull_margin", self.cull_margin as f64),
            ("obstacle_period_ms", self.obstacle_period_ms),
            ("coin_period_ms", self.coin_period_ms),
            ("slide_duration_ms", self.slide_duration_ms),
        ];
        for (field, value) in positive {
            // `!(v > 0)` also catches NaN
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        if !(self.speed_step >= 0.0) {
            return Err(TuningError::NegativeSpeedStep(self.speed_step));
        }
        if !(self.gravity < 0.0) {
            return Err(TuningError::GravityNotNegative(self.gravity));
        }
        if !(self.slide_squash > 0.0 && self.slide_squash <= 1.0) {
            return Err(TuningError::SquashOutOfRange(self.slide_squash));
        }
        if !(self.spawn_z < self.player_z) {
            return Err(TuningError::SpawnBehindPlayer {
                spawn_z: self.spawn_z,
                player_z: self.player_z,
            });
        }
        Ok(())
    }

    /// Speed after `milestones` score milestones
    #[inline]
    pub fn speed_at(&self, milestones: u64) -> f32 {
        self.base_speed + self.speed_step * milestones as f32
    }
}
