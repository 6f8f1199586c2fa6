//! Lane Runner - A three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, collisions, game state)
//! - `engine`: Session object driving the simulation, presenter and tick driver
//! - `present`: Presentation collaborator contract
//! - `tuning`: Data-driven game balance
//! - `autopilot`: Idle/demo mode player

pub mod autopilot;
pub mod engine;
pub mod present;
pub mod sim;
pub mod tuning;

pub use engine::{Game, HeadlessDriver, TickDriver};
pub use present::{EntityView, LogPresenter, Presenter};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Lane indices, left to right
    pub const LANE_MIN: i8 = -1;
    pub const LANE_MAX: i8 = 1;
    pub const LANES: [i8; 3] = [-1, 0, 1];
    /// Distance between lane centers (world units)
    pub const LANE_WIDTH: f32 = 2.0;

    /// The player never moves along Z; the world scrolls toward it
    pub const PLAYER_Z: f32 = 5.0;
    /// Far render distance where entities appear
    pub const SPAWN_Z: f32 = -50.0;
    /// Resting height of coins (cosmetic, pickups ignore height)
    pub const COIN_HEIGHT: f32 = 0.5;
    /// Entities this far behind the player are culled
    pub const CULL_MARGIN: f32 = 5.0;

    /// Vertical acceleration per tick while airborne
    pub const GRAVITY: f32 = -0.05;
    /// Vertical velocity applied on jump
    pub const JUMP_VELOCITY: f32 = 0.3;
    /// Vertical scale of the avatar while sliding
    pub const SLIDE_SQUASH: f32 = 0.5;

    /// World scroll per tick at the start of a run
    pub const BASE_SPEED: f32 = 0.2;
    /// Speed gained per score milestone
    pub const SPEED_STEP: f32 = 0.01;
    /// Points between speed-ups
    pub const SCORE_MILESTONE: u64 = 100;
    /// Score is kept in tenths so that 0.1 per tick accumulates exactly
    pub const SCORE_TENTHS_PER_TICK: u64 = 1;

    /// Coin spin per tick (radians, cosmetic)
    pub const COIN_SPIN: f32 = 0.1;
    /// Per-axis proximity threshold for collisions and pickups
    pub const HIT_DISTANCE: f32 = 1.0;

    /// Real-time periods (milliseconds)
    pub const OBSTACLE_PERIOD_MS: f64 = 2000.0;
    pub const COIN_PERIOD_MS: f64 = 1500.0;
    pub const SLIDE_DURATION_MS: f64 = 1000.0;

    /// Nominal frame interval for headless runs (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// World-space X of a lane center
#[inline]
pub fn lane_to_x(lane: i8, lane_width: f32) -> f32 {
    lane as f32 * lane_width
}

/// Clamp an arbitrary lane request into the playable range
#[inline]
pub fn clamp_lane(lane: i32) -> i8 {
    lane.clamp(consts::LANE_MIN as i32, consts::LANE_MAX as i32) as i8
}
