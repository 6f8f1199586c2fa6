//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; there are no globals.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::registry::{EntityId, EntityRegistry, EntityView};
use super::spawner::Spawner;
use super::timer::OneShotTimer;
use crate::tuning::{Tuning, TuningError};
use crate::{clamp_lane, lane_to_x};

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu shown, waiting for start
    Idle,
    /// Active gameplay
    Running,
    /// Run ended by a collision
    GameOver,
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Always within [LANE_MIN, LANE_MAX]
    pub lane: i8,
    /// X follows the lane, Y is the jump height (>= 0), Z never changes
    pub pos: Vec3,
    pub vertical_vel: f32,
    pub jumping: bool,
    pub sliding: bool,
    /// Vertical scale of the visual (1 = standing)
    pub squash: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            lane: 0,
            pos: Vec3::new(0.0, 0.0, tuning.player_z),
            vertical_vel: 0.0,
            jumping: false,
            sliding: false,
            squash: 1.0,
        }
    }

    /// Snap to a lane (clamped); returns whether the lane changed
    pub fn set_lane(&mut self, lane: i32, lane_width: f32) -> bool {
        let lane = clamp_lane(lane);
        let changed = lane != self.lane;
        self.lane = lane;
        self.pos.x = lane_to_x(lane, lane_width);
        changed
    }

    /// On the ground and not sliding
    pub fn is_grounded_idle(&self) -> bool {
        !self.jumping && !self.sliding
    }

    pub fn end_slide(&mut self) {
        self.sliding = false;
        self.squash = 1.0;
    }
}

/// Score, coins and difficulty for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Score in tenths of a point (exact under repeated 0.1 increments)
    pub score_tenths: u64,
    pub coins: u32,
    /// Score milestones already converted into speed
    pub milestones: u64,
    /// World scroll per tick
    pub speed: f32,
}

impl RunStats {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score_tenths: 0,
            coins: 0,
            milestones: 0,
            speed: tuning.base_speed,
        }
    }

    pub fn score(&self) -> f64 {
        self.score_tenths as f64 / 10.0
    }

    /// Floored score as shown on the HUD
    pub fn display_score(&self) -> u64 {
        self.score_tenths / 10
    }

    pub fn hud_text(&self) -> String {
        format!("Score: {} | Coins: {}", self.display_score(), self.coins)
    }
}

/// Something that happened during a tick, for the presenter
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned(EntityView),
    CoinCollected { coin: EntityView, total: u32 },
    /// Passed behind the player and culled
    Despawned(EntityView),
    SlideEnded,
    SpeedUp { speed: f32 },
    /// Run over; score is floored
    Crashed {
        obstacle: EntityId,
        score: u64,
        coins: u32,
    },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    pub registry: EntityRegistry,
    pub stats: RunStats,
    pub spawner: Spawner,
    pub slide_timer: OneShotTimer,
    /// Ticks simulated in the current run
    pub time_ticks: u64,
    /// Completed runs in this session
    pub runs: u32,
    rng: Pcg32,
}

impl GameState {
    /// Create an idle session with the given seed
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create an idle session with custom balance; rejects invalid tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            player: Player::new(&tuning),
            registry: EntityRegistry::new(&tuning),
            stats: RunStats::new(&tuning),
            spawner: Spawner::new(&tuning),
            slide_timer: OneShotTimer::new(),
            time_ticks: 0,
            runs: 0,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Reset everything for a fresh run and enter Running. Returns the
    /// entities released from the previous run.
    pub fn start(&mut self, now_ms: f64) -> Vec<EntityView> {
        if self.slide_timer.cancel() {
            log::debug!("Cancelled pending slide end");
        }
        self.stats = RunStats::new(&self.tuning);
        self.player = Player::new(&self.tuning);
        self.time_ticks = 0;
        self.spawner.reset(now_ms);
        let released = self.registry.clear_all();
        self.phase = GamePhase::Running;
        log::info!(
            "Run started (seed {}, released {} entities)",
            self.seed,
            released.len()
        );
        released
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub(crate) fn spawner_and_rng(&mut self) -> (&mut Spawner, &mut Pcg32) {
        (&mut self.spawner, &mut self.rng)
    }
}
