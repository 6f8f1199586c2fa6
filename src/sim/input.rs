//! Control intents and their effect on the player
//!
//! Intents are applied immediately (between ticks). Everything is ignored
//! unless the run is active.

use serde::{Deserialize, Serialize};

use super::state::GameState;

/// Discrete control events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Left,
    Right,
    Jump,
    Slide,
}

impl Intent {
    pub const ALL: [Intent; 4] = [Intent::Left, Intent::Right, Intent::Jump, Intent::Slide];

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Intent::Left),
            "ArrowRight" => Some(Intent::Right),
            "ArrowUp" => Some(Intent::Jump),
            "ArrowDown" => Some(Intent::Slide),
            _ => None,
        }
    }
}

/// Apply an intent at host time `now_ms`. Returns whether it changed anything.
pub fn apply_intent(state: &mut GameState, intent: Intent, now_ms: f64) -> bool {
    if !state.is_running() {
        return false;
    }

    let lane_width = state.tuning.lane_width;
    match intent {
        Intent::Left => {
            let lane = state.player.lane as i32 - 1;
            state.player.set_lane(lane, lane_width)
        }
        Intent::Right => {
            let lane = state.player.lane as i32 + 1;
            state.player.set_lane(lane, lane_width)
        }
        Intent::Jump => {
            if !state.player.is_grounded_idle() {
                return false;
            }
            state.slide_timer.cancel();
            state.player.jumping = true;
            state.player.vertical_vel = state.tuning.jump_velocity;
            true
        }
        Intent::Slide => {
            if !state.player.is_grounded_idle() {
                return false;
            }
            state.player.sliding = true;
            state.player.squash = state.tuning.slide_squash;
            // Real time, so the slide lasts the same however fast the world scrolls
            state
                .slide_timer
                .schedule(now_ms, state.tuning.slide_duration_ms);
            true
        }
    }
}
