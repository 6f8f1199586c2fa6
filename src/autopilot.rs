//! Idle/demo mode player
//!
//! Looks a short distance down each lane and picks at most one intent per
//! frame: dodge the nearest threat, otherwise drift toward the nearest coin.

use crate::sim::{GameState, Intent};

/// How far ahead of the player (world units) obstacles count as threats
pub const THREAT_DISTANCE: f32 = 8.0;
/// How far ahead coins are worth chasing
pub const COIN_DISTANCE: f32 = 30.0;

/// Distance from the player to the nearest obstacle ahead in `lane`
fn nearest_obstacle(state: &GameState, lane: i8) -> Option<f32> {
    let player_z = state.player.pos.z;
    state
        .registry
        .obstacles()
        .filter(|o| o.lane == lane && o.pos.z <= player_z + state.tuning.hit_distance)
        .map(|o| player_z - o.pos.z)
        .min_by(f32::total_cmp)
}

fn lane_is_clear(state: &GameState, lane: i8) -> bool {
    nearest_obstacle(state, lane).is_none_or(|d| d > THREAT_DISTANCE)
}

/// Intent that moves one step from `from` toward `to`
fn step_toward(from: i8, to: i8) -> Option<Intent> {
    match to.cmp(&from) {
        std::cmp::Ordering::Less => Some(Intent::Left),
        std::cmp::Ordering::Greater => Some(Intent::Right),
        std::cmp::Ordering::Equal => None,
    }
}

/// Pick the next intent, if any
pub fn choose_intent(state: &GameState) -> Option<Intent> {
    if !state.is_running() {
        return None;
    }

    let lane = state.player.lane;
    if !lane_is_clear(state, lane) {
        // Prefer the adjacent lane whose nearest obstacle is farthest away
        let escape = [lane - 1, lane + 1]
            .into_iter()
            .filter(|l| (-1..=1).contains(l))
            .filter(|&l| lane_is_clear(state, l))
            .max_by(|&a, &b| {
                let da = nearest_obstacle(state, a).unwrap_or(f32::MAX);
                let db = nearest_obstacle(state, b).unwrap_or(f32::MAX);
                da.total_cmp(&db)
            });
        return match escape {
            Some(target) => step_toward(lane, target),
            None if state.player.is_grounded_idle() => Some(Intent::Jump),
            None => None,
        };
    }

    // Chase the nearest reachable coin without stepping into a threat
    let player_z = state.player.pos.z;
    let target = state
        .registry
        .coins()
        .filter(|c| c.pos.z <= player_z && player_z - c.pos.z < COIN_DISTANCE)
        .min_by(|a, b| (player_z - a.pos.z).total_cmp(&(player_z - b.pos.z)))
        .map(|c| c.lane)?;
    let intent = step_toward(lane, target)?;
    let next = match intent {
        Intent::Left => lane - 1,
        _ => lane + 1,
    };
    lane_is_clear(state, next).then_some(intent)
}
