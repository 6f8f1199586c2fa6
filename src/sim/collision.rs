//! Axis-aligned proximity checks
//!
//! Each axis is tested independently against a fixed threshold; there is no
//! swept test. At the default speeds an entity moves a fraction of the
//! threshold per tick, but a speed above twice the threshold would let an
//! entity tunnel through the player between two ticks.

use glam::Vec3;

/// Strict `|a - b| < threshold`
#[inline]
pub fn within(a: f32, b: f32, threshold: f32) -> bool {
    (a - b).abs() < threshold
}

/// Obstacle overlaps the player on all three axes
pub fn obstacle_hits_player(obstacle: Vec3, player: Vec3, threshold: f32) -> bool {
    within(obstacle.z, player.z, threshold)
        && within(obstacle.x, player.x, threshold)
        && within(obstacle.y, player.y, threshold)
}

/// Coin is close enough on Z and X. Height is ignored so coins are
/// collected while jumping or sliding.
pub fn coin_reached_player(coin: Vec3, player: Vec3, threshold: f32) -> bool {
    within(coin.z, player.z, threshold) && within(coin.x, player.x, threshold)
}
