//! Periodic obstacle/coin spawning
//!
//! Firing a trigger only enqueues a request. The tick drains the queue into
//! the registry, so spawns never race the per-tick advance.

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::registry::EntityKind;
use super::timer::PeriodicTimer;
use crate::consts::LANES;
use crate::tuning::Tuning;

/// A pending entity creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub kind: EntityKind,
    pub lane: i8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    obstacle_timer: PeriodicTimer,
    coin_timer: PeriodicTimer,
    queue: VecDeque<SpawnRequest>,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            obstacle_timer: PeriodicTimer::new(tuning.obstacle_period_ms),
            coin_timer: PeriodicTimer::new(tuning.coin_period_ms),
            queue: VecDeque::new(),
        }
    }

    /// Restart both periods from `now_ms` and forget queued requests
    pub fn reset(&mut self, now_ms: f64) {
        self.obstacle_timer.restart(now_ms);
        self.coin_timer.restart(now_ms);
        self.queue.clear();
    }

    /// Enqueue one request per elapsed period, each in a uniformly random lane
    pub fn poll(&mut self, now_ms: f64, rng: &mut Pcg32) {
        for _ in 0..self.obstacle_timer.poll(now_ms) {
            self.enqueue(EntityKind::Obstacle, rng);
        }
        for _ in 0..self.coin_timer.poll(now_ms) {
            self.enqueue(EntityKind::Coin, rng);
        }
    }

    fn enqueue(&mut self, kind: EntityKind, rng: &mut Pcg32) {
        let lane = LANES[rng.random_range(0..LANES.len())];
        log::debug!("Spawn queued: {:?} in lane {}", kind, lane);
        self.queue.push_back(SpawnRequest { kind, lane });
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SpawnRequest> + '_ {
        self.queue.drain(..)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
