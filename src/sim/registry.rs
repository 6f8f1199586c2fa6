//! Live obstacle and coin collections
//!
//! The registry is the only owner of entity records. A record exists exactly
//! as long as the entity is alive; removal hands the record back so the caller
//! can tell the presenter to drop its visual.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::clamp_lane;
use crate::lane_to_x;
use crate::tuning::Tuning;

pub type EntityId = u32;

/// Something the player must not touch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub lane: i8,
    pub pos: Vec3,
}

/// A collectible coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: EntityId,
    pub lane: i8,
    pub pos: Vec3,
    /// Spin angle around Y (cosmetic)
    pub spin: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Coin,
}

/// What the presenter needs to mount or unmount a visual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub kind: EntityKind,
    pub id: EntityId,
    pub lane: i8,
    pub pos: Vec3,
}

impl From<&Obstacle> for EntityView {
    fn from(o: &Obstacle) -> Self {
        Self {
            kind: EntityKind::Obstacle,
            id: o.id,
            lane: o.lane,
            pos: o.pos,
        }
    }
}

impl From<&Coin> for EntityView {
    fn from(c: &Coin) -> Self {
        Self {
            kind: EntityKind::Coin,
            id: c.id,
            lane: c.lane,
            pos: c.pos,
        }
    }
}

/// Owner of all live entities (kept in id order)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    obstacles: Vec<Obstacle>,
    coins: Vec<Coin>,
    lane_width: f32,
    spawn_z: f32,
    coin_height: f32,
    /// Ids are never reused within a session
    next_id: EntityId,
}

impl EntityRegistry {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            obstacles: Vec::new(),
            coins: Vec::new(),
            lane_width: tuning.lane_width,
            spawn_z: tuning.spawn_z,
            coin_height: tuning.coin_height,
            next_id: 1,
        }
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create an obstacle at the spawn distance. Out-of-range lanes clamp.
    pub fn add_obstacle(&mut self, lane: i32) -> EntityView {
        let lane = clamp_lane(lane);
        let obstacle = Obstacle {
            id: self.next_entity_id(),
            lane,
            pos: Vec3::new(lane_to_x(lane, self.lane_width), 0.0, self.spawn_z),
        };
        let view = EntityView::from(&obstacle);
        self.obstacles.push(obstacle);
        view
    }

    /// Create a coin at the spawn distance. Out-of-range lanes clamp.
    pub fn add_coin(&mut self, lane: i32) -> EntityView {
        let lane = clamp_lane(lane);
        let coin = Coin {
            id: self.next_entity_id(),
            lane,
            pos: Vec3::new(
                lane_to_x(lane, self.lane_width),
                self.coin_height,
                self.spawn_z,
            ),
            spin: 0.0,
        };
        let view = EntityView::from(&coin);
        self.coins.push(coin);
        view
    }

    pub fn remove_obstacle(&mut self, id: EntityId) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(idx))
    }

    pub fn remove_coin(&mut self, id: EntityId) -> Option<Coin> {
        let idx = self.coins.iter().position(|c| c.id == id)?;
        Some(self.coins.remove(idx))
    }

    /// Release every entity, returning them for unmounting
    pub fn clear_all(&mut self) -> Vec<EntityView> {
        self.obstacles
            .drain(..)
            .map(|o| EntityView::from(&o))
            .chain(self.coins.drain(..).map(|c| EntityView::from(&c)))
            .collect()
    }

    /// Remove everything whose Z is past `z_limit`
    pub fn cull_beyond(&mut self, z_limit: f32) -> Vec<EntityView> {
        let mut culled = Vec::new();
        self.obstacles.retain(|o| {
            let keep = o.pos.z <= z_limit;
            if !keep {
                culled.push(EntityView::from(o));
            }
            keep
        });
        self.coins.retain(|c| {
            let keep = c.pos.z <= z_limit;
            if !keep {
                culled.push(EntityView::from(c));
            }
            keep
        });
        culled
    }

    /// Live obstacles in id order. The iterator is `Clone`, so a traversal
    /// can be restarted from any point.
    pub fn obstacles(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    pub fn coins(&self) -> std::slice::Iter<'_, Coin> {
        self.coins.iter()
    }

    pub fn obstacles_mut(&mut self) -> std::slice::IterMut<'_, Obstacle> {
        self.obstacles.iter_mut()
    }

    pub fn coins_mut(&mut self) -> std::slice::IterMut<'_, Coin> {
        self.coins.iter_mut()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty() && self.coins.is_empty()
    }
}
