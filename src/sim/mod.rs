//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, fixed per-tick increments
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Host time arrives as an argument, never read from a clock
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod registry;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{coin_reached_player, obstacle_hits_player};
pub use input::{Intent, apply_intent};
pub use registry::{Coin, EntityId, EntityKind, EntityRegistry, EntityView, Obstacle};
pub use spawner::{SpawnRequest, Spawner};
pub use state::{GameEvent, GamePhase, GameState, Player, RunStats};
pub use tick::{advance_clock, tick};
pub use timer::{OneShotTimer, PeriodicTimer};
