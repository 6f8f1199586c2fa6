//! Presentation collaborator contract
//!
//! The simulation never touches a scene graph or DOM. The engine tells a
//! [`Presenter`] what changed and asks it to draw once per tick.

use crate::sim::GameState;
pub use crate::sim::EntityView;

pub trait Presenter {
    /// Add a visual for a newly spawned obstacle or coin
    fn mount(&mut self, entity: &EntityView);
    /// Drop the visual of a collected, culled or released entity
    fn unmount(&mut self, entity: &EntityView);
    fn set_player_transform(&mut self, lane: i8, vertical_offset: f32, squash: f32);
    /// Draw the current state
    fn render_frame(&mut self, state: &GameState);
    fn set_hud(&mut self, text: &str);
    fn show_menu(&mut self);
    fn show_hud(&mut self);
    /// `score` is already floored
    fn show_game_over(&mut self, score: u64, coins: u32);
}

/// Headless presenter that narrates through the `log` facade
#[derive(Debug, Default)]
pub struct LogPresenter {
    /// Visuals currently mounted
    pub mounted: usize,
    pub frames: u64,
    pub last_hud: String,
    /// Log the HUD every this many frames (0 = never)
    pub hud_every: u64,
}

impl LogPresenter {
    pub fn new(hud_every: u64) -> Self {
        Self {
            hud_every,
            ..Default::default()
        }
    }
}

impl Presenter for LogPresenter {
    fn mount(&mut self, entity: &EntityView) {
        self.mounted += 1;
        log::trace!("mount {:?} #{} lane {}", entity.kind, entity.id, entity.lane);
    }

    fn unmount(&mut self, entity: &EntityView) {
        self.mounted = self.mounted.saturating_sub(1);
        log::trace!("unmount {:?} #{}", entity.kind, entity.id);
    }

    fn set_player_transform(&mut self, lane: i8, vertical_offset: f32, squash: f32) {
        log::trace!("player lane {} y {:.2} squash {:.2}", lane, vertical_offset, squash);
    }

    fn render_frame(&mut self, _state: &GameState) {
        self.frames += 1;
    }

    fn set_hud(&mut self, text: &str) {
        if self.hud_every > 0 && self.frames.is_multiple_of(self.hud_every) {
            log::info!("{} ({} visuals)", text, self.mounted);
        }
        self.last_hud.clear();
        self.last_hud.push_str(text);
    }

    fn show_menu(&mut self) {
        log::info!("Menu: press start");
    }

    fn show_hud(&mut self) {
        log::debug!("HUD visible");
    }

    fn show_game_over(&mut self, score: u64, coins: u32) {
        log::info!("Game over. Your score: {} | Coins: {}", score, coins);
    }
}
