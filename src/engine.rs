//! Game session: simulation + presenter + frame scheduling
//!
//! [`Game`] is the single update entry point. Hosts call [`Game::frame`] from
//! whatever callback their [`TickDriver`] schedules; a frame asks for the next
//! one only after it has fully completed, and only while the run is active.

use crate::present::Presenter;
use crate::sim::{GameEvent, GamePhase, GameState, Intent, advance_clock, apply_intent, tick};
use crate::tuning::{Tuning, TuningError};

/// Host hook for scheduling the next frame (e.g. requestAnimationFrame)
pub trait TickDriver {
    fn request_next_tick(&mut self);
}

/// A running session
pub struct Game<P: Presenter> {
    state: GameState,
    presenter: P,
}

impl<P: Presenter> Game<P> {
    /// Create an idle session and show the menu
    pub fn new(seed: u64, tuning: Tuning, mut presenter: P) -> Result<Self, TuningError> {
        let state = GameState::with_tuning(seed, tuning)?;
        presenter.show_menu();
        Ok(Self { state, presenter })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Start (or restart) a run and request the first frame. Ignored while a
    /// run is already going, so only one frame chain is ever scheduled.
    pub fn start(&mut self, now_ms: f64, driver: &mut impl TickDriver) -> bool {
        if self.state.is_running() {
            log::debug!("Start ignored: run in progress");
            return false;
        }
        for view in self.state.start(now_ms) {
            self.presenter.unmount(&view);
        }
        self.presenter.show_hud();
        self.sync_player();
        self.presenter.set_hud(&self.state.stats.hud_text());
        driver.request_next_tick();
        true
    }

    /// Apply a control event; ignored unless running
    pub fn handle_input(&mut self, intent: Intent, now_ms: f64) -> bool {
        let changed = apply_intent(&mut self.state, intent, now_ms);
        if changed {
            log::trace!("Input {:?} accepted", intent);
            self.sync_player();
        }
        changed
    }

    /// One frame: fire due timers, tick, present, reschedule
    pub fn frame(&mut self, now_ms: f64, driver: &mut impl TickDriver) {
        if !self.state.is_running() {
            return;
        }

        let events = advance_clock(&mut self.state, now_ms);
        self.dispatch(events);
        let events = tick(&mut self.state);
        self.dispatch(events);

        self.sync_player();
        if self.state.is_running() {
            self.presenter.set_hud(&self.state.stats.hud_text());
        }
        self.presenter.render_frame(&self.state);

        if self.state.is_running() {
            driver.request_next_tick();
        }
    }

    fn sync_player(&mut self) {
        let player = &self.state.player;
        self.presenter
            .set_player_transform(player.lane, player.pos.y, player.squash);
    }

    fn dispatch(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Spawned(view) => self.presenter.mount(&view),
                GameEvent::CoinCollected { coin, .. } => self.presenter.unmount(&coin),
                GameEvent::Despawned(view) => self.presenter.unmount(&view),
                GameEvent::Crashed { score, coins, .. } => {
                    self.presenter.show_game_over(score, coins)
                }
                GameEvent::SlideEnded | GameEvent::SpeedUp { .. } => {}
            }
        }
    }
}

/// Fixed-interval driver for headless runs and tests
#[derive(Debug, Clone)]
pub struct HeadlessDriver {
    now_ms: f64,
    frame_ms: f64,
    pending: bool,
    frames: u64,
}

impl TickDriver for HeadlessDriver {
    fn request_next_tick(&mut self) {
        self.pending = true;
    }
}

impl HeadlessDriver {
    pub fn new(frame_ms: f64) -> Self {
        Self {
            now_ms: 0.0,
            frame_ms,
            pending: false,
            frames: 0,
        }
    }

    /// Current host time
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Total frames delivered
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Let time pass without delivering frames
    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    /// Deliver frames while the game keeps asking for them
    pub fn run<P: Presenter>(&mut self, game: &mut Game<P>, max_frames: u64) -> u64 {
        self.run_with(game, max_frames, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `before_frame` with the frame time
    /// ahead of each frame (for feeding input)
    pub fn run_with<P, F>(&mut self, game: &mut Game<P>, max_frames: u64, mut before_frame: F) -> u64
    where
        P: Presenter,
        F: FnMut(&mut Game<P>, f64),
    {
        let mut ran = 0;
        while self.pending && ran < max_frames {
            self.pending = false;
            self.now_ms += self.frame_ms;
            before_frame(game, self.now_ms);
            game.frame(self.now_ms, self);
            ran += 1;
            self.frames += 1;
        }
        ran
    }
}
