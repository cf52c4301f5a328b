//! Game session
//!
//! Owns one simulation together with its collaborators: the archetype
//! catalog (which may still be loading) and the outbound listener. Hosts
//! drive it one frame at a time.

use crate::catalog::{ArchetypeCatalog, CatalogState};
use crate::platform::InputSnapshot;
use crate::sim::{FrameSnapshot, GameEvent, GameListener, GameState, tick};
use crate::tuning::Tuning;

pub struct Session<L: GameListener> {
    state: GameState,
    catalog: CatalogState,
    listener: L,
}

impl<L: GameListener> Session<L> {
    /// New session waiting for `start`; the catalog starts out pending
    pub fn new(seed: u64, tuning: Tuning, listener: L) -> Self {
        Self {
            state: GameState::new(seed, tuning),
            catalog: CatalogState::Pending,
            listener,
        }
    }

    /// Install the result of the catalog load
    pub fn set_catalog(&mut self, catalog: CatalogState) {
        self.catalog = catalog;
    }

    pub fn catalog(&self) -> &dyn ArchetypeCatalog {
        &self.catalog
    }

    pub fn start(&mut self) {
        self.state.start();
        self.announce_reset();
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.announce_reset();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.state.set_paused(paused);
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
    }

    /// Advance one display frame with the current input
    pub fn frame(&mut self, delta_ms: f64, input: &InputSnapshot) {
        let events = tick(&mut self.state, &input.to_tick_input(), &self.catalog, delta_ms);
        for event in &events {
            event.dispatch(&mut self.listener);
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Bring the listener's HUD values back to the fresh-game defaults
    fn announce_reset(&mut self) {
        let reset = [
            GameEvent::ScoreChanged(self.state.score),
            GameEvent::HealthChanged(self.state.player.health),
            GameEvent::ComboChanged(self.state.combo),
            GameEvent::LevelChanged(self.state.player.level),
        ];
        for event in &reset {
            event.dispatch(&mut self.listener);
        }
    }
}
