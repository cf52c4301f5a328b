//! Outbound notifications
//!
//! `tick` returns the events it produced; the host dispatches them to a
//! `GameListener`. Nothing is awaited.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Something the outside world may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    HealthChanged(u32),
    ComboChanged(u32),
    LevelChanged(u32),
    /// An enemy blew up (for sound/shake hooks)
    Explosion { pos: Vec2, color: String },
    GameOver,
}

/// Receiver of score/health/combo/game-over callbacks
///
/// All methods default to no-ops so listeners only implement what they use.
pub trait GameListener {
    fn on_score_change(&mut self, _score: u64) {}
    fn on_health_change(&mut self, _health: u32) {}
    fn on_combo_change(&mut self, _combo: u32) {}
    fn on_level_change(&mut self, _level: u32) {}
    fn on_explosion(&mut self, _pos: Vec2, _color: &str) {}
    fn on_game_over(&mut self) {}
}

/// Listener that ignores everything
impl GameListener for () {}

impl GameEvent {
    /// Forward this event to the matching listener callback
    pub fn dispatch(&self, listener: &mut (impl GameListener + ?Sized)) {
        match self {
            GameEvent::ScoreChanged(score) => listener.on_score_change(*score),
            GameEvent::HealthChanged(health) => listener.on_health_change(*health),
            GameEvent::ComboChanged(combo) => listener.on_combo_change(*combo),
            GameEvent::LevelChanged(level) => listener.on_level_change(*level),
            GameEvent::Explosion { pos, color } => listener.on_explosion(*pos, color),
            GameEvent::GameOver => listener.on_game_over(),
        }
    }
}

/// Listener that records every callback (handy for hosts that poll)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl GameListener for EventLog {
    fn on_score_change(&mut self, score: u64) {
        self.events.push(GameEvent::ScoreChanged(score));
    }
    fn on_health_change(&mut self, health: u32) {
        self.events.push(GameEvent::HealthChanged(health));
    }
    fn on_combo_change(&mut self, combo: u32) {
        self.events.push(GameEvent::ComboChanged(combo));
    }
    fn on_level_change(&mut self, level: u32) {
        self.events.push(GameEvent::LevelChanged(level));
    }
    fn on_explosion(&mut self, pos: Vec2, color: &str) {
        self.events.push(GameEvent::Explosion {
            pos,
            color: color.to_string(),
        });
    }
    fn on_game_over(&mut self) {
        self.events.push(GameEvent::GameOver);
    }
}

impl EventLog {
    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}
