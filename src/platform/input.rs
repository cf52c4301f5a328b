//! Live input snapshot
//!
//! Browser listeners record raw key and pointer state here; the session turns
//! it into a `TickInput` once per frame.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Raw input state as of the latest browser event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Lower-cased `KeyboardEvent.key` values currently held
    pub pressed: HashSet<String>,
    /// Pointer position in world units, if it is over the arena
    pub pointer: Option<Vec2>,
    /// Primary pointer button held
    pub pointer_down: bool,
}

impl InputSnapshot {
    pub fn key_down(&mut self, key: &str) {
        self.pressed.insert(key.to_lowercase());
    }

    pub fn key_up(&mut self, key: &str) {
        self.pressed.remove(&key.to_lowercase());
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    fn any_pressed(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.is_pressed(k))
    }

    /// Drop all held keys and buttons (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.pointer_down = false;
    }

    /// Map the raw state onto simulation commands
    pub fn to_tick_input(&self) -> TickInput {
        let mut movement = Vec2::ZERO;
        if self.any_pressed(&["w", "arrowup"]) {
            movement.y += 1.0;
        }
        if self.any_pressed(&["s", "arrowdown"]) {
            movement.y -= 1.0;
        }
        if self.any_pressed(&["a", "arrowleft"]) {
            movement.x -= 1.0;
        }
        if self.any_pressed(&["d", "arrowright"]) {
            movement.x += 1.0;
        }

        TickInput {
            movement,
            fire: self.pointer_down || self.is_pressed(" "),
            boost: self.is_pressed("shift"),
            aim: self.pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut input = InputSnapshot::default();
        input.key_down("ArrowUp");
        input.key_down("D");
        let tick = input.to_tick_input();
        assert_eq!(tick.movement, Vec2::new(1.0, 1.0));

        input.key_up("arrowup");
        assert_eq!(input.to_tick_input().movement, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputSnapshot::default();
        input.key_down("a");
        input.key_down("ArrowRight");
        assert_eq!(input.to_tick_input().movement, Vec2::ZERO);
    }

    #[test]
    fn test_fire_and_boost_mapping() {
        let mut input = InputSnapshot::default();
        assert!(!input.to_tick_input().fire);

        input.key_down(" ");
        input.key_down("Shift");
        let tick = input.to_tick_input();
        assert!(tick.fire);
        assert!(tick.boost);

        input.release_all();
        input.pointer_down = true;
        input.pointer = Some(Vec2::new(4.0, 2.0));
        let tick = input.to_tick_input();
        assert!(tick.fire);
        assert!(!tick.boost);
        assert_eq!(tick.aim, Some(Vec2::new(4.0, 2.0)));
    }
}
