use crate::snake::Direction::{self, *};

use crossterm::event::KeyCode;

/// Turns raw key presses into at most one direction change per tick.
///
/// Keys observed within the same tick overwrite each other, so only the last
/// accepted press matters. A press opposite to the snake's current heading is
/// dropped on the spot, and anything that isn't a movement key is ignored.
pub struct InputController {
    requested: Option<Direction>,
}

impl InputController {
    pub fn new() -> Self {
        InputController { requested: None }
    }

    pub fn observe(&mut self, code: KeyCode, current: Direction) {
        if let Some(direction) = map_key(code) {
            if direction != current.opposite() {
                self.requested = Some(direction);
            }
        }
    }

    /// Hands out the buffered request and clears it for the next tick.
    pub fn take_requested(&mut self) -> Option<Direction> {
        self.requested.take()
    }
}

fn map_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Right),
        _ => None,
    }
}
