use std::{process::exit, thread::sleep, time::Duration};

use crate::{Cell, Coords, TermInt};
use crate::rect::Rect;
use crate::snake::{Direction::{self, *}, SnakeBody, EXTENT};
use crate::term::TermManager;
use crate::input::InputController;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const TICK_INTERVAL_MS: u64 = 5;
const TICKS_UNTIL_UPDATE: u64 = 12;

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

/// Play-field dimensions in pixel units, multiples of EXTENT. Walls and
/// spawn cells are derived from this, nothing reads the screen size twice.
#[derive(Copy, Clone)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Terminated,
}

/// The whole simulation state, advanced one fixed tick at a time.
/// Rendering lives outside so this can be driven directly by tests.
pub struct GameState {
    walls: [Rect; 4],
    snake: SnakeBody,
    food: Coords,
    score: u64,
    status: Status,
    spawn_cells: Vec<Coords>,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let cols = config.width / EXTENT;
        let rows = config.height / EXTENT;

        // Interior cells only: the outermost ring is wall-overlap territory.
        let mut spawn_cells = vec![];
        for cy in 1..rows - 1 {
            for cx in 1..cols - 1 {
                spawn_cells.push((cx * EXTENT, cy * EXTENT));
            }
        }

        let center = ((cols / 2) * EXTENT, (rows / 2) * EXTENT);
        let snake = SnakeBody::new(center, Up);

        let mut state = GameState {
            walls: make_walls(config),
            snake,
            food: (0, 0),
            score: 0,
            status: Status::Running,
            spawn_cells,
            rng,
        };

        match state.spawn_food() {
            Some(food) => state.food = food,
            None => state.status = Status::Terminated,
        }
        state
    }

    pub fn snake(&self) -> &SnakeBody {
        &self.snake
    }

    pub fn food(&self) -> Coords {
        self.food
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// One simulation step: steer, move, wall check, food check. The
    /// direction request is applied before any segment moves, so a turn and
    /// the growth it may cause always land in a well-defined order.
    pub fn tick(&mut self, requested: Option<Direction>) -> Status {
        if self.status == Status::Terminated {
            return self.status;
        }

        if let Some(direction) = requested {
            self.snake.set_direction(direction);
        }

        self.snake.advance();

        let head_bounds = self.snake.head().bounds();
        if self.walls.iter().any(|wall| wall.intersects(&head_bounds)) {
            self.status = Status::Terminated;
            return self.status;
        }

        let food_bounds = Rect::new(self.food.0, self.food.1, EXTENT, EXTENT);
        if head_bounds.intersects(&food_bounds) {
            self.score += 1;
            self.snake.grow();

            match self.spawn_food() {
                Some(food) => self.food = food,
                // Board full, nowhere left to spawn.
                None => self.status = Status::Terminated,
            }
        }

        self.status
    }

    fn spawn_food(&mut self) -> Option<Coords> {
        let snake = &self.snake;
        let free: Vec<&Coords> = self
            .spawn_cells
            .iter()
            .filter(|pos| !snake.segments().iter().any(|s| s.position() == **pos))
            .collect();

        free.choose(&mut self.rng).copied().copied()
    }
}

/// Four wall rects of thickness 2×EXTENT, each overlapping the field edge by
/// half its thickness. A head strictly inside the field only touches them;
/// the edge cell itself overlaps and triggers the collision.
fn make_walls(config: GameConfig) -> [Rect; 4] {
    let (w, h) = (config.width, config.height);
    [
        Rect::new(-EXTENT, 0, 2 * EXTENT, h),         // left
        Rect::new(w - EXTENT, 0, 2 * EXTENT, h),      // right
        Rect::new(0, -EXTENT, w, 2 * EXTENT),         // top
        Rect::new(0, h - EXTENT, w, 2 * EXTENT),      // bottom
    ]
}

pub struct SnakeGame {
    config: GameConfig,
    term: TermManager,
}

impl SnakeGame {
    pub fn new() -> Self {
        SnakeGame { config: GameConfig { width: 0, height: 0 }, term: TermManager::new() }
    }

    pub fn initialize(&mut self) {
        self.term.setup();

        let (cols, rows) = self.term.get_terminal_size();
        self.config = GameConfig {
            width: cols as i32 * EXTENT,
            height: rows as i32 * EXTENT,
        };
    }

    pub fn play(&mut self) {
        self.term.clear();
        self.term.draw_borders();

        let mut state = GameState::new(self.config);
        let mut input = InputController::new();
        let mut prev_cells: Vec<Cell> = vec![];
        let mut ticks_until_step = TICKS_UNTIL_UPDATE;

        self.draw_frame(&state, &mut prev_cells);

        loop {
            sleep(Duration::from_millis(TICK_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue() {
                if is_close_request(&key_ev) {
                    self.clean_exit();
                }
                input.observe(key_ev.code, state.snake().head().direction());
            }

            ticks_until_step -= 1;
            if ticks_until_step > 0 {
                continue;
            }
            ticks_until_step = TICKS_UNTIL_UPDATE;

            state.tick(input.take_requested());
            if state.status() == Status::Terminated {
                self.game_over(&state);
                break;
            }

            self.draw_frame(&state, &mut prev_cells);
        }

        // Any key leaves the game-over screen.
        self.term.read_key_blocking();
        self.clean_exit();
    }

    ///////////////////////////////////////////////////////////////////////////

    fn clean_exit(&mut self) {
        self.term.restore();
        exit(0);
    }

    fn draw_frame(&mut self, state: &GameState, prev_cells: &mut Vec<Cell>) {
        for cell in prev_cells.drain(..) {
            self.term.print_at(cell, ' ');
        }

        if let Some(cell) = self.to_cell(state.food()) {
            self.term.print_at(cell, FOOD_CHAR);
        }

        for (i, segment) in state.snake().segments().iter().enumerate() {
            if let Some(cell) = self.to_cell(segment.position()) {
                let ch = if i == 0 { state.snake().head_char() } else { SNAKE_BODY_CHAR };
                self.term.print_at(cell, ch);
                prev_cells.push(cell);
            }
        }

        self.term.print_text_at((2, 0), &format!(" Score: {} ", state.score()));
        self.term.flush();
    }

    fn game_over(&mut self, state: &GameState) {
        for segment in state.snake().segments() {
            if let Some(cell) = self.to_cell(segment.position()) {
                self.term.print_at(cell, DEAD_SNAKE_CHAR);
            }
        }

        self.term.show_message(&[
            "Game over!",
            &*format!("Score: {}", state.score()),
            "",
            "Press any key to exit.",
        ]);
    }

    /// Maps a pixel position to its terminal cell; positions outside the
    /// screen (a head buried in a wall) have no cell.
    fn to_cell(&self, pos: Coords) -> Option<Cell> {
        let (cx, cy) = (pos.0 / EXTENT, pos.1 / EXTENT);
        let (cols, rows) = (self.config.width / EXTENT, self.config.height / EXTENT);

        if pos.0 >= 0 && pos.1 >= 0 && cx < cols && cy < rows {
            Some((cx as TermInt, cy as TermInt))
        } else {
            None
        }
    }
}

fn is_close_request(ev: &KeyEvent) -> bool {
    matches!(
        ev,
        KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }
            | KeyEvent { code: KeyCode::Esc, modifiers: _ }
    )
}
