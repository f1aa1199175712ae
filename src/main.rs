mod game;
mod input;
mod rect;
mod snake;
mod term;

pub type TermInt = u16;
pub type Cell = (TermInt, TermInt);
pub type Coords = (i32, i32);

fn main() {
    let mut game = game::SnakeGame::new();
    game.initialize();

    // Runs a single round: play() returns only through a clean process
    // exit, on wall collision or a close request.
    game.play();
}
