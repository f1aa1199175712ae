use crate::{Cell, TermInt};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

/// The rendering/input collaborator: owns stdout and the raw-mode terminal,
/// draws one character per grid cell, and hands out buffered key events.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Self {
        let (width, height) = terminal::size().expect("Error reading size.");
        TermManager { width, height, stdout: stdout() }
    }

    pub fn setup(&mut self) {
        execute!(self.stdout, EnterAlternateScreen).expect("Error entering alt screen");
        self.set_raw_mode(true);
        self.set_cursor_visibility(false);
        self.set_cursor_blink(false);
    }

    pub fn restore(&mut self) {
        self.set_raw_mode(false);
        self.set_cursor_visibility(true);
        self.set_cursor_blink(true);
        execute!(self.stdout, LeaveAlternateScreen).expect("Error leaving alt screen");
    }

    pub fn read_key_blocking(&self) -> KeyEvent {
        loop {
            if let Event::Key(ev) = read().expect("Error reading event.") {
                return ev;
            }
        }
    }

    pub fn read_key_events_queue(&self) -> Vec<KeyEvent> {
        let mut events = vec![];

        while poll(Duration::from_millis(1)).expect("Error polling events.") {
            if let Event::Key(ev) = read().expect("Error reading event.") {
                events.push(ev);
            }
        }

        events
    }

    pub fn get_terminal_size(&self) -> Cell {
        (self.width, self.height)
    }

    /// Draws the wall cells: the outermost ring of the screen.
    pub fn draw_borders(&mut self) {
        let end_x = self.width - 1;
        let end_y = self.height - 1;

        for x in 0..self.width {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.print_at((x, 0), ch);
            self.print_at((x, end_y), ch);
        }

        for y in 1..end_y {
            self.print_at((0, y), '|');
            self.print_at((end_x, y), '|');
        }

        self.flush();
    }

    pub fn show_message(&mut self, lines: &[&str]) {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap() + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0 - msg_width / 2, center.1 - msg_height / 2);

        // Top and bottom padding rows
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at((top_left.0 + x_diff, *y), ' ');
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.print_text_at((top_left.0, top_left.1 + i as TermInt + 1), &padded_line);
        }

        self.flush();
    }

    pub fn print_at(&mut self, pos: Cell, ch: char) {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).expect("Error printing.");
    }

    pub fn print_text_at(&mut self, pos: Cell, text: &str) {
        for (x_diff, ch) in text.char_indices() {
            self.print_at((pos.0 + x_diff as TermInt, pos.1), ch);
        }
    }

    pub fn clear(&mut self) {
        execute!(self.stdout, terminal::Clear(ClearType::All)).expect("Error clearing.");
    }

    pub fn flush(&mut self) {
        self.stdout.flush().expect("Error flushing.");
    }

    ///////////////////////////////////////////////////////////////////////////

    fn set_raw_mode(&self, option: bool) {
        let res = if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        };

        res.expect("Error setting raw mode.");
    }

    fn set_cursor_blink(&mut self, option: bool) {
        let res = if option {
            execute!(self.stdout, cursor::EnableBlinking)
        } else {
            execute!(self.stdout, cursor::DisableBlinking)
        };

        res.expect("Error setting cursor blink.");
    }

    fn set_cursor_visibility(&mut self, option: bool) {
        let res = if option {
            execute!(self.stdout, cursor::Show)
        } else {
            execute!(self.stdout, cursor::Hide)
        };

        res.expect("Error setting cursor visibility.");
    }
}
