use crate::game::ClientGameState;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::error;
use shared::{in_bounds, GameEnd};
use std::io::{stdout, Stdout, Write};

const BORDER: char = '#';
const HEAD: char = '@';
const BODY: char = 'o';
const FOOD: char = '*';
const EMPTY: char = ' ';

/// Draws the board into a raw-mode alternate screen. Dropping it restores the
/// terminal.
pub struct Renderer {
    out: Stdout,
    rows: i32,
    cols: i32,
}

impl Renderer {
    pub fn new(rows: i32, cols: i32) -> std::io::Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Renderer { out, rows, cols })
    }

    pub fn render(&mut self, state: &ClientGameState) -> std::io::Result<()> {
        for (y, line) in compose(state, self.rows, self.cols).iter().enumerate() {
            queue!(self.out, MoveTo(0, y as u16), Print(line))?;
        }
        self.out.flush()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, Show, LeaveAlternateScreen) {
            error!("Failed to leave alternate screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            error!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Text lines for the bordered board. Cells outside the grid are skipped.
pub fn compose(state: &ClientGameState, rows: i32, cols: i32) -> Vec<String> {
    let width = cols.max(0) as usize;
    let mut grid = vec![vec![EMPTY; width]; rows.max(0) as usize];

    let mut mark = |pos: shared::Position, glyph: char| {
        if in_bounds(pos, rows, cols) {
            grid[pos.row as usize][pos.col as usize] = glyph;
        }
    };

    if let Some(food) = state.food() {
        mark(food, FOOD);
    }
    for (i, segment) in state.snake().iter().enumerate() {
        mark(*segment, if i == 0 { HEAD } else { BODY });
    }

    let edge: String = std::iter::repeat(BORDER).take(width + 2).collect();
    let mut lines = Vec::with_capacity(grid.len() + 3);
    lines.push(edge.clone());
    for row in grid {
        let mut line = String::with_capacity(width + 2);
        line.push(BORDER);
        line.extend(row);
        line.push(BORDER);
        lines.push(line);
    }
    lines.push(edge);
    lines.push(format!("Length {}", state.snake().len()));
    lines
}

/// Text shown after the terminal is restored.
pub fn final_message(end: Option<GameEnd>) -> &'static str {
    match end {
        Some(GameEnd::Died) => "You Died",
        Some(GameEnd::Won) => "You Won!",
        None => "Disconnected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Frame, Position};

    #[test]
    fn test_compose_draws_snake_and_food() {
        let mut state = ClientGameState::new();
        state.apply_frame(Frame::Growth {
            food: Position::new(0, 0),
            head: Position::new(1, 1),
            tail: vec![Position::new(1, 2)],
        });

        let lines = compose(&state, 2, 3);
        assert_eq!(lines[0], "#####");
        assert_eq!(lines[1], "#*  #");
        assert_eq!(lines[2], "# @o#");
        assert_eq!(lines[3], "#####");
        assert_eq!(lines[4], "Length 2");
    }

    #[test]
    fn test_compose_ignores_cells_off_grid() {
        let mut state = ClientGameState::new();
        state.apply_frame(Frame::Growth {
            food: Position::new(9, 9),
            head: Position::new(0, 0),
            tail: vec![],
        });
        let lines = compose(&state, 1, 1);
        assert_eq!(lines[1], "#@#");
    }

    #[test]
    fn test_final_message() {
        assert_eq!(final_message(Some(GameEnd::Died)), "You Died");
        assert_eq!(final_message(Some(GameEnd::Won)), "You Won!");
        assert_eq!(final_message(None), "Disconnected");
    }
}
