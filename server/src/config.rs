use shared::{in_bounds, Direction, Position, DEFAULT_COLS, DEFAULT_ROWS};
use std::fmt;
use std::time::Duration;

pub const GROWTH_INCREMENT: usize = 3;
pub const VICTORY_THRESHOLD: usize = 620;
pub const TICK_INTERVAL: Duration = Duration::from_millis(150);

const START_CELL: i32 = 12;
const START_LENGTH: i32 = 4;

/// Largest accepted board side.
pub const MAX_DIMENSION: i32 = 1000;

/// A setting that would start a broken game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroTickInterval,
    ZeroGrowth,
    DimensionOutOfRange { rows: i32, cols: i32 },
    /// The fixed opening layout does not fit on the board.
    StartOffBoard(Position),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTickInterval => write!(f, "Tick interval must be non-zero"),
            ConfigError::ZeroGrowth => write!(f, "Growth increment must be at least 1"),
            ConfigError::DimensionOutOfRange { rows, cols } => write!(
                f,
                "Board {}x{} outside 1..={} per side",
                rows, cols, MAX_DIMENSION
            ),
            ConfigError::StartOffBoard(pos) => {
                write!(f, "Starting cell {} is outside the board", pos)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Per-connection game settings. Every board on a server shares one copy.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub rows: i32,
    pub cols: i32,
    pub growth_increment: usize,
    /// Length past which running out of growth room counts as a win.
    pub victory_threshold: usize,
    pub tick_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            growth_increment: GROWTH_INCREMENT,
            victory_threshold: VICTORY_THRESHOLD,
            tick_interval: TICK_INTERVAL,
        }
    }
}

impl GameConfig {
    /// Vertical snake of four cells with its head at (12, 12), facing up.
    pub fn starting_snake(&self) -> Vec<Position> {
        (0..START_LENGTH)
            .map(|i| Position::new(START_CELL + i, START_CELL))
            .collect()
    }

    pub fn starting_direction(&self) -> Direction {
        Direction::Up
    }

    pub fn starting_food(&self) -> Position {
        Position::new(0, 5)
    }

    pub fn cell_count(&self) -> usize {
        self.rows.max(0) as usize * self.cols.max(0) as usize
    }

    /// Rejects settings under which the opening layout, food placement or the
    /// tick timer would misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.growth_increment == 0 {
            return Err(ConfigError::ZeroGrowth);
        }

        let valid_side = 1..=MAX_DIMENSION;
        if !valid_side.contains(&self.rows) || !valid_side.contains(&self.cols) {
            return Err(ConfigError::DimensionOutOfRange {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let food = self.starting_food();
        let start = self.starting_snake().into_iter().chain(std::iter::once(food));
        for cell in start {
            if !in_bounds(cell, self.rows, self.cols) {
                return Err(ConfigError::StartOffBoard(cell));
            }
        }
        Ok(())
    }
}
