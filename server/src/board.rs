//! Authoritative per-connection game state

use crate::config::GameConfig;
use crate::error::{GameError, Outcome};
use crate::{growth, movement};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{collides, in_bounds, is_self_disjoint, Direction, Frame, Position};
use std::collections::VecDeque;

/// Snake, food and steering state for one connection.
///
/// The board is only ever touched behind its session's lock: the input listener
/// changes the pending direction and the frame sender runs [`Board::update`].
#[derive(Debug)]
pub struct Board {
    rows: i32,
    cols: i32,
    snake: VecDeque<Position>,
    food: Position,
    /// Latest accepted keystroke, applied on the next tick.
    last_input: Direction,
    /// Direction the head actually moved on the last tick.
    last_processed: Direction,
    growth_increment: usize,
    victory_threshold: usize,
    cell_count: usize,
    rng: StdRng,
}

impl Board {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_state(
            config,
            config.starting_snake(),
            config.starting_food(),
            config.starting_direction(),
        )
    }

    /// Builds a board from an explicit layout. An empty snake falls back to the
    /// default starting snake.
    pub fn with_state(
        config: &GameConfig,
        snake: Vec<Position>,
        food: Position,
        direction: Direction,
    ) -> Self {
        let snake = if snake.is_empty() {
            config.starting_snake()
        } else {
            snake
        };

        Self {
            rows: config.rows,
            cols: config.cols,
            snake: snake.into(),
            food,
            last_input: direction,
            last_processed: direction,
            // Eating must always grow, or the food move never reaches the client
            growth_increment: config.growth_increment.max(1),
            victory_threshold: config.victory_threshold,
            cell_count: config.cell_count(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Makes food placement reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn snake(&self) -> &VecDeque<Position> {
        &self.snake
    }

    pub fn head(&self) -> Position {
        self.snake[0]
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn last_input(&self) -> Direction {
        self.last_input
    }

    pub fn last_processed(&self) -> Direction {
        self.last_processed
    }

    pub fn dimensions(&self) -> (i32, i32) {
        (self.rows, self.cols)
    }

    /// Records a keystroke for the next tick. Returns false when it was rejected.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if !movement::accepts_turn(direction, self.last_input, self.last_processed) {
            return false;
        }
        self.last_input = direction;
        true
    }

    /// Advances the game by one tick and returns how many cells were grown.
    pub fn update(&mut self) -> Result<usize, Outcome> {
        let mut direction = self.last_input;
        if direction == self.last_processed.opposite() {
            warn!(
                "{}: {:?} reverses {:?}, keeping course",
                GameError::IllegalMove,
                direction,
                self.last_processed
            );
            direction = self.last_processed;
            self.last_input = direction;
        }

        let head = movement::advance(&mut self.snake, direction, self.rows, self.cols)
            .map_err(Outcome::Died)?;
        self.last_processed = direction;

        if head != self.food {
            return Ok(0);
        }
        self.feed()
    }

    /// Grows after eating and moves the food somewhere free, growing again each
    /// time the random pick lands on the snake.
    fn feed(&mut self) -> Result<usize, Outcome> {
        let mut grown = 0;

        loop {
            if let Err(e) = self.grow_tail() {
                return Err(self.growth_failure(e));
            }
            grown += self.growth_increment;

            if self.snake.len() >= self.cell_count {
                return Err(Outcome::Won);
            }

            let candidate = Position::new(
                self.rng.gen_range(0..self.rows),
                self.rng.gen_range(0..self.cols),
            );
            if !collides(&self.snake, candidate) {
                self.food = candidate;
                return Ok(grown);
            }
            debug!("Food landed on the snake at {}, growing again", candidate);
        }
    }

    fn grow_tail(&mut self) -> Result<(), GameError> {
        let facing = growth::tail_facing(&self.snake, self.last_processed.opposite());
        let path = growth::grow(
            &self.snake,
            facing,
            self.growth_increment,
            self.rows,
            self.cols,
        )?;
        self.snake.extend(path);
        Ok(())
    }

    /// A snake that can no longer grow has either filled the grid or boxed itself in.
    fn growth_failure(&self, error: GameError) -> Outcome {
        if self.snake.len() > self.victory_threshold {
            Outcome::Won
        } else {
            Outcome::Died(error)
        }
    }

    /// The frame describing the tick that grew `grown` cells.
    pub fn frame(&self, grown: usize) -> Frame {
        if grown == 0 {
            return Frame::Move { head: self.head() };
        }
        let start = self.snake.len().saturating_sub(grown).max(1);
        Frame::Growth {
            food: self.food,
            head: self.head(),
            tail: self.snake.range(start..).copied().collect(),
        }
    }

    /// Full state in growth-frame shape, sent when a client first connects.
    pub fn snapshot(&self) -> Frame {
        Frame::Growth {
            food: self.food,
            head: self.head(),
            tail: self.snake.iter().skip(1).copied().collect(),
        }
    }

    /// Head on the grid, no overlapping segments, food off the snake.
    pub fn is_settled(&self) -> bool {
        !self.snake.is_empty()
            && in_bounds(self.head(), self.rows, self.cols)
            && is_self_disjoint(&self.snake)
            && !collides(&self.snake, self.food)
    }
}
