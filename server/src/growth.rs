//! Backtracking tail growth
//!
//! When the snake eats, its tail is extended cell by cell. Each new cell must stay
//! on the grid, avoid the body and every cell already laid down, and be orthogonally
//! adjacent to the previous tail. At every step the two perpendicular turns are
//! tried before continuing straight; a dead end further down abandons the branch
//! and the next candidate is tried.

use crate::error::GameError;
use log::trace;
use shared::{collides, in_bounds, Direction, Position};
use std::collections::VecDeque;

/// Direction the tail points in: the step from the second-to-last cell to the last.
///
/// Falls back to `fallback` for a single-cell body.
pub fn tail_facing(body: &VecDeque<Position>, fallback: Direction) -> Direction {
    let len = body.len();
    if len < 2 {
        return fallback;
    }
    Direction::between(body[len - 2], body[len - 1]).unwrap_or(fallback)
}

/// Finds `count` new tail cells, ordered from nearest the old tail outward.
pub fn grow(
    body: &VecDeque<Position>,
    facing: Direction,
    count: usize,
    rows: i32,
    cols: i32,
) -> Result<Vec<Position>, GameError> {
    let tail = body.back().copied().ok_or(GameError::NoValidGrowthPath)?;
    let mut path = Vec::with_capacity(count);
    let bounds = (rows, cols);

    extend(body, &mut path, tail, facing, count, bounds)?;
    Ok(path)
}

fn extend(
    body: &VecDeque<Position>,
    path: &mut Vec<Position>,
    tail: Position,
    facing: Direction,
    remaining: usize,
    (rows, cols): (i32, i32),
) -> Result<(), GameError> {
    if remaining == 0 {
        return Ok(());
    }

    let [left, right] = facing.perpendiculars();
    let mut last_failure = GameError::NoValidGrowthPath;

    for candidate in [left, right, facing] {
        let cell = tail.step(candidate);

        if !in_bounds(cell, rows, cols) {
            last_failure = GameError::OutOfBounds;
            continue;
        }
        if collides(body, cell) || path.contains(&cell) {
            last_failure = GameError::SelfCollision;
            continue;
        }

        path.push(cell);
        match extend(body, path, cell, candidate, remaining - 1, (rows, cols)) {
            Ok(()) => return Ok(()),
            Err(e) => {
                path.pop();
                last_failure = e;
            }
        }
    }

    trace!(
        "No growth from {} facing {:?} with {} left ({})",
        tail,
        facing,
        remaining,
        last_failure
    );
    Err(GameError::NoValidGrowthPath)
}
