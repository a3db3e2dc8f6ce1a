//! Head advancement and the direction-change rule

use crate::error::GameError;
use shared::{collides, in_bounds, Direction, Position};
use std::collections::VecDeque;

/// Whether a keystroke may replace the pending direction.
///
/// Reversing the direction last travelled would fold the head into the neck, and
/// re-pressing the pending direction changes nothing.
pub fn accepts_turn(requested: Direction, pending: Direction, processed: Direction) -> bool {
    requested != processed.opposite() && requested != pending
}

/// Cell the head would enter moving one step in `direction`.
pub fn next_head(
    body: &VecDeque<Position>,
    direction: Direction,
    rows: i32,
    cols: i32,
) -> Result<Position, GameError> {
    let head = body.front().copied().ok_or(GameError::IllegalMove)?;
    let candidate = head.step(direction);

    if !in_bounds(candidate, rows, cols) {
        return Err(GameError::OutOfBounds);
    }
    if collides(body, candidate) {
        return Err(GameError::SelfCollision);
    }

    Ok(candidate)
}

/// Moves the snake one cell: the new head goes in front and the tail is dropped.
/// The body is untouched when the move fails.
pub fn advance(
    body: &mut VecDeque<Position>,
    direction: Direction,
    rows: i32,
    cols: i32,
) -> Result<Position, GameError> {
    let head = next_head(body, direction, rows, cols)?;
    body.push_front(head);
    body.pop_back();
    Ok(head)
}
