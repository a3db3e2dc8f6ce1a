//! Local mirror of the server's snake, rebuilt from frame deltas

use log::debug;
use shared::{Frame, GameEnd, Position, ServerMessage};
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct ClientGameState {
    snake: VecDeque<Position>,
    food: Option<Position>,
    ended: Option<GameEnd>,
    frames: u64,
}

impl ClientGameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snake(&self) -> &VecDeque<Position> {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn ended(&self) -> Option<GameEnd> {
        self.ended
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn apply_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Frame(frame) => self.apply_frame(frame),
            ServerMessage::GameOver(end) => self.ended = Some(end),
        }
    }

    /// A move shifts the body forward by one cell. A growth frame does the same and
    /// then appends the new tail cells; on an empty mirror it is the full snapshot.
    pub fn apply_frame(&mut self, frame: Frame) {
        self.frames += 1;

        match frame {
            Frame::Move { head } => self.advance(head),
            Frame::Growth { food, head, tail } => {
                self.food = Some(food);
                if self.snake.is_empty() {
                    debug!("Snapshot with {} cells", tail.len() + 1);
                    self.snake.push_back(head);
                } else {
                    self.advance(head);
                }
                self.snake.extend(tail);
            }
        }
    }

    fn advance(&mut self, head: Position) {
        self.snake.push_front(head);
        if self.snake.len() > 1 {
            self.snake.pop_back();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(list: &[(i32, i32)]) -> Vec<Position> {
        list.iter().map(|&(r, c)| Position::new(r, c)).collect()
    }

    fn snapshot() -> Frame {
        Frame::Growth {
            food: Position::new(0, 5),
            head: Position::new(12, 12),
            tail: cells(&[(13, 12), (14, 12), (15, 12)]),
        }
    }

    #[test]
    fn test_snapshot_fills_empty_mirror() {
        let mut state = ClientGameState::new();
        state.apply_frame(snapshot());

        assert_eq!(
            state.snake().iter().copied().collect::<Vec<_>>(),
            cells(&[(12, 12), (13, 12), (14, 12), (15, 12)])
        );
        assert_eq!(state.food(), Some(Position::new(0, 5)));
        assert_eq!(state.frames(), 1);
    }

    #[test]
    fn test_move_shifts_body() {
        let mut state = ClientGameState::new();
        state.apply_frame(snapshot());
        state.apply_frame(Frame::Move {
            head: Position::new(11, 12),
        });

        assert_eq!(
            state.snake().iter().copied().collect::<Vec<_>>(),
            cells(&[(11, 12), (12, 12), (13, 12), (14, 12)])
        );
    }

    #[test]
    fn test_growth_after_snapshot_matches_server_body() {
        let mut state = ClientGameState::new();
        state.apply_frame(snapshot());
        state.apply_frame(Frame::Growth {
            food: Position::new(3, 3),
            head: Position::new(11, 12),
            tail: cells(&[(14, 11), (15, 11), (15, 10)]),
        });

        assert_eq!(
            state.snake().iter().copied().collect::<Vec<_>>(),
            cells(&[
                (11, 12),
                (12, 12),
                (13, 12),
                (14, 12),
                (14, 11),
                (15, 11),
                (15, 10)
            ])
        );
        assert_eq!(state.food(), Some(Position::new(3, 3)));
    }

    #[test]
    fn test_game_over_is_recorded() {
        let mut state = ClientGameState::new();
        state.apply_message(ServerMessage::GameOver(GameEnd::Won));
        assert_eq!(state.ended(), Some(GameEnd::Won));
    }
}
