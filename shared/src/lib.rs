use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

pub const DEFAULT_PORT: u16 = 5003;
pub const DEFAULT_ROWS: i32 = 25;
pub const DEFAULT_COLS: i32 = 25;

/// Control byte the client sends to end the game.
pub const ESCAPE: u8 = 27;

pub const DIED_MESSAGE: &[u8] = b"You Died";
pub const WON_MESSAGE: &[u8] = b"You Won!";

/// A grid cell addressed by row and column. Travels as `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns the neighbouring cell one step in `direction`.
    pub fn step(&self, direction: Direction) -> Position {
        let (d_row, d_col) = direction.vector();
        Position {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl From<[i32; 2]> for Position {
    fn from(pair: [i32; 2]) -> Self {
        Position::new(pair[0], pair[1])
    }
}

impl From<Position> for [i32; 2] {
    fn from(pos: Position) -> Self {
        [pos.row, pos.col]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit (row, col) offset for one step.
    pub fn vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The two directions at right angles, in the order tail growth tries them.
    pub fn perpendiculars(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Down, Direction::Up],
        }
    }

    /// Direction that takes `from` to the orthogonally adjacent `to`.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| from.step(*direction) == to)
    }

    pub fn key(self) -> u8 {
        match self {
            Direction::Up => b'w',
            Direction::Down => b's',
            Direction::Left => b'a',
            Direction::Right => b'd',
        }
    }
}

/// A decoded client keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Turn(Direction),
    Quit,
}

impl ControlKey {
    /// Returns `None` for bytes the server ignores.
    pub fn from_byte(byte: u8) -> Option<ControlKey> {
        match byte {
            b'w' => Some(ControlKey::Turn(Direction::Up)),
            b'a' => Some(ControlKey::Turn(Direction::Left)),
            b's' => Some(ControlKey::Turn(Direction::Down)),
            b'd' => Some(ControlKey::Turn(Direction::Right)),
            ESCAPE => Some(ControlKey::Quit),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            ControlKey::Turn(direction) => direction.key(),
            ControlKey::Quit => ESCAPE,
        }
    }
}

pub fn in_bounds(pos: Position, rows: i32, cols: i32) -> bool {
    (0..rows).contains(&pos.row) && (0..cols).contains(&pos.col)
}

/// True when `pos` is occupied by any segment of `body`.
pub fn collides<'a, I>(body: I, pos: Position) -> bool
where
    I: IntoIterator<Item = &'a Position>,
{
    body.into_iter().any(|segment| *segment == pos)
}

/// True when no two segments of the body share a cell.
pub fn is_self_disjoint(body: &VecDeque<Position>) -> bool {
    body.iter()
        .enumerate()
        .all(|(i, segment)| !collides(body.iter().skip(i + 1), *segment))
}

/// One server-to-client state update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// The head advanced one cell and the tail followed.
    Move { head: Position },
    /// The head advanced, food moved, and `tail` cells were appended (nearest the
    /// old tail first). Also used as the opening snapshot of the whole body.
    Growth {
        food: Position,
        head: Position,
        tail: Vec<Position>,
    },
}

impl Frame {
    pub fn cells(&self) -> Vec<Position> {
        match self {
            Frame::Move { head } => vec![*head],
            Frame::Growth { food, head, tail } => {
                let mut cells = Vec::with_capacity(tail.len() + 2);
                cells.push(*food);
                cells.push(*head);
                cells.extend_from_slice(tail);
                cells
            }
        }
    }

    pub fn from_cells(cells: Vec<Position>) -> Result<Frame, ProtocolError> {
        match cells.len() {
            0 => Err(ProtocolError::EmptyFrame),
            1 => Ok(Frame::Move { head: cells[0] }),
            _ => {
                let mut cells = cells.into_iter();
                let food = cells.next().ok_or(ProtocolError::EmptyFrame)?;
                let head = cells.next().ok_or(ProtocolError::EmptyFrame)?;
                Ok(Frame::Growth {
                    food,
                    head,
                    tail: cells.collect(),
                })
            }
        }
    }

    /// Compact JSON, no trailing newline.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(serde_json::to_vec(&self.cells())?)
    }
}

/// How a game ended, as announced to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Died,
    Won,
}

impl GameEnd {
    pub fn message(self) -> &'static [u8] {
        match self {
            GameEnd::Died => DIED_MESSAGE,
            GameEnd::Won => WON_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Frame(Frame),
    GameOver(GameEnd),
}

#[derive(Debug)]
pub enum ProtocolError {
    Json(serde_json::Error),
    EmptyFrame,
    Unrecognized(Vec<u8>),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Json(e) => write!(f, "Malformed frame: {}", e),
            ProtocolError::EmptyFrame => write!(f, "Frame carried no cells"),
            ProtocolError::Unrecognized(bytes) => {
                write!(f, "Unrecognized payload: {:?}", String::from_utf8_lossy(bytes))
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<serde_json::Error> for ProtocolError {
    fn from(e: serde_json::Error) -> Self {
        ProtocolError::Json(e)
    }
}

/// Reassembles server messages from arbitrarily chunked stream reads.
///
/// Frames arrive back to back with no delimiter, so values are pulled out of the
/// buffer one at a time and incomplete trailing data is kept for the next read.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the next complete message, or `None` until more bytes arrive.
    pub fn next_message(&mut self) -> Option<Result<ServerMessage, ProtocolError>> {
        let start = match self.buffer.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(start) => start,
            None => {
                self.buffer.clear();
                return None;
            }
        };
        self.buffer.drain(..start);

        if self.buffer[0] != b'[' {
            return self.next_terminal_message();
        }

        let (result, consumed) = {
            let mut stream =
                serde_json::Deserializer::from_slice(&self.buffer).into_iter::<Vec<Position>>();
            match stream.next() {
                Some(Ok(cells)) => (Ok(cells), stream.byte_offset()),
                Some(Err(e)) if e.is_eof() => return None,
                Some(Err(e)) => (Err(e), self.resync_point()),
                None => return None,
            }
        };
        self.buffer.drain(..consumed);

        Some(
            result
                .map_err(ProtocolError::from)
                .and_then(Frame::from_cells)
                .map(ServerMessage::Frame),
        )
    }

    fn next_terminal_message(&mut self) -> Option<Result<ServerMessage, ProtocolError>> {
        for end in [GameEnd::Died, GameEnd::Won] {
            let message = end.message();
            if self.buffer.starts_with(message) {
                self.buffer.drain(..message.len());
                return Some(Ok(ServerMessage::GameOver(end)));
            }
            if message.starts_with(&self.buffer) {
                return None;
            }
        }
        let end = self.resync_point();
        let junk = self.buffer.drain(..end).collect();
        Some(Err(ProtocolError::Unrecognized(junk)))
    }

    /// First offset past the head of the buffer where a frame (`[[`) or a
    /// terminal message could begin. Bad bytes before it are discarded.
    fn resync_point(&self) -> usize {
        (1..self.buffer.len())
            .find(|&i| match self.buffer[i] {
                b'[' => self.buffer.get(i + 1).map_or(true, |next| *next == b'['),
                b'Y' => true,
                _ => false,
            })
            .unwrap_or(self.buffer.len())
    }
}
