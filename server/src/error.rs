//! Failure kinds raised by the game engine and the connection tasks

use shared::GameEnd;
use std::fmt;

#[derive(Debug)]
pub enum GameError {
    /// A pending direction reversed the one being travelled. Logged, never fatal.
    IllegalMove,
    /// A control byte outside the key set. Ignored by the listener.
    InvalidKeyPressed(u8),
    OutOfBounds,
    SelfCollision,
    NoValidGrowthPath,
    ConnectionClosed,
    ReadError(std::io::Error),
}

impl GameError {
    /// Whether this failure ends the session.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameError::IllegalMove | GameError::InvalidKeyPressed(_))
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::IllegalMove => write!(f, "Illegal move entered"),
            GameError::InvalidKeyPressed(byte) => write!(f, "Invalid key pressed: {}", byte),
            GameError::OutOfBounds => write!(f, "Hit bounds"),
            GameError::SelfCollision => write!(f, "Snake hit itself"),
            GameError::NoValidGrowthPath => write!(f, "No valid growth path"),
            GameError::ConnectionClosed => write!(f, "User disconnected"),
            GameError::ReadError(e) => write!(f, "Read error: {}", e),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::ReadError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::ReadError(e)
    }
}

/// Terminal state of one connection's game.
#[derive(Debug)]
pub enum Outcome {
    Died(GameError),
    Won,
    Quit(GameError),
}

impl Outcome {
    /// The message announced to the client, if the game ended on the board.
    pub fn game_end(&self) -> Option<GameEnd> {
        match self {
            Outcome::Died(_) => Some(GameEnd::Died),
            Outcome::Won => Some(GameEnd::Won),
            Outcome::Quit(_) => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Died(reason) => write!(f, "died ({})", reason),
            Outcome::Won => write!(f, "won"),
            Outcome::Quit(reason) => write!(f, "quit ({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        assert!(!GameError::IllegalMove.is_terminal());
        assert!(!GameError::InvalidKeyPressed(b'x').is_terminal());
        assert!(GameError::OutOfBounds.is_terminal());
        assert!(GameError::SelfCollision.is_terminal());
        assert!(GameError::NoValidGrowthPath.is_terminal());
        assert!(GameError::ConnectionClosed.is_terminal());
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            Outcome::Died(GameError::OutOfBounds).game_end(),
            Some(GameEnd::Died)
        );
        assert_eq!(Outcome::Won.game_end(), Some(GameEnd::Won));
        assert_eq!(Outcome::Quit(GameError::ConnectionClosed).game_end(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: GameError = io.into();
        assert!(matches!(err, GameError::ReadError(_)));
        assert!(err.to_string().contains("reset"));
    }
}
