//! # Snake Server Library
//!
//! The authoritative side of a snake game played over a raw TCP socket. Every
//! accepted connection gets its own board and its own pair of tasks; nothing is
//! shared between players.
//!
//! ## Module Organization
//!
//! ### Movement Module (`movement`)
//! Advances the head one cell per tick, detects walls and self-collision, and
//! decides which keystrokes may replace the pending direction.
//!
//! ### Growth Module (`growth`)
//! Backtracking search that lays down new tail cells after the snake eats,
//! turning before going straight and never folding back onto the body.
//!
//! ### Board Module (`board`)
//! The per-connection game state and the single per-tick update: move, eat,
//! grow, relocate food, and decide between death and victory when growth runs
//! out of room.
//!
//! ### Session Module (`session`)
//! The input listener and frame sender that share a board behind a mutex and
//! stop each other through a one-shot quit signal.
//!
//! ### Network Module (`network`)
//! The TCP accept loop.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::GameConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("0.0.0.0:5003", GameConfig::default()).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Wire Format
//!
//! The server writes compact JSON arrays of `[row, col]` pairs with no framing:
//! `[[head]]` for a plain move, `[[food], [head], [tail]...]` after growth, and the
//! bare text `You Died` or `You Won!` when the game ends. The client sends one
//! byte per keystroke: `w`, `a`, `s`, `d`, or escape.

pub mod board;
pub mod config;
pub mod error;
pub mod growth;
pub mod movement;
pub mod network;
pub mod session;
