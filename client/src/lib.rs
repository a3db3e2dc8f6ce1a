//! # Snake Client Library
//!
//! A terminal front end for the snake server. The server owns the game; the
//! client only forwards keystrokes and mirrors the snake from the frames it
//! receives.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! Rebuilds the snake locally from move and growth frames. The first frame on a
//! connection is a full snapshot, so the mirror never has to guess.
//!
//! ### Input Module (`input`)
//! Reads the keyboard on a dedicated thread, maps WASD, arrows and escape to
//! control keys, and drops repeated presses before they reach the socket.
//!
//! ### Network Module (`network`)
//! Connects to the server and relays bytes in both directions until the game
//! ends, the player quits, or the server hangs up.
//!
//! ### Rendering Module (`rendering`)
//! Draws the bordered board into the alternate screen and restores the
//! terminal when dropped.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//! use client::rendering::final_message;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::connect("127.0.0.1:5003", 25, 25).await?;
//!     let end = client.run().await?;
//!     println!("{}", final_message(end));
//!     Ok(())
//! }
//! ```

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
