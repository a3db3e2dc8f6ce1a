//! Per-connection task pair: input listener and frame sender
//!
//! Both tasks share one [`Board`] behind a mutex. The listener only changes the
//! pending direction; the sender owns simulation time. The lock is never held
//! across a socket read, a socket write or a tick sleep. Whichever task finishes
//! first fires the quit signal so the other stops at its next suspension point.

use crate::board::Board;
use crate::error::{GameError, Outcome};
use log::{debug, error, warn};
use shared::{ControlKey, Frame};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, Mutex};
use tokio::time::{interval, MissedTickBehavior};

pub type SharedBoard = Arc<Mutex<Board>>;

/// Single-fire stop signal seen by every subscriber.
#[derive(Debug, Clone)]
pub struct QuitSignal {
    sender: broadcast::Sender<()>,
}

impl QuitSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender }
    }

    pub fn fire(&self) {
        // No receivers left means both tasks are already done
        let _ = self.sender.send(());
    }

    /// Subscribe before spawning the task that waits on it.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }
}

impl Default for QuitSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// One game on one connection.
pub struct Session {
    board: SharedBoard,
    tick_interval: Duration,
}

impl Session {
    pub fn new(board: Board, tick_interval: Duration) -> Self {
        Self {
            board: Arc::new(Mutex::new(board)),
            tick_interval,
        }
    }

    pub fn board(&self) -> SharedBoard {
        Arc::clone(&self.board)
    }

    /// Runs the listener and sender until the game ends or the client leaves.
    pub async fn run<R, W>(self, reader: R, writer: W) -> Outcome
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let quit = QuitSignal::new();
        let sender_stop = quit.subscribe();
        let listener_stop = quit.subscribe();

        let mut sender = tokio::spawn(send_frames(
            Arc::clone(&self.board),
            writer,
            self.tick_interval,
            quit.clone(),
            sender_stop,
        ));
        let mut listener = tokio::spawn(listen_for_input(
            Arc::clone(&self.board),
            reader,
            quit.clone(),
            listener_stop,
        ));

        // A task that panicked never fired quit itself
        let (sent, heard) = tokio::select! {
            sent = &mut sender => {
                quit.fire();
                (sent, listener.await)
            }
            heard = &mut listener => {
                quit.fire();
                (sender.await, heard)
            }
        };

        match (sent, heard) {
            (Ok(outcome), _) if outcome.game_end().is_some() => outcome,
            (_, Ok(outcome)) => outcome,
            (Ok(outcome), Err(e)) => {
                error!("Input listener task failed: {}", e);
                outcome
            }
            (Err(sent), Err(heard)) => {
                error!("Session tasks failed: {} / {}", sent, heard);
                Outcome::Quit(GameError::ConnectionClosed)
            }
        }
    }
}

/// Reads one control byte at a time and steers the snake.
pub async fn listen_for_input<R>(
    board: SharedBoard,
    mut reader: R,
    quit: QuitSignal,
    mut stop: broadcast::Receiver<()>,
) -> Outcome
where
    R: AsyncRead + Unpin,
{
    let mut byte = [0u8; 1];

    loop {
        let read = tokio::select! {
            _ = stop.recv() => return Outcome::Quit(GameError::ConnectionClosed),
            read = reader.read(&mut byte) => read,
        };

        let key = match read {
            Ok(0) => {
                quit.fire();
                return Outcome::Quit(GameError::ConnectionClosed);
            }
            Ok(_) => byte[0],
            Err(e) => {
                quit.fire();
                return Outcome::Quit(GameError::from(e));
            }
        };

        match ControlKey::from_byte(key) {
            Some(ControlKey::Turn(direction)) => {
                let accepted = board.lock().await.change_direction(direction);
                if !accepted {
                    debug!("Ignored turn {:?}", direction);
                }
            }
            Some(ControlKey::Quit) => {
                quit.fire();
                return Outcome::Quit(GameError::ConnectionClosed);
            }
            None => debug!("{}", GameError::InvalidKeyPressed(key)),
        }
    }
}

/// Sends the opening snapshot, then ticks the board and streams one frame per tick.
pub async fn send_frames<W>(
    board: SharedBoard,
    mut writer: W,
    tick_interval: Duration,
    quit: QuitSignal,
    mut stop: broadcast::Receiver<()>,
) -> Outcome
where
    W: AsyncWrite + Unpin,
{
    let snapshot = board.lock().await.snapshot();
    if let Err(e) = write_frame(&mut writer, &snapshot).await {
        quit.fire();
        return Outcome::Quit(e);
    }

    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = stop.recv() => return Outcome::Quit(GameError::ConnectionClosed),
            _ = ticker.tick() => {}
        }

        let step = {
            let mut board = board.lock().await;
            match board.update() {
                Ok(grown) => Ok(board.frame(grown)),
                Err(outcome) => Err(outcome),
            }
        };

        match step {
            Ok(frame) => {
                if let Err(e) = write_frame(&mut writer, &frame).await {
                    quit.fire();
                    return Outcome::Quit(e);
                }
            }
            Err(outcome) => {
                if let Some(end) = outcome.game_end() {
                    if let Err(e) = writer.write_all(end.message()).await {
                        debug!("Could not deliver final message: {}", e);
                    }
                }
                if let Err(e) = writer.shutdown().await {
                    debug!("Could not shut down the connection: {}", e);
                }
                quit.fire();
                return outcome;
            }
        }
    }
}

async fn write_frame<W>(writer: &mut W, frame: &Frame) -> Result<(), GameError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = match frame.encode() {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to encode frame: {}", e);
            return Ok(());
        }
    };

    writer.write_all(&bytes).await.map_err(|e| {
        warn!("Frame write failed: {}", e);
        GameError::ConnectionClosed
    })?;
    writer.flush().await.map_err(|_| GameError::ConnectionClosed)
}
