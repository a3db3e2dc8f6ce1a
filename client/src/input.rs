//! Keyboard capture and translation into control bytes

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, error};
use shared::{ControlKey, Direction};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Maps a terminal key press to a game control. WASD and the arrow keys steer;
/// Esc and Ctrl+C quit.
pub fn control_for(event: &KeyEvent) -> Option<ControlKey> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
        return Some(ControlKey::Quit);
    }

    match event.code {
        KeyCode::Char(c) if c.is_ascii() => ControlKey::from_byte(c.to_ascii_lowercase() as u8)
            .filter(|key| matches!(key, ControlKey::Turn(_))),
        KeyCode::Up => Some(ControlKey::Turn(Direction::Up)),
        KeyCode::Down => Some(ControlKey::Turn(Direction::Down)),
        KeyCode::Left => Some(ControlKey::Turn(Direction::Left)),
        KeyCode::Right => Some(ControlKey::Turn(Direction::Right)),
        KeyCode::Esc => Some(ControlKey::Quit),
        _ => None,
    }
}

/// Drops repeated presses of the key that was sent last.
#[derive(Debug, Default)]
pub struct InputManager {
    last_sent: Option<ControlKey>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the byte to send, or `None` when the key repeats the previous one.
    pub fn filter(&mut self, key: ControlKey) -> Option<u8> {
        if key != ControlKey::Quit && self.last_sent == Some(key) {
            return None;
        }
        self.last_sent = Some(key);
        Some(key.to_byte())
    }
}

/// Reads keys on a dedicated thread until the receiving side is dropped.
pub fn spawn_key_reader(tx: mpsc::UnboundedSender<ControlKey>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    error!("Error polling keyboard: {}", e);
                    break;
                }
            }

            match event::read() {
                Ok(Event::Key(key_event)) => {
                    if let Some(key) = control_for(&key_event) {
                        if tx.send(key).is_err() {
                            break;
                        }
                    }
                }
                Ok(other) => debug!("Ignored terminal event {:?}", other),
                Err(e) => {
                    error!("Error reading keyboard: {}", e);
                    break;
                }
            }
        }
    })
}
