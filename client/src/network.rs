use crate::game::ClientGameState;
use crate::input::{spawn_key_reader, InputManager};
use crate::rendering::Renderer;
use log::{info, warn};
use shared::{ControlKey, FrameDecoder, GameEnd};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

const READ_BUFFER: usize = 4096;

pub struct Client {
    stream: TcpStream,
    rows: i32,
    cols: i32,
}

impl Client {
    pub async fn connect(
        server_addr: &str,
        rows: i32,
        cols: i32,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Connecting to {}", server_addr);
        let stream = TcpStream::connect(server_addr).await?;
        stream.set_nodelay(true)?;
        info!("Connected");

        Ok(Client { stream, rows, cols })
    }

    /// Takes over the terminal until the game ends. Returns how it ended, or
    /// `None` if the player quit or the server went away.
    pub async fn run(self) -> Result<Option<GameEnd>, Box<dyn std::error::Error>> {
        let (key_tx, key_rx) = mpsc::unbounded_channel();
        let mut renderer = Renderer::new(self.rows, self.cols)?;
        let _keys = spawn_key_reader(key_tx);

        let (reader, writer) = self.stream.into_split();
        play(reader, writer, key_rx, |state| renderer.render(state)).await
    }
}

/// Relays keys to the server and server messages to `draw` until either side stops.
pub async fn play<R, W, F>(
    mut reader: R,
    mut writer: W,
    mut keys: mpsc::UnboundedReceiver<ControlKey>,
    mut draw: F,
) -> Result<Option<GameEnd>, Box<dyn std::error::Error>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    F: FnMut(&ClientGameState) -> std::io::Result<()>,
{
    let mut state = ClientGameState::new();
    let mut decoder = FrameDecoder::new();
    let mut input = InputManager::new();
    let mut buffer = [0u8; READ_BUFFER];

    loop {
        tokio::select! {
            read = reader.read(&mut buffer) => {
                let n = read?;
                if n == 0 {
                    warn!("Server closed the connection");
                    return Ok(state.ended());
                }
                decoder.extend(&buffer[..n]);

                while let Some(message) = decoder.next_message() {
                    match message {
                        Ok(message) => state.apply_message(message),
                        Err(e) => warn!("Dropped undecodable data: {}", e),
                    }
                }
                if let Some(end) = state.ended() {
                    return Ok(Some(end));
                }
                draw(&state)?;
            },

            key = keys.recv() => {
                let Some(key) = key else {
                    return Ok(None);
                };
                if let Some(byte) = input.filter(key) {
                    writer.write_all(&[byte]).await?;
                }
                if key == ControlKey::Quit {
                    return Ok(None);
                }
            },
        }
    }
}
