//! TCP accept loop handing each connection its own board and task pair

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::Outcome;
use crate::session::Session;
use log::{error, info};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};

/// Accepts players and runs one independent game per connection.
pub struct Server {
    listener: TcpListener,
    config: GameConfig,
}

impl Server {
    pub async fn bind(addr: &str, config: GameConfig) -> Result<Self, Box<dyn std::error::Error>> {
        config.validate()?;
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server { listener, config })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. A failed accept or a finished game never stops the server.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Server started successfully");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    info!("Player connected from {}", peer);
                    let config = self.config.clone();
                    tokio::spawn(async move {
                        let outcome = handle_connection(stream, &config).await;
                        info!("Game with {} ended: {}", peer, outcome);
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Plays one game to completion on an accepted stream.
pub async fn handle_connection(stream: TcpStream, config: &GameConfig) -> Outcome {
    if let Err(e) = stream.set_nodelay(true) {
        error!("Failed to disable Nagle's algorithm: {}", e);
    }

    let (reader, writer) = stream.into_split();
    let session = Session::new(Board::new(config), config.tick_interval);
    session.run(reader, writer).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Frame, FrameDecoder, ServerMessage, ESCAPE};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let server = Server::bind("127.0.0.1:0", GameConfig::default())
            .await
            .unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_invalid_address_fails() {
        assert!(Server::bind("not-an-address", GameConfig::default())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_bind_rejects_invalid_config() {
        let tiny = GameConfig {
            rows: 10,
            cols: 10,
            ..GameConfig::default()
        };
        assert!(Server::bind("127.0.0.1:0", tiny).await.is_err());

        let no_growth = GameConfig {
            growth_increment: 0,
            ..GameConfig::default()
        };
        assert!(Server::bind("127.0.0.1:0", no_growth).await.is_err());
    }

    #[tokio::test]
    async fn test_connection_gets_snapshot_then_quits() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let config = GameConfig {
            tick_interval: Duration::from_millis(10),
            ..GameConfig::default()
        };

        let server_side = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            handle_connection(stream, &config).await
        });

        let mut client = TcpStream::connect(addr).await.unwrap();
        let mut decoder = FrameDecoder::new();
        let mut buffer = [0u8; 256];
        let first = loop {
            if let Some(message) = decoder.next_message() {
                break message.unwrap();
            }
            let n = client.read(&mut buffer).await.unwrap();
            assert!(n > 0, "server closed before the snapshot");
            decoder.extend(&buffer[..n]);
        };
        match first {
            ServerMessage::Frame(Frame::Growth { tail, .. }) => assert_eq!(tail.len(), 3),
            other => panic!("Expected snapshot, got {:?}", other),
        }

        client.write_all(&[ESCAPE]).await.unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(2), server_side)
            .await
            .expect("connection did not close")
            .unwrap();
        assert!(matches!(outcome, Outcome::Quit(_)));
    }
}
