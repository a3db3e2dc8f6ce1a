use clap::Parser;
use log::info;
use server::config::GameConfig;
use server::network::Server;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = shared::DEFAULT_PORT)]
    port: u16,

    /// Milliseconds between frames
    #[arg(short, long, default_value = "150", value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Board height in cells
    #[arg(long, default_value_t = shared::DEFAULT_ROWS)]
    rows: i32,

    /// Board width in cells
    #[arg(long, default_value_t = shared::DEFAULT_COLS)]
    cols: i32,

    /// Cells added to the tail per food eaten
    #[arg(short, long, default_value = "3")]
    growth: usize,

    /// Snake length past which running out of room counts as a win
    #[arg(short, long, default_value = "620")]
    victory_threshold: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let config = GameConfig {
        rows: args.rows,
        cols: args.cols,
        growth_increment: args.growth,
        victory_threshold: args.victory_threshold,
        tick_interval: Duration::from_millis(args.tick_ms),
    };
    info!(
        "Board {}x{}, growth {}, tick {}ms",
        config.rows,
        config.cols,
        config.growth_increment,
        config.tick_interval.as_millis()
    );

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, config).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
