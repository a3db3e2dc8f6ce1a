use clap::Parser;
use client::network::Client;
use client::rendering::final_message;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:5003")]
    server: String,

    /// Board height in cells, must match the server
    #[arg(long, default_value_t = shared::DEFAULT_ROWS)]
    rows: i32,

    /// Board width in cells, must match the server
    #[arg(long, default_value_t = shared::DEFAULT_COLS)]
    cols: i32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Controls: WASD or arrow keys to steer, Esc to quit");

    let client = Client::connect(&args.server, args.rows, args.cols).await?;
    let end = client.run().await?;

    println!("{}", final_message(end));

    Ok(())
}
