use clap::Parser;
use client::network::Client;
use log::info;
use shared::protocol::Command;
use tokio::time::{interval, Duration};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short, long, default_value = "127.0.0.1:5555")]
    server: String,

    /// Keep moving in one direction: u, d, l or r (omit to idle)
    #[arg(short, long)]
    drift: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let drift = match args.drift.as_deref() {
        Some("u") => Some(Command::Up),
        Some("d") => Some(Command::Down),
        Some("l") => Some(Command::Left),
        Some("r") => Some(Command::Right),
        Some(other) => return Err(format!("unknown direction '{}'", other).into()),
        None => None,
    };

    let client = Client::connect(&args.server).await?;

    let mut ticker = interval(Duration::from_millis(1000 / 60));
    let mut frames: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(command) = drift {
                    client.send(command);
                }

                frames += 1;
                if frames % 60 == 0 {
                    match client.current_state().await {
                        Some(state) => {
                            let mut scores: Vec<(u32, u32)> = state
                                .players
                                .values()
                                .map(|p| (p.id, p.score))
                                .collect();
                            scores.sort_unstable();
                            info!(
                                "status {:?}, {} coins, scores {:?}",
                                state.status,
                                state.coins.len(),
                                scores
                            );
                        }
                        None => info!("Waiting for first snapshot..."),
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Disconnecting");
                client.close();
                break;
            }
        }
    }

    Ok(())
}
