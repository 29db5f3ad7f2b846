use clap::Parser;
use log::info;
use server::network::Server;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the listener to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5555")]
    port: u16,

    /// Simulation and broadcast rate in ticks per second
    #[arg(short, long, default_value = "60")]
    tick_rate: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    info!("Starting authoritative server...");
    let server = Server::bind(&format!("{}:{}", args.host, args.port), args.tick_rate).await?;
    server.run().await?;

    Ok(())
}
