//! morph - command-line client for morph text transformation servers.
//!
//! Reads `ACTION MESSAGE` lines from a file (or stdin), sends each as an
//! MTP request over one TCP connection, then prints the server's framed
//! responses in arrival order.

mod input;

use clap::Parser;
use colored::Colorize;
use morph_client::{Client, ConnectionConfig, HandlerError};
use morph_protocol::{DEFAULT_HOST, DEFAULT_PORT};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "morph")]
#[command(about = "Send action/message requests to a morph server")]
#[command(version)]
struct Cli {
    /// Server hostname
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Script of ACTION MESSAGE lines to send; "-" reads stdin
    file: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; -v picks the default level, RUST_LOG overrides.
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let script = input::open(&cli.file).map_err(|e| {
        eprintln!("{}: could not open {}: {}", "Error".red(), cli.file, e);
        e
    })?;
    let requests = input::read_script(script).map_err(|e| {
        eprintln!("{}: {}", "Invalid script".red(), e);
        e
    })?;
    if requests.is_empty() {
        eprintln!("{}: script contains no requests", "Warning".yellow());
    }

    let config = ConnectionConfig::new(cli.host, cli.port);
    let mut client = Client::connect(&config).await.map_err(|e| {
        eprintln!("{}: {}", "Connection failed".red(), e);
        e
    })?;

    for request in &requests {
        client.send_request(request).await.map_err(|e| {
            eprintln!("{}: {}", "Send failed".red(), e);
            e
        })?;
    }
    tracing::debug!(requests = requests.len(), "all requests sent");

    let mut print = |payload: &[u8]| -> Result<(), HandlerError> {
        println!("{}", String::from_utf8_lossy(payload));
        Ok(())
    };
    let responses = client.drain_responses(&mut print).await.map_err(|e| {
        eprintln!("{}: {}", "Receive failed".red(), e);
        e
    })?;
    tracing::debug!(responses, "response stream finished");

    client.close().await?;
    Ok(())
}
