use clap::Parser;
use redis_tui::core::config::{self, ClientConfig};
use redis_tui::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "redis-tui", about = "Interactive terminal client for Redis")]
struct Args {
    /// Server address as host:port [default: 127.0.0.1:6379]
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // The logger is not up yet, so config problems go to stderr
    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("{e}; using defaults");
        ClientConfig::default()
    });
    let resolved = config::resolve(&file_config, args.address.as_deref());

    // Initialize file logger; the terminal belongs to the UI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!(
        "redis-tui starting up against {} (retry every {:?})",
        resolved.address,
        resolved.retry_delay
    );

    tui::run(resolved)
}
