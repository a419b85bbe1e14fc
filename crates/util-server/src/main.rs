//! util-server
//!
//! MCP server exposing utility tools over stdio:
//! - get_current_datetime: current time in any IANA zone, four formats
//! - calculate_time_difference: signed duration between two datetimes
//! - download_meeting_data: Read.AI transcripts and summaries (mock data without a key)
//! - util_server_status: configuration and tool overview

mod config;
mod mcp;
mod meeting;
mod tools;

use anyhow::{Context, Result};
use clap::Parser;
use time_engine::{BundledZones, SystemClock};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use config::Args;
use mcp::Server;
use meeting::MeetingClient;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the protocol, so logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.level())
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let meeting_config = args.meeting_config();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        protocol = mcp::PROTOCOL_VERSION,
        meeting_api = %meeting_config.base_url,
        meeting_api_configured = meeting_config.is_available(),
        "util-server starting"
    );

    let meetings = MeetingClient::new(meeting_config).context("Failed to build HTTP client")?;
    let server = Server::new(Box::new(SystemClock), Box::new(BundledZones), meetings);

    mcp::serve(
        &server,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    info!("util-server shutting down");
    Ok(())
}
