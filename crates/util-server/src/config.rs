//! Command-line and environment configuration.

use clap::Parser;
use tracing::Level;

use crate::meeting::{MeetingConfig, DEFAULT_BASE_URL};

#[derive(Parser, Debug)]
#[command(name = "util-server", version)]
#[command(about = "MCP utility server: timezone-aware datetime tools and Read.AI meeting downloads", long_about = None)]
pub struct Args {
    /// Read.AI API key. Without it the meeting tool returns mock data.
    #[arg(long, env = "READ_AI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Read.AI API base URL
    #[arg(long, env = "READ_AI_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Log level (trace, debug, info, warn, error). Logs go to stderr.
    #[arg(long, env = "UTIL_SERVER_LOG", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn meeting_config(&self) -> MeetingConfig {
        MeetingConfig {
            api_key: self.api_key.clone(),
            base_url: self.api_url.clone(),
        }
    }

    /// The requested level; unrecognised names mean `info`.
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}
