//! `util_server_status`: what is configured and which tools exist.

use super::TOOLS;
use crate::meeting::MeetingConfig;

pub fn util_server_status(config: &MeetingConfig) -> String {
    let mut status = String::from("Utility Server Status\n");
    status.push_str("===================\n\n");

    status.push_str("**Read.AI Meeting Downloader**\n");
    let available = if config.is_available() {
        "✅ Yes"
    } else {
        "❌ No (API key needed)"
    };
    status.push_str(&format!("- Available: {available}\n"));
    status.push_str(&format!("- API Base URL: {}\n", config.base_url));
    if !config.is_available() {
        status.push_str("- Configuration: Set READ_AI_API_KEY environment variable\n");
        status.push_str("- Development: Mock data available for testing\n");
    }
    status.push('\n');

    status.push_str("**Datetime Tools**\n");
    status.push_str("- Timezone database: IANA (bundled)\n");
    status.push_str("- Formats: iso, readable, timestamp, custom\n\n");

    status.push_str("**Server Information**\n");
    status.push_str("- Transport: MCP over stdio\n");
    status.push_str(&format!("- Version: {}\n", env!("CARGO_PKG_VERSION")));
    status.push_str(&format!("- Tools Available: {}\n", TOOLS.len()));
    status.push_str("- Purpose: General-purpose utilities for productivity\n\n");

    status.push_str("**Available Tools**\n");
    for (i, (name, description)) in TOOLS.iter().enumerate() {
        status.push_str(&format!("{}. `{}` - {}\n", i + 1, name, description));
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_unconfigured() {
        let status = util_server_status(&MeetingConfig::default());
        assert!(status.starts_with("Utility Server Status\n"));
        assert!(status.contains("- Available: ❌ No (API key needed)\n"));
        assert!(status.contains("- API Base URL: https://api.read.ai/v1\n"));
        assert!(status.contains("Mock data available"));
        assert!(status.contains("- Tools Available: 4\n"));
        assert!(status.contains("1. `get_current_datetime`"));
        assert!(status.contains("4. `util_server_status`"));
    }

    #[test]
    fn test_status_configured() {
        let config = MeetingConfig {
            api_key: Some("secret".to_string()),
            base_url: "https://example.test/v1".to_string(),
        };
        let status = util_server_status(&config);
        assert!(status.contains("- Available: ✅ Yes\n"));
        assert!(status.contains("- API Base URL: https://example.test/v1\n"));
        assert!(!status.contains("Set READ_AI_API_KEY"));
        assert!(!status.contains("secret"));
    }
}
