//! `download_meeting_data`: fetch a meeting and render it as markdown.

use serde_json::Value;
use tracing::warn;

use super::ToolOutput;
use crate::meeting::{MeetingClient, MeetingData, MeetingError, Summary, Transcript};

pub async fn download_meeting_data(
    client: &MeetingClient,
    meeting_id: &str,
    include_transcript: bool,
    include_summary: bool,
) -> ToolOutput {
    match client.fetch(meeting_id, include_transcript, include_summary).await {
        Ok(data) => ToolOutput::success(
            render_meeting(&data, include_transcript, include_summary),
            None,
        ),
        Err(error) => {
            warn!(meeting_id, %error, "meeting download failed");
            ToolOutput::failure(render_error(meeting_id, &error))
        }
    }
}

fn render_error(meeting_id: &str, error: &MeetingError) -> String {
    let mut out = format!("❌ Error downloading meeting {meeting_id}:\n");
    out.push_str(&format!("   {error}\n"));

    if let MeetingError::Api { details, .. } = error {
        if !details.is_empty() {
            out.push_str(&format!("   Details: {details}\n"));
        }
    }
    if let Some(help) = error.config_help() {
        out.push_str(&format!("   Configuration: {help}\n"));
    }

    if let MeetingError::NotConfigured { mock_data } = error {
        match serde_json::to_string_pretty(mock_data) {
            Ok(json) => {
                out.push_str("\n📝 Mock data for development:\n");
                out.push_str(&json);
            }
            Err(e) => {
                return format!("❌ Unexpected error downloading meeting {meeting_id}: {e}");
            }
        }
    }
    out
}

fn render_meeting(data: &MeetingData, include_transcript: bool, include_summary: bool) -> String {
    let mut out = format!("✅ Meeting Data Downloaded: {}\n", data.meeting_id);
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    if let (true, Some(transcript)) = (include_transcript, &data.transcript) {
        out.push_str("## Transcript\n");
        match Transcript::from_value(transcript) {
            Some(transcript) => {
                for segment in &transcript.segments {
                    out.push_str(&format!(
                        "[{}] {}: {}\n",
                        segment.timestamp.as_deref().unwrap_or("??:??"),
                        segment.speaker.as_deref().unwrap_or("Speaker"),
                        segment.text.as_deref().unwrap_or("")
                    ));
                }
            }
            None => out.push_str(&pretty(transcript)),
        }
        out.push('\n');
    }

    if let (true, Some(raw)) = (include_summary, &data.summary) {
        out.push_str("## Summary\n");
        let summary = Summary::from_value(raw).unwrap_or_default();

        if let Some(points) = &summary.key_points {
            out.push_str("**Key Points:**\n");
            for point in points {
                out.push_str(&format!("- {point}\n"));
            }
            out.push('\n');
        }
        if let Some(items) = &summary.action_items {
            out.push_str("**Action Items:**\n");
            for item in items {
                out.push_str(&format!("- {item}\n"));
            }
            out.push('\n');
        }
        if let Some(minutes) = &summary.duration_minutes {
            out.push_str(&format!("**Duration:** {minutes} minutes\n"));
        }
        if let Some(count) = &summary.participant_count {
            out.push_str(&format!("**Participants:** {count}\n"));
        }

        if summary.key_points.is_none() && summary.action_items.is_none() {
            out.push_str(&pretty(raw));
            out.push('\n');
        }
    }

    out
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
