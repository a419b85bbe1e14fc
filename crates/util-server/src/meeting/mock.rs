use serde_json::json;

use super::types::MeetingData;

/// A small standup meeting used when no API key is configured.
pub fn mock_meeting(meeting_id: &str, include_transcript: bool, include_summary: bool) -> MeetingData {
    let transcript = include_transcript.then(|| {
        json!({
            "segments": [
                {
                    "speaker": "Alice",
                    "timestamp": "00:00",
                    "text": "Good morning everyone, let's start our standup."
                },
                {
                    "speaker": "Bob",
                    "timestamp": "00:30",
                    "text": "I completed the API integration yesterday."
                },
                {
                    "speaker": "Carol",
                    "timestamp": "01:00",
                    "text": "Great! I'm working on the frontend components."
                }
            ]
        })
    });

    let summary = include_summary.then(|| {
        json!({
            "key_points": [
                "Team standup meeting held",
                "Bob completed API integration",
                "Carol working on frontend components"
            ],
            "action_items": [
                "Carol to complete frontend by Friday",
                "Bob to review Carol's code"
            ],
            "duration_minutes": 15,
            "participant_count": 3
        })
    });

    MeetingData {
        meeting_id: meeting_id.to_string(),
        transcript,
        summary,
    }
}
