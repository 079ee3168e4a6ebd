//! Status deriver: classifies how far a meeting has progressed by looking at
//! which fields are populated, via a strict first-match priority ladder.

use recap_core::error::RecapError;
use recap_core::models::meeting::Meeting;
use recap_core::models::status::{ProcessingStatus, StatusResult};

use crate::subsystems::repository::MeetingRepository;

/// Pure classification. Ladder order matters: an attached audio file with no
/// transcript wins over everything else.
pub fn derive_status(meeting: &Meeting) -> StatusResult {
    let (status, progress, message) =
        if meeting.audio_file_path.is_some() && meeting.transcript.is_none() {
            (ProcessingStatus::Processing, 25, "Transcribing audio file")
        } else if meeting.transcript.is_some() && !meeting.has_all_artifacts() {
            (
                ProcessingStatus::Processing,
                60,
                "Processing transcript with AI",
            )
        } else if meeting.transcript.is_some() && meeting.has_all_artifacts() {
            (
                ProcessingStatus::Completed,
                100,
                "Meeting processing completed successfully",
            )
        } else {
            (ProcessingStatus::Pending, 0, "Waiting to start processing")
        };

    StatusResult {
        meeting_id: meeting.id,
        status,
        message: Some(message.to_string()),
        progress,
    }
}

/// Look up a meeting and derive its status. Unlike the process operations,
/// a missing id here is an error.
pub async fn processing_status(
    repo: &MeetingRepository,
    meeting_id: i64,
) -> Result<StatusResult, RecapError> {
    let meeting = repo
        .get_by_id(meeting_id)
        .await?
        .ok_or(RecapError::NotFound { id: meeting_id })?;
    Ok(derive_status(&meeting))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bare_meeting() -> Meeting {
        Meeting {
            id: 1,
            title: "t".to_string(),
            description: None,
            audio_file_path: None,
            transcript: None,
            summary: None,
            tone_analysis: None,
            action_items: None,
            mind_map: None,
            duration: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn fresh_meeting_is_pending() {
        let s = derive_status(&bare_meeting());
        assert_eq!(s.status, ProcessingStatus::Pending);
        assert_eq!(s.progress, 0);
        assert_eq!(s.message.as_deref(), Some("Waiting to start processing"));
    }

    #[test]
    fn audio_without_transcript_is_transcribing() {
        let mut m = bare_meeting();
        m.audio_file_path = Some("/tmp/a.wav".to_string());
        let s = derive_status(&m);
        assert_eq!(s.status, ProcessingStatus::Processing);
        assert_eq!(s.progress, 25);
        assert_eq!(s.message.as_deref(), Some("Transcribing audio file"));
    }

    #[test]
    fn transcript_with_missing_artifact_is_ai_processing() {
        let mut m = bare_meeting();
        m.transcript = Some("notes".to_string());
        m.summary = Some("s".to_string());
        m.tone_analysis = Some("t".to_string());
        m.action_items = Some("a".to_string());
        // mind_map still absent
        let s = derive_status(&m);
        assert_eq!(s.status, ProcessingStatus::Processing);
        assert_eq!(s.progress, 60);
        assert_eq!(s.message.as_deref(), Some("Processing transcript with AI"));
    }

    #[test]
    fn transcript_with_all_artifacts_is_completed() {
        let mut m = bare_meeting();
        m.transcript = Some("notes".to_string());
        m.summary = Some("s".to_string());
        m.tone_analysis = Some("t".to_string());
        m.action_items = Some("a".to_string());
        m.mind_map = Some("m".to_string());
        let s = derive_status(&m);
        assert_eq!(s.status, ProcessingStatus::Completed);
        assert_eq!(s.progress, 100);
    }

    #[test]
    fn audio_rung_wins_over_pending() {
        // Audio attached and transcript present: the first rung no longer
        // matches, so the transcript rungs decide.
        let mut m = bare_meeting();
        m.audio_file_path = Some("/tmp/a.wav".to_string());
        m.transcript = Some("notes".to_string());
        let s = derive_status(&m);
        assert_eq!(s.progress, 60);
    }

    #[tokio::test]
    async fn lookup_on_missing_id_is_not_found() {
        let repo = MeetingRepository::new(recap_core::db::memory_pool().await.unwrap());
        let err = processing_status(&repo, 404).await.unwrap_err();
        assert!(matches!(err, RecapError::NotFound { id: 404 }));
    }
}
