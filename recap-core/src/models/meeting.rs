use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::patch::Patch;

/// One persisted meeting row: the caller-supplied fields plus the artifacts
/// the processing pipeline derives from a transcript. All derived fields are
/// NULL until processing runs.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub audio_file_path: Option<String>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub tone_analysis: Option<String>,
    pub action_items: Option<String>,
    pub mind_map: Option<String>,
    /// Seconds; set only by the audio path.
    pub duration: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meeting {
    /// True when all four transcript-derived artifacts are present.
    pub fn has_all_artifacts(&self) -> bool {
        self.summary.is_some()
            && self.tone_analysis.is_some()
            && self.action_items.is_some()
            && self.mind_map.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateMeetingInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub audio_file_path: Option<String>,
}

/// Partial update for a meeting. Every nullable column is a [`Patch`] so the
/// wire format distinguishes "not mentioned" from "set to null"; `title` is
/// NOT NULL in the store, so its slot is a plain Option.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateMeetingInput {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub description: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub audio_file_path: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub transcript: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub summary: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub tone_analysis: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub action_items: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub mind_map: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub duration: Patch<i64>,
}

/// Dashboard projection: the full meeting plus the four artifacts mirrored
/// into a components block for direct consumption by display widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub meeting: Meeting,
    pub components: DashboardComponents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardComponents {
    pub summary: Option<String>,
    pub tone_analysis: Option<String>,
    pub action_items: Option<String>,
    pub mind_map: Option<String>,
}

impl From<Meeting> for DashboardData {
    fn from(meeting: Meeting) -> Self {
        let components = DashboardComponents {
            summary: meeting.summary.clone(),
            tone_analysis: meeting.tone_analysis.clone(),
            action_items: meeting.action_items.clone(),
            mind_map: meeting.mind_map.clone(),
        };
        Self { meeting, components }
    }
}
