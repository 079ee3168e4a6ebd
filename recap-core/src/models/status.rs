use serde::{Deserialize, Serialize};

/// Coarse lifecycle classification of a meeting's processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Status/progress/message triple returned by the processing operations and
/// the status lookup. The two process operations report *all* problems this
/// way (status = failed) instead of raising.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResult {
    pub meeting_id: i64,
    pub status: ProcessingStatus,
    pub message: Option<String>,
    /// Percentage, 0-100.
    pub progress: u8,
}

impl StatusResult {
    pub fn completed(meeting_id: i64, message: impl Into<String>) -> Self {
        Self {
            meeting_id,
            status: ProcessingStatus::Completed,
            message: Some(message.into()),
            progress: 100,
        }
    }

    pub fn failed(meeting_id: i64, message: impl Into<String>) -> Self {
        Self {
            meeting_id,
            status: ProcessingStatus::Failed,
            message: Some(message.into()),
            progress: 0,
        }
    }
}
