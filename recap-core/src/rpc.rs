//! Remote-procedure envelope shared by both transports (HTTP JSON and the
//! MessagePack socket). A request is a single JSON/msgpack map carrying a
//! `procedure` tag plus that procedure's input fields.

use serde::{Deserialize, Serialize};

use crate::models::meeting::{CreateMeetingInput, UpdateMeetingInput};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "procedure", rename_all = "camelCase")]
pub enum RpcRequest {
    Healthcheck,
    CreateMeeting(CreateMeetingInput),
    GetMeetings,
    GetMeetingById(MeetingIdInput),
    UpdateMeeting(UpdateMeetingInput),
    DeleteMeeting(MeetingIdInput),
    ProcessAudio(ProcessAudioInput),
    ProcessText(ProcessTextInput),
    GetProcessingStatus(MeetingIdCamelInput),
    GetDashboardData(MeetingIdCamelInput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingIdInput {
    pub id: i64,
}

/// The lookup procedures take `meetingId` on the wire where the processing
/// procedures take `meeting_id`; both spellings are kept for compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingIdCamelInput {
    #[serde(rename = "meetingId")]
    pub meeting_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessAudioInput {
    pub meeting_id: i64,
    pub audio_file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessTextInput {
    pub meeting_id: i64,
    pub transcript: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RpcResponse {
    pub status: String,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub version: String,
}

impl RpcResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            status: "ok".to_string(),
            data: Some(data),
            error: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(msg.into()),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
