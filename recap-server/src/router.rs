//! Remote-procedure facade: binds each named procedure to one repository,
//! pipeline, or status function. Both transports (HTTP and the socket)
//! funnel through [`dispatch`].

use chrono::Utc;
use recap_core::error::RecapError;
use recap_core::models::meeting::DashboardData;
use recap_core::rpc::{RpcRequest, RpcResponse};
use recap_core::validate;
use sqlx::SqlitePool;

use crate::subsystems::pipeline::{self, StubTranscriber, TemplateAnalyzer};
use crate::subsystems::repository::MeetingRepository;
use crate::subsystems::status;

/// Envelope-producing wrapper used by the socket transport.
pub async fn handle_request(request: RpcRequest, pool: &SqlitePool) -> RpcResponse {
    match dispatch(request, pool).await {
        Ok(data) => RpcResponse::ok(data),
        Err(e) => RpcResponse::err(e.to_string()),
    }
}

/// Route one procedure call. Errors here are the raising kind (validation,
/// not-found, store); the two process procedures report their problems
/// inside the returned StatusResult instead.
pub async fn dispatch(
    request: RpcRequest,
    pool: &SqlitePool,
) -> Result<serde_json::Value, RecapError> {
    let repo = MeetingRepository::new(pool.clone());

    match request {
        RpcRequest::Healthcheck => Ok(serde_json::json!({
            "status": "ok",
            "timestamp": Utc::now().to_rfc3339(),
        })),
        RpcRequest::CreateMeeting(input) => {
            validate::validate_create(&input)?;
            let meeting = repo.create(&input).await?;
            tracing::info!(meeting_id = meeting.id, "Meeting created");
            Ok(serde_json::to_value(meeting)?)
        }
        RpcRequest::GetMeetings => {
            let meetings = repo.list().await?;
            Ok(serde_json::to_value(meetings)?)
        }
        RpcRequest::GetMeetingById(input) => match repo.get_by_id(input.id).await? {
            Some(meeting) => Ok(serde_json::to_value(meeting)?),
            None => Ok(serde_json::Value::Null),
        },
        RpcRequest::UpdateMeeting(input) => {
            validate::validate_update(&input)?;
            let meeting = repo.update(input).await?;
            Ok(serde_json::to_value(meeting)?)
        }
        RpcRequest::DeleteMeeting(input) => {
            let deleted = repo.delete(input.id).await?;
            if deleted {
                tracing::info!(meeting_id = input.id, "Meeting deleted");
            }
            Ok(serde_json::Value::Bool(deleted))
        }
        RpcRequest::ProcessAudio(input) => {
            let result = pipeline::process_from_audio(&repo, &StubTranscriber, &input).await;
            Ok(serde_json::to_value(result)?)
        }
        RpcRequest::ProcessText(input) => {
            let result =
                pipeline::process_from_text(&repo, &TemplateAnalyzer::default(), &input).await;
            Ok(serde_json::to_value(result)?)
        }
        RpcRequest::GetProcessingStatus(input) => {
            let result = status::processing_status(&repo, input.meeting_id).await?;
            Ok(serde_json::to_value(result)?)
        }
        RpcRequest::GetDashboardData(input) => {
            match repo.get_by_id(input.meeting_id).await? {
                Some(meeting) => Ok(serde_json::to_value(DashboardData::from(meeting))?),
                None => Ok(serde_json::Value::Null),
            }
        }
    }
}
