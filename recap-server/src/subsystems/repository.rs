//! Meeting repository: the five data-access operations over the meetings
//! table. Constructed explicitly and passed to handlers so tests can run
//! each case against its own in-memory pool.

use chrono::Utc;
use recap_core::error::RecapError;
use recap_core::models::meeting::{CreateMeetingInput, Meeting, UpdateMeetingInput};
use sqlx::SqlitePool;

const SELECT_COLUMNS: &str = "id, title, description, audio_file_path, transcript, summary, \
     tone_analysis, action_items, mind_map, duration, created_at, updated_at";

#[derive(Clone)]
pub struct MeetingRepository {
    pool: SqlitePool,
}

impl MeetingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new meeting. Every derived field starts NULL; both
    /// timestamps are set to the same instant.
    pub async fn create(&self, input: &CreateMeetingInput) -> Result<Meeting, RecapError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO meetings (title, description, audio_file_path, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.audio_file_path)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or(RecapError::NotFound { id })
    }

    /// All meetings, newest first. The id tiebreak keeps the order
    /// deterministic when two rows land in the same clock tick.
    pub async fn list(&self) -> Result<Vec<Meeting>, RecapError> {
        let rows = sqlx::query_as::<_, Meeting>(&format!(
            "SELECT {SELECT_COLUMNS} FROM meetings ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Meeting>, RecapError> {
        let row = sqlx::query_as::<_, Meeting>(&format!(
            "SELECT {SELECT_COLUMNS} FROM meetings WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Apply a partial update. Fields absent from the input are untouched,
    /// explicit nulls clear the column, and updated_at is always refreshed.
    /// Read-modify-write with last-write-wins; there is no version token.
    pub async fn update(&self, input: UpdateMeetingInput) -> Result<Meeting, RecapError> {
        let mut meeting = self
            .get_by_id(input.id)
            .await?
            .ok_or(RecapError::NotFound { id: input.id })?;

        if let Some(title) = input.title {
            meeting.title = title;
        }
        input.description.apply(&mut meeting.description);
        input.audio_file_path.apply(&mut meeting.audio_file_path);
        input.transcript.apply(&mut meeting.transcript);
        input.summary.apply(&mut meeting.summary);
        input.tone_analysis.apply(&mut meeting.tone_analysis);
        input.action_items.apply(&mut meeting.action_items);
        input.mind_map.apply(&mut meeting.mind_map);
        input.duration.apply(&mut meeting.duration);
        meeting.updated_at = Utc::now();

        sqlx::query(
            "UPDATE meetings SET title = ?, description = ?, audio_file_path = ?, \
             transcript = ?, summary = ?, tone_analysis = ?, action_items = ?, \
             mind_map = ?, duration = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&meeting.title)
        .bind(&meeting.description)
        .bind(&meeting.audio_file_path)
        .bind(&meeting.transcript)
        .bind(&meeting.summary)
        .bind(&meeting.tone_analysis)
        .bind(&meeting.action_items)
        .bind(&meeting.mind_map)
        .bind(meeting.duration)
        .bind(meeting.updated_at)
        .bind(meeting.id)
        .execute(&self.pool)
        .await?;

        Ok(meeting)
    }

    /// Remove a meeting. Reports whether a row was actually deleted; a
    /// missing id is not an error.
    pub async fn delete(&self, id: i64) -> Result<bool, RecapError> {
        let result = sqlx::query("DELETE FROM meetings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
