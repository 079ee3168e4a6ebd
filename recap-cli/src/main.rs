//! recap-cli — terminal frontend for the Recap meeting-assistant server
//!
//! Talks to the server's POST /rpc endpoint and renders meetings, processing
//! status, and the dashboard as plain text. Holds the same client-side state
//! the web dashboard would: the meeting list, the selected meeting, and the
//! latest dashboard snapshot.
//!
//! # Subcommands
//! - `list`                                  — meeting cards, newest first
//! - `create <title> [-d desc] [-a audio]`   — create a meeting
//! - `show <id>`                             — one meeting in full
//! - `update <id> [...]`                     — partial update (explicit clears supported)
//! - `delete <id>`                           — delete a meeting
//! - `process-text <id> [text | --file f]`   — run the text pipeline
//! - `process-audio <id> <path>`             — run the audio pipeline
//! - `status <id>`                           — processing status line
//! - `dashboard <id>`                        — dashboard grid
//! - `health`                                — server health

use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_SERVER: &str = "http://127.0.0.1:8780";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "recap-cli",
    version,
    about = "Recap meeting assistant — terminal client"
)]
struct Cli {
    /// Recap HTTP server URL (overrides RECAP_SERVER_URL env var)
    #[arg(long, env = "RECAP_SERVER_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List all meetings, newest first
    List,

    /// Create a new meeting
    Create {
        /// Meeting title
        title: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,

        /// Optional audio file path to attach
        #[arg(short, long)]
        audio: Option<String>,
    },

    /// Show one meeting in full
    Show {
        /// Meeting id
        id: i64,
    },

    /// Update fields of a meeting; omitted fields are untouched
    Update {
        /// Meeting id
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Clear the description (sends an explicit null)
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,

        #[arg(long)]
        transcript: Option<String>,

        /// Clear the transcript
        #[arg(long, conflicts_with = "transcript")]
        clear_transcript: bool,

        /// Duration in seconds
        #[arg(long)]
        duration: Option<i64>,

        /// Clear the duration
        #[arg(long, conflicts_with = "duration")]
        clear_duration: bool,
    },

    /// Delete a meeting
    Delete {
        /// Meeting id
        id: i64,
    },

    /// Process a pasted transcript through the pipeline
    ProcessText {
        /// Meeting id
        id: i64,

        /// Transcript text (or use --file)
        transcript: Option<String>,

        /// Read the transcript from a file
        #[arg(short, long, conflicts_with = "transcript")]
        file: Option<String>,
    },

    /// Process an attached audio file through the pipeline
    ProcessAudio {
        /// Meeting id
        id: i64,

        /// Audio file path as known to the server
        audio_file_path: String,
    },

    /// Show processing status for a meeting
    Status {
        /// Meeting id
        id: i64,
    },

    /// Show the dashboard for a meeting
    Dashboard {
        /// Meeting id
        id: i64,
    },

    /// Show Recap server health
    Health,
}

// ============================================================================
// Wire types (mirrors of the server's JSON shapes)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
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
    pub duration: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResult {
    pub meeting_id: i64,
    pub status: String,
    pub message: Option<String>,
    pub progress: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardData {
    pub meeting: Meeting,
    pub components: DashboardComponents,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardComponents {
    pub summary: Option<String>,
    pub tone_analysis: Option<String>,
    pub action_items: Option<String>,
    pub mind_map: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    status: String,
    data: Option<Value>,
    error: Option<String>,
}

// ============================================================================
// Client state
// ============================================================================

/// Client-side state: the cached meeting list, the selected meeting, and the
/// latest dashboard snapshot. Mirrors what the web dashboard holds in memory.
#[derive(Debug, Default)]
pub struct AppState {
    pub meetings: Vec<Meeting>,
    pub selected: Option<Meeting>,
    pub dashboard: Option<DashboardData>,
}

impl AppState {
    pub fn set_meetings(&mut self, meetings: Vec<Meeting>) {
        // Keep the selection pointing at the fresh copy of the same row.
        if let Some(sel) = &self.selected {
            self.selected = meetings.iter().find(|m| m.id == sel.id).cloned();
        }
        self.meetings = meetings;
    }

    pub fn select(&mut self, id: i64) -> Option<&Meeting> {
        self.selected = self.meetings.iter().find(|m| m.id == id).cloned();
        if self.selected.is_none() {
            self.dashboard = None;
        }
        self.selected.as_ref()
    }
}

// ============================================================================
// RPC client
// ============================================================================

struct RpcClient {
    server: String,
    client: reqwest::blocking::Client,
}

impl RpcClient {
    fn new(server: &str) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            server: server.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Call one procedure; unwraps the response envelope.
    fn call(&self, payload: Value) -> anyhow::Result<Value> {
        let url = format!("{}/rpc", self.server);
        let resp = match self.client.post(&url).json(&payload).send() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("recap-cli: connection failed to {}: {}", url, e);
                std::process::exit(1);
            }
        };

        let envelope: RpcEnvelope = resp.json()?;
        if envelope.status != "ok" {
            anyhow::bail!(
                "{}",
                envelope.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        Ok(envelope.data.unwrap_or(Value::Null))
    }

    fn get_meetings(&self) -> anyhow::Result<Vec<Meeting>> {
        let data = self.call(json!({"procedure": "getMeetings"}))?;
        Ok(serde_json::from_value(data)?)
    }
}

// ============================================================================
// Presentation
// ============================================================================

fn truncate(text: &str, max: usize) -> String {
    let mut s: String = text.chars().take(max).collect();
    if text.chars().count() > max {
        s.push('…');
    }
    s
}

/// One list-view card: id, title, a description snippet, and whether a
/// transcript/audio source is attached.
pub fn render_meeting_card(meeting: &Meeting) -> String {
    let mut lines = vec![format!("[{}] {}", meeting.id, meeting.title)];
    if let Some(desc) = &meeting.description {
        lines.push(format!("    {}", truncate(desc, 60)));
    }
    let source = match (&meeting.audio_file_path, &meeting.transcript) {
        (Some(_), Some(_)) => "audio + transcript",
        (Some(_), None) => "audio attached",
        (None, Some(_)) => "transcript",
        (None, None) => "no source yet",
    };
    lines.push(format!("    {} · created {}", source, meeting.created_at));
    lines.join("\n")
}

/// Full single-meeting view.
pub fn render_meeting(meeting: &Meeting) -> String {
    let mut out = format!("Meeting {} — {}\n", meeting.id, meeting.title);
    out.push_str(&format!(
        "Created: {}\nUpdated: {}\n",
        meeting.created_at, meeting.updated_at
    ));
    if let Some(desc) = &meeting.description {
        out.push_str(&format!("Description: {}\n", desc));
    }
    if let Some(path) = &meeting.audio_file_path {
        out.push_str(&format!("Audio: {}\n", path));
    }
    if let Some(duration) = meeting.duration {
        out.push_str(&format!("Duration: {}s\n", duration));
    }
    if let Some(transcript) = &meeting.transcript {
        out.push_str(&format!("\nTranscript:\n{}\n", transcript));
    }
    out
}

/// The dashboard grid: the four artifact panels, each marked pending when
/// the artifact has not been derived yet.
pub fn render_dashboard(dashboard: &DashboardData) -> String {
    let panels = [
        ("Summary", &dashboard.components.summary),
        ("Tone Analysis", &dashboard.components.tone_analysis),
        ("Action Items", &dashboard.components.action_items),
        ("Mind Map", &dashboard.components.mind_map),
    ];

    let mut out = format!(
        "Dashboard — [{}] {}\n",
        dashboard.meeting.id, dashboard.meeting.title
    );
    for (label, content) in panels {
        out.push_str(&format!("\n=== {} ===\n", label));
        match content {
            Some(text) => out.push_str(&format!("{}\n", text)),
            None => out.push_str("(pending)\n"),
        }
    }
    out
}

/// One status line with a ten-segment progress bar. Progress is clamped to
/// 100 so a misreporting server cannot underflow the bar width.
pub fn render_status(status: &StatusResult) -> String {
    let filled = (status.progress.min(100) as usize) / 10;
    let bar: String = "#".repeat(filled) + &"-".repeat(10 - filled);
    format!(
        "meeting {} [{}] {}% {} — {}",
        status.meeting_id,
        bar,
        status.progress,
        status.status,
        status.message.as_deref().unwrap_or("")
    )
}

// ============================================================================
// Command handlers
// ============================================================================

fn do_list(rpc: &RpcClient) -> anyhow::Result<()> {
    let mut state = AppState::default();
    state.set_meetings(rpc.get_meetings()?);

    if state.meetings.is_empty() {
        println!("No meetings yet.");
        return Ok(());
    }
    for meeting in &state.meetings {
        println!("{}\n", render_meeting_card(meeting));
    }
    Ok(())
}

fn do_show(rpc: &RpcClient, id: i64) -> anyhow::Result<()> {
    let data = rpc.call(json!({"procedure": "getMeetingById", "id": id}))?;
    if data.is_null() {
        anyhow::bail!("meeting {} not found", id);
    }
    let meeting: Meeting = serde_json::from_value(data)?;
    print!("{}", render_meeting(&meeting));
    Ok(())
}

fn do_dashboard(rpc: &RpcClient, id: i64) -> anyhow::Result<()> {
    let mut state = AppState::default();
    state.set_meetings(rpc.get_meetings()?);
    if state.select(id).is_none() {
        anyhow::bail!("meeting {} not found", id);
    }

    let data = rpc.call(json!({"procedure": "getDashboardData", "meetingId": id}))?;
    if data.is_null() {
        anyhow::bail!("meeting {} not found", id);
    }
    state.dashboard = Some(serde_json::from_value(data)?);
    print!("{}", render_dashboard(state.dashboard.as_ref().unwrap()));
    Ok(())
}

fn do_status(rpc: &RpcClient, id: i64) -> anyhow::Result<()> {
    let data = rpc.call(json!({"procedure": "getProcessingStatus", "meetingId": id}))?;
    let status: StatusResult = serde_json::from_value(data)?;
    println!("{}", render_status(&status));
    Ok(())
}

fn do_health(server: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let url = format!("{}/health", server.trim_end_matches('/'));
    match client.get(&url).send() {
        Ok(r) if r.status().is_success() => {
            let body: Value = r.json().unwrap_or_default();
            println!("Recap server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:      {}", body["version"].as_str().unwrap_or("?"));
            println!("SQLite:       {}", body["sqlite"].as_str().unwrap_or("?"));
            println!("Socket:       {}", body["socket"].as_str().unwrap_or("?"));
        }
        Ok(r) => {
            eprintln!("recap-cli: server unhealthy (HTTP {})", r.status());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("recap-cli: cannot reach {} — {}", url, e);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let server = cli.server.clone();
    let rpc = RpcClient::new(&server)?;

    match cli.command {
        Commands::List => do_list(&rpc),
        Commands::Create {
            title,
            description,
            audio,
        } => {
            let data = rpc.call(json!({
                "procedure": "createMeeting",
                "title": title,
                "description": description,
                "audio_file_path": audio,
            }))?;
            let meeting: Meeting = serde_json::from_value(data)?;
            println!("Created meeting {}: {}", meeting.id, meeting.title);
            Ok(())
        }
        Commands::Show { id } => do_show(&rpc, id),
        Commands::Update {
            id,
            title,
            description,
            clear_description,
            transcript,
            clear_transcript,
            duration,
            clear_duration,
        } => {
            let mut payload = serde_json::Map::new();
            payload.insert("procedure".to_string(), json!("updateMeeting"));
            payload.insert("id".to_string(), json!(id));
            if let Some(t) = title {
                payload.insert("title".to_string(), json!(t));
            }
            // A clear flag sends an explicit null; omission leaves the field alone.
            if clear_description {
                payload.insert("description".to_string(), Value::Null);
            } else if let Some(d) = description {
                payload.insert("description".to_string(), json!(d));
            }
            if clear_transcript {
                payload.insert("transcript".to_string(), Value::Null);
            } else if let Some(t) = transcript {
                payload.insert("transcript".to_string(), json!(t));
            }
            if clear_duration {
                payload.insert("duration".to_string(), Value::Null);
            } else if let Some(d) = duration {
                payload.insert("duration".to_string(), json!(d));
            }

            let data = rpc.call(Value::Object(payload))?;
            let meeting: Meeting = serde_json::from_value(data)?;
            println!("Updated meeting {}", meeting.id);
            Ok(())
        }
        Commands::Delete { id } => {
            let data = rpc.call(json!({"procedure": "deleteMeeting", "id": id}))?;
            if data.as_bool().unwrap_or(false) {
                println!("Deleted meeting {}", id);
            } else {
                println!("Meeting {} was not found", id);
            }
            Ok(())
        }
        Commands::ProcessText {
            id,
            transcript,
            file,
        } => {
            let text = match (transcript, file) {
                (Some(t), _) => t,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => anyhow::bail!("provide a transcript or --file"),
            };
            let data = rpc.call(json!({
                "procedure": "processText",
                "meeting_id": id,
                "transcript": text,
            }))?;
            let status: StatusResult = serde_json::from_value(data)?;
            println!("{}", render_status(&status));
            Ok(())
        }
        Commands::ProcessAudio {
            id,
            audio_file_path,
        } => {
            let data = rpc.call(json!({
                "procedure": "processAudio",
                "meeting_id": id,
                "audio_file_path": audio_file_path,
            }))?;
            let status: StatusResult = serde_json::from_value(data)?;
            println!("{}", render_status(&status));
            Ok(())
        }
        Commands::Status { id } => do_status(&rpc, id),
        Commands::Dashboard { id } => do_dashboard(&rpc, id),
        Commands::Health => do_health(&server),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("recap-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_meeting(id: i64, title: &str) -> Meeting {
        Meeting {
            id,
            title: title.to_string(),
            description: None,
            audio_file_path: None,
            transcript: None,
            summary: None,
            tone_analysis: None,
            action_items: None,
            mind_map: None,
            duration: None,
            created_at: "2026-08-23T10:00:00Z".to_string(),
            updated_at: "2026-08-23T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn card_shows_id_title_and_missing_source() {
        let card = render_meeting_card(&mock_meeting(3, "Retro"));
        assert!(card.starts_with("[3] Retro"));
        assert!(card.contains("no source yet"));
    }

    #[test]
    fn card_reports_attached_sources() {
        let mut m = mock_meeting(1, "Sync");
        m.audio_file_path = Some("/a.wav".to_string());
        assert!(render_meeting_card(&m).contains("audio attached"));
        m.transcript = Some("t".to_string());
        assert!(render_meeting_card(&m).contains("audio + transcript"));
    }

    #[test]
    fn card_truncates_long_descriptions() {
        let mut m = mock_meeting(1, "Sync");
        m.description = Some("d".repeat(100));
        let card = render_meeting_card(&m);
        assert!(card.contains(&format!("{}…", "d".repeat(60))));
        assert!(!card.contains(&"d".repeat(61)));
    }

    #[test]
    fn dashboard_marks_missing_artifacts_pending() {
        let mut m = mock_meeting(2, "Planning");
        m.summary = Some("All good".to_string());
        let dash = DashboardData {
            meeting: m,
            components: DashboardComponents {
                summary: Some("All good".to_string()),
                tone_analysis: None,
                action_items: None,
                mind_map: None,
            },
        };
        let out = render_dashboard(&dash);
        assert!(out.contains("=== Summary ===\nAll good"));
        assert!(out.contains("=== Tone Analysis ===\n(pending)"));
        assert!(out.contains("=== Mind Map ===\n(pending)"));
    }

    #[test]
    fn status_line_renders_progress_bar() {
        let line = render_status(&StatusResult {
            meeting_id: 7,
            status: "processing".to_string(),
            message: Some("Transcribing audio file".to_string()),
            progress: 25,
        });
        assert!(line.contains("[##--------]"));
        assert!(line.contains("25%"));
        assert!(line.contains("processing"));
        assert!(line.contains("Transcribing audio file"));
    }

    #[test]
    fn status_line_clamps_out_of_range_progress() {
        // The wire field is a u8, so values past 100 are representable.
        let line = render_status(&StatusResult {
            meeting_id: 7,
            status: "completed".to_string(),
            message: None,
            progress: 250,
        });
        assert!(line.contains("[##########]"));
    }

    #[test]
    fn state_select_finds_meeting_and_clears_on_miss() {
        let mut state = AppState::default();
        state.set_meetings(vec![mock_meeting(1, "a"), mock_meeting(2, "b")]);

        assert_eq!(state.select(2).map(|m| m.id), Some(2));
        assert!(state.select(99).is_none());
        assert!(state.dashboard.is_none());
    }

    #[test]
    fn state_refresh_keeps_selection_in_sync() {
        let mut state = AppState::default();
        state.set_meetings(vec![mock_meeting(1, "old title")]);
        state.select(1);

        state.set_meetings(vec![mock_meeting(1, "new title")]);
        assert_eq!(state.selected.as_ref().unwrap().title, "new title");

        // Selected row deleted server-side: selection drops.
        state.set_meetings(vec![]);
        assert!(state.selected.is_none());
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("héllo", 10), "héllo");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}
