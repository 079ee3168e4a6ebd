//! Processing pipeline: derives the four meeting artifacts from a
//! transcript and writes them back through the repository.
//!
//! The generators are deterministic string templates standing in for real
//! model calls. They sit behind the [`Analyzer`] and [`Transcriber`] traits
//! so a model-backed implementation can be swapped in without touching the
//! repository or the router. Both process operations report *every* problem
//! as a failed [`StatusResult`] instead of raising; callers must check the
//! status field.

use std::time::Duration;

use async_trait::async_trait;
use recap_core::models::meeting::UpdateMeetingInput;
use recap_core::models::status::StatusResult;
use recap_core::patch::Patch;
use recap_core::rpc::{ProcessAudioInput, ProcessTextInput};

use crate::subsystems::repository::MeetingRepository;

/// Fixed outputs of the audio path. The transcriber never reads the file;
/// this whole path is the attachment point for a real speech-to-text
/// pipeline.
pub const AUDIO_STUB_TRANSCRIPT: &str =
    "This is a mock transcript generated from the audio file processing.";
pub const AUDIO_STUB_DURATION_SECS: i64 = 1800;
const AUDIO_STUB_SUMMARY: &str = "Meeting summary: Key points discussed and decisions made.";
const AUDIO_STUB_TONE: &str = "Tone: Professional and collaborative with positive sentiment.";
const AUDIO_STUB_ACTION_ITEMS: &str =
    "1. Follow up on project timeline\n2. Schedule next review meeting\n3. Prepare status report";
const AUDIO_STUB_MIND_MAP: &str = "graph TD\n    A[Meeting Topic] --> B[Discussion Points]\n    B --> C[Action Items]\n    B --> D[Decisions Made]";

const ACTION_KEYWORDS: [&str; 5] = ["will", "should", "need to", "must", "action"];

// ============================================================================
// Pure artifact generators
// ============================================================================

fn non_blank_lines(transcript: &str) -> impl Iterator<Item = &str> {
    transcript.lines().filter(|line| !line.trim().is_empty())
}

/// Labeled summary: the first three non-blank transcript lines as key
/// points, then fixed decision and next-step sections.
pub fn generate_summary(transcript: &str) -> String {
    let key_points = non_blank_lines(transcript)
        .take(3)
        .map(|line| format!("• {}", line.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Meeting Summary:\n{key_points}\n\nDecisions Made:\n• Key decision points extracted from discussion\n\nNext Steps:\n• Follow up actions identified\n• Timeline established for deliverables"
    )
}

/// Sentiment flips to Concerned on a literal "problem"/"issue" substring;
/// engagement keys off raw transcript length.
pub fn analyze_tone(transcript: &str) -> String {
    let sentiment = if transcript.contains("problem") || transcript.contains("issue") {
        "Concerned"
    } else {
        "Positive"
    };
    let engagement = if transcript.chars().count() > 500 {
        "High"
    } else {
        "Medium"
    };

    format!(
        "Tone Analysis:\nOverall Sentiment: {sentiment}\nEngagement Level: {engagement}\nCommunication Style: Professional and collaborative\nKey Emotions: Focus, determination, collaborative spirit"
    )
}

/// First three lines containing an action keyword (case-insensitive), or
/// three fixed placeholder bullets when nothing matches.
pub fn extract_action_items(transcript: &str) -> String {
    let matches: Vec<&str> = non_blank_lines(transcript)
        .filter(|line| {
            let lowered = line.to_lowercase();
            ACTION_KEYWORDS.iter().any(|kw| lowered.contains(kw))
        })
        .collect();

    if matches.is_empty() {
        return "Action Items:\n• Review meeting transcript and identify next steps\n• Schedule follow-up meeting if needed\n• Document key decisions made".to_string();
    }

    let items = matches
        .iter()
        .take(3)
        .map(|line| format!("• {}", line.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Action Items:\n{items}")
}

/// Mermaid graph: a fixed root plus up to three topic children labeled with
/// the first 30 characters of the first three non-blank lines.
pub fn generate_mind_map(transcript: &str) -> String {
    let topics = non_blank_lines(transcript)
        .take(3)
        .enumerate()
        .map(|(idx, line)| {
            let label: String = line.trim().chars().take(30).collect();
            format!("    Meeting --> Topic{}[\"{}...\"]", idx + 1, label)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "graph TD\n    Meeting[\"Meeting Overview\"]\n{topics}\n    Meeting --> Decisions[\"Key Decisions\"]\n    Meeting --> Actions[\"Action Items\"]\n    Meeting --> NextSteps[\"Next Steps\"]"
    )
}

// ============================================================================
// Analyzer / Transcriber seams
// ============================================================================

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> anyhow::Result<String>;
    async fn analyze_tone(&self, transcript: &str) -> anyhow::Result<String>;
    async fn extract_action_items(&self, transcript: &str) -> anyhow::Result<String>;
    async fn generate_mind_map(&self, transcript: &str) -> anyhow::Result<String>;
}

/// Template-based analyzer. Each call sleeps for the configured latency to
/// mimic a remote model round trip.
pub struct TemplateAnalyzer {
    latency: Duration,
}

impl TemplateAnalyzer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Zero-latency analyzer for tests.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl Default for TemplateAnalyzer {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[async_trait]
impl Analyzer for TemplateAnalyzer {
    async fn summarize(&self, transcript: &str) -> anyhow::Result<String> {
        tokio::time::sleep(self.latency).await;
        Ok(generate_summary(transcript))
    }

    async fn analyze_tone(&self, transcript: &str) -> anyhow::Result<String> {
        tokio::time::sleep(self.latency).await;
        Ok(analyze_tone(transcript))
    }

    async fn extract_action_items(&self, transcript: &str) -> anyhow::Result<String> {
        tokio::time::sleep(self.latency).await;
        Ok(extract_action_items(transcript))
    }

    async fn generate_mind_map(&self, transcript: &str) -> anyhow::Result<String> {
        tokio::time::sleep(self.latency).await;
        Ok(generate_mind_map(transcript))
    }
}

pub struct Transcription {
    pub transcript: String,
    pub duration_seconds: i64,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_file_path: &str) -> anyhow::Result<Transcription>;
}

/// Placeholder transcriber: ignores the file and fabricates a fixed
/// transcript and a 30-minute duration.
pub struct StubTranscriber;

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, _audio_file_path: &str) -> anyhow::Result<Transcription> {
        Ok(Transcription {
            transcript: AUDIO_STUB_TRANSCRIPT.to_string(),
            duration_seconds: AUDIO_STUB_DURATION_SECS,
        })
    }
}

// ============================================================================
// Process operations
// ============================================================================

/// Derive all four artifacts from a caller-supplied transcript and persist
/// them. Never raises: validation and store failures come back as a failed
/// StatusResult.
pub async fn process_from_text(
    repo: &MeetingRepository,
    analyzer: &dyn Analyzer,
    input: &ProcessTextInput,
) -> StatusResult {
    match process_text_inner(repo, analyzer, input).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Text processing failed: {e}");
            StatusResult::failed(input.meeting_id, "Processing failed due to internal error")
        }
    }
}

async fn process_text_inner(
    repo: &MeetingRepository,
    analyzer: &dyn Analyzer,
    input: &ProcessTextInput,
) -> anyhow::Result<StatusResult> {
    if repo.get_by_id(input.meeting_id).await?.is_none() {
        return Ok(StatusResult::failed(input.meeting_id, "Meeting not found"));
    }

    if input.transcript.trim().is_empty() {
        return Ok(StatusResult::failed(
            input.meeting_id,
            "Transcript is required for processing",
        ));
    }

    let transcript = input.transcript.as_str();
    let (summary, tone, actions, mind_map) = futures::join!(
        analyzer.summarize(transcript),
        analyzer.analyze_tone(transcript),
        analyzer.extract_action_items(transcript),
        analyzer.generate_mind_map(transcript),
    );

    repo.update(UpdateMeetingInput {
        id: input.meeting_id,
        transcript: Patch::Set(input.transcript.clone()),
        summary: Patch::Set(summary?),
        tone_analysis: Patch::Set(tone?),
        action_items: Patch::Set(actions?),
        mind_map: Patch::Set(mind_map?),
        ..Default::default()
    })
    .await?;

    Ok(StatusResult::completed(
        input.meeting_id,
        "Text processing completed successfully",
    ))
}

/// Attach an audio file and run the (stubbed) transcription path. Writes the
/// audio path first, then the transcript, fixed artifacts, and duration —
/// mirroring the two-phase write a real pipeline would do around a
/// transcription call.
pub async fn process_from_audio(
    repo: &MeetingRepository,
    transcriber: &dyn Transcriber,
    input: &ProcessAudioInput,
) -> StatusResult {
    match process_audio_inner(repo, transcriber, input).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Audio processing failed: {e}");
            StatusResult::failed(
                input.meeting_id,
                "Audio processing failed due to an internal error",
            )
        }
    }
}

async fn process_audio_inner(
    repo: &MeetingRepository,
    transcriber: &dyn Transcriber,
    input: &ProcessAudioInput,
) -> anyhow::Result<StatusResult> {
    if repo.get_by_id(input.meeting_id).await?.is_none() {
        return Ok(StatusResult::failed(input.meeting_id, "Meeting not found"));
    }

    repo.update(UpdateMeetingInput {
        id: input.meeting_id,
        audio_file_path: Patch::Set(input.audio_file_path.clone()),
        ..Default::default()
    })
    .await?;

    let transcription = transcriber.transcribe(&input.audio_file_path).await?;

    repo.update(UpdateMeetingInput {
        id: input.meeting_id,
        transcript: Patch::Set(transcription.transcript),
        summary: Patch::Set(AUDIO_STUB_SUMMARY.to_string()),
        tone_analysis: Patch::Set(AUDIO_STUB_TONE.to_string()),
        action_items: Patch::Set(AUDIO_STUB_ACTION_ITEMS.to_string()),
        mind_map: Patch::Set(AUDIO_STUB_MIND_MAP.to_string()),
        duration: Patch::Set(transcription.duration_seconds),
        ..Default::default()
    })
    .await?;

    Ok(StatusResult::completed(
        input.meeting_id,
        "Audio processing completed successfully",
    ))
}
