//! Match-analysis pipeline — drives the clip → upload → poll → inference run.
//!
//! # Pipeline flow
//!
//! ```text
//! analyze(clip, focus)
//!   └─▶ stage bytes in TempClip            [Persisting]
//!         └─▶ upload_file                  [Uploading]
//!               └─▶ discard local copy
//!               └─▶ get_file until ACTIVE  [WaitingRemote]  (bounded)
//!                     ├─ FAILED     → RemoteProcessing error
//!                     ├─ exhausted  → Timeout error
//!                     └─ ACTIVE → generate(persona + focus + handle)  [Analyzing]
//!                                   └─▶ AnalysisResult
//! ```
//!
//! No step retries: the first failure aborts the run, no partial result is
//! produced, and the staged file is removed on every exit path (RAII via
//! [`TempClip`]).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::analysis::{match_analysis_prompt, FocusArea, TACTICAL_ANALYST_INSTRUCTION};
use crate::config::PollConfig;
use crate::gemini::{FileState, GeminiClient, GeminiError, GenerateRequest, RemoteFile};

use super::clip::{ClipKind, TempClip, UploadedClip};
use super::state::RunPhase;

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that can surface during a match-analysis run.
///
/// The taxonomy is closed so callers can distinguish validation failures
/// (`EmptyClip`, `UnsupportedFormat`) from remote-processing outcomes
/// (`RemoteProcessing`, `Timeout`) and plain client failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No clip bytes were supplied; nothing was uploaded.
    #[error("no clip data supplied")]
    EmptyClip,

    /// The clip's extension is outside the allow-list; nothing was uploaded.
    #[error("unsupported clip format \"{0}\" (allowed: mp4, mov, avi)")]
    UnsupportedFormat(String),

    /// Local staging of the clip failed.
    #[error("failed to stage clip locally: {0}")]
    Io(#[from] std::io::Error),

    /// The upload call failed.
    #[error("clip upload failed: {0}")]
    Upload(#[source] GeminiError),

    /// A state-refresh poll failed.
    #[error("failed to refresh remote processing state: {0}")]
    Poll(#[source] GeminiError),

    /// The remote handle reached `FAILED` state.
    #[error("remote processing failed for {name}")]
    RemoteProcessing { name: String },

    /// The handle never left `PROCESSING` within the configured poll budget.
    #[error("remote processing did not finish within {attempts} polls")]
    Timeout { attempts: u32 },

    /// The inference call failed.
    #[error("analysis failed: {0}")]
    Inference(#[source] GeminiError),

    /// Internal / unexpected error (e.g. tokio join failure).
    #[error("internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

/// The text produced by one successful run.
///
/// Returned to the caller as an explicit value; each new run's result
/// replaces the previous one wherever the caller stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub text: String,
}

impl AnalysisResult {
    /// A condensed view for the "Quick Summary" display region: the first
    /// two paragraphs of the full analysis.  Derived locally — never a
    /// second inference call.
    pub fn quick_summary(&self) -> String {
        let mut paragraphs = self
            .text
            .split("\n\n")
            .filter(|p| !p.trim().is_empty())
            .take(2);

        match (paragraphs.next(), paragraphs.next()) {
            (Some(a), Some(b)) => format!("{a}\n\n{b}"),
            (Some(a), None) => a.to_string(),
            _ => self.text.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// MatchPipeline
// ---------------------------------------------------------------------------

/// Orchestrates one clip-analysis run against the Gemini client.
///
/// Create with [`MatchPipeline::new`], then call
/// [`analyze`](Self::analyze) (or [`analyze_path`](Self::analyze_path))
/// once per run.  The pipeline holds no per-run state, so one instance can
/// serve many runs.
pub struct MatchPipeline {
    client: Arc<dyn GeminiClient>,
    poll: PollConfig,
}

impl MatchPipeline {
    /// * `client` — Gemini client (shared with the pitch analyzer).
    /// * `poll`   — poll interval and attempt budget for remote processing.
    pub fn new(client: Arc<dyn GeminiClient>, poll: PollConfig) -> Self {
        Self { client, poll }
    }

    /// Read a clip from disk, validate its extension against the allow-list,
    /// and run [`analyze`](Self::analyze).
    ///
    /// A disallowed extension fails before any network call is issued.
    pub async fn analyze_path<F>(
        &self,
        path: &Path,
        focus: &[FocusArea],
        on_phase: F,
    ) -> Result<AnalysisResult, PipelineError>
    where
        F: Fn(RunPhase) + Send,
    {
        let kind = ClipKind::from_path(path).ok_or_else(|| {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_string();
            PipelineError::UnsupportedFormat(ext)
        })?;

        let data = tokio::fs::read(path).await?;
        self.analyze(UploadedClip::new(data, kind), focus, on_phase)
            .await
    }

    /// Run the full pipeline for one clip.
    ///
    /// Side effects: one local filesystem write/delete, one network upload,
    /// up to `poll.max_attempts` network polls, one network inference call.
    pub async fn analyze<F>(
        &self,
        clip: UploadedClip,
        focus: &[FocusArea],
        on_phase: F,
    ) -> Result<AnalysisResult, PipelineError>
    where
        F: Fn(RunPhase) + Send,
    {
        if clip.data.is_empty() {
            return Err(PipelineError::EmptyClip);
        }

        // ── 1. Stage locally (blocking → thread pool) ────────────────────
        on_phase(RunPhase::Persisting);

        let mime_type = clip.kind.mime_type();
        let temp = tokio::task::spawn_blocking(move || TempClip::persist(&clip))
            .await
            .map_err(|e| PipelineError::Internal(e.to_string()))??;

        // ── 2. Upload ────────────────────────────────────────────────────
        on_phase(RunPhase::Uploading);

        let uploaded = self
            .client
            .upload_file(temp.path(), mime_type)
            .await
            .map_err(PipelineError::Upload)?;

        log::debug!(
            "pipeline: uploaded as {} (state {:?})",
            uploaded.name,
            uploaded.state
        );

        // The remote side owns the bytes now; the local copy goes away.
        // Failure paths above drop `temp` and delete the file via RAII.
        if let Err(e) = temp.discard() {
            log::warn!("pipeline: failed to remove staged clip: {e}");
        }

        // ── 3. Poll until the handle leaves PROCESSING (bounded) ─────────
        on_phase(RunPhase::WaitingRemote);

        let ready = self.wait_until_active(uploaded).await?;

        // ── 4. Compose prompt + 5. invoke inference ──────────────────────
        on_phase(RunPhase::Analyzing);

        let request = GenerateRequest::multimodal(&ready, match_analysis_prompt(focus))
            .with_system_instruction(TACTICAL_ANALYST_INSTRUCTION);

        let text = self
            .client
            .generate(request)
            .await
            .map_err(PipelineError::Inference)?;

        // ── 6. Hand the result to the caller ─────────────────────────────
        Ok(AnalysisResult { text })
    }

    // -----------------------------------------------------------------------
    // Poll loop
    // -----------------------------------------------------------------------

    /// Re-fetch the handle until it becomes `Active`, sleeping
    /// `poll.interval_secs` between fetches.
    ///
    /// Zero polls when the upload response is already `Active`; at most
    /// `poll.max_attempts` fetches otherwise.  `Failed` aborts immediately,
    /// an unrecognised state keeps polling.
    async fn wait_until_active(
        &self,
        mut file: RemoteFile,
    ) -> Result<RemoteFile, PipelineError> {
        match file.state {
            FileState::Active => return Ok(file),
            FileState::Failed => {
                return Err(PipelineError::RemoteProcessing { name: file.name })
            }
            _ => {}
        }

        for attempt in 1..=self.poll.max_attempts {
            tokio::time::sleep(Duration::from_secs(self.poll.interval_secs)).await;

            let mut refreshed = self
                .client
                .get_file(&file.name)
                .await
                .map_err(PipelineError::Poll)?;

            // State refreshes may omit the URI; keep the one from upload.
            if refreshed.uri.is_empty() {
                refreshed.uri = std::mem::take(&mut file.uri);
            }
            if refreshed.mime_type.is_none() {
                refreshed.mime_type = file.mime_type.take();
            }
            file = refreshed;

            match file.state {
                FileState::Active => {
                    log::debug!("pipeline: {} active after {attempt} poll(s)", file.name);
                    return Ok(file);
                }
                FileState::Failed => {
                    return Err(PipelineError::RemoteProcessing { name: file.name })
                }
                _ => {
                    log::debug!(
                        "pipeline: {} still processing (poll {attempt}/{})",
                        file.name,
                        self.poll.max_attempts
                    );
                }
            }
        }

        Err(PipelineError::Timeout {
            attempts: self.poll.max_attempts,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    // -----------------------------------------------------------------------
    // Test double
    // -----------------------------------------------------------------------

    /// Scripted client: upload yields a handle in `initial_state`, each poll
    /// pops the next state from `poll_states` (repeating the last one when
    /// exhausted), generate returns a fixed reply.  Every call is counted.
    struct ScriptedClient {
        initial_state: FileState,
        poll_states: Mutex<VecDeque<FileState>>,
        reply: Result<String, ()>,
        fail_upload: bool,

        upload_calls: AtomicUsize,
        poll_calls: AtomicUsize,
        generate_calls: AtomicUsize,
        uploaded_path: Mutex<Option<PathBuf>>,
        path_existed_at_upload: AtomicBool,
    }

    impl ScriptedClient {
        fn new(initial_state: FileState, poll_states: Vec<FileState>) -> Self {
            Self {
                initial_state,
                poll_states: Mutex::new(poll_states.into()),
                reply: Ok("T".into()),
                fail_upload: false,
                upload_calls: AtomicUsize::new(0),
                poll_calls: AtomicUsize::new(0),
                generate_calls: AtomicUsize::new(0),
                uploaded_path: Mutex::new(None),
                path_existed_at_upload: AtomicBool::new(false),
            }
        }

        fn failing_upload() -> Self {
            let mut client = Self::new(FileState::Processing, vec![]);
            client.fail_upload = true;
            client
        }

        fn recorded_path(&self) -> Option<PathBuf> {
            self.uploaded_path.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GeminiClient for ScriptedClient {
        async fn generate(&self, _request: GenerateRequest) -> Result<String, GeminiError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(GeminiError::EmptyResponse),
            }
        }

        async fn upload_file(
            &self,
            path: &Path,
            _mime_type: &str,
        ) -> Result<RemoteFile, GeminiError> {
            self.upload_calls.fetch_add(1, Ordering::SeqCst);
            self.path_existed_at_upload
                .store(path.exists(), Ordering::SeqCst);
            *self.uploaded_path.lock().unwrap() = Some(path.to_path_buf());

            if self.fail_upload {
                return Err(GeminiError::Request("connection refused".into()));
            }

            Ok(RemoteFile {
                name: "files/test-clip".into(),
                uri: "https://example.invalid/files/test-clip".into(),
                state: self.initial_state,
                mime_type: Some("video/mp4".into()),
            })
        }

        async fn get_file(&self, name: &str) -> Result<RemoteFile, GeminiError> {
            self.poll_calls.fetch_add(1, Ordering::SeqCst);
            let mut states = self.poll_states.lock().unwrap();
            let state = if states.len() > 1 {
                states.pop_front().unwrap()
            } else {
                *states.front().unwrap_or(&FileState::Processing)
            };

            Ok(RemoteFile {
                name: name.into(),
                uri: String::new(),
                state,
                mime_type: None,
            })
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn fast_poll(max_attempts: u32) -> PollConfig {
        PollConfig {
            interval_secs: 0,
            max_attempts,
        }
    }

    fn sample_clip() -> UploadedClip {
        UploadedClip::new(vec![1u8, 2, 3, 4], ClipKind::Mp4)
    }

    fn make_pipeline(
        client: Arc<ScriptedClient>,
        max_attempts: u32,
    ) -> MatchPipeline {
        MatchPipeline::new(client as Arc<dyn GeminiClient>, fast_poll(max_attempts))
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    /// Scenario from the design notes: valid clip, one focus area, the
    /// handle turns ACTIVE after one poll, inference returns T.
    #[tokio::test]
    async fn processing_then_active_succeeds_with_one_poll() {
        let client = Arc::new(ScriptedClient::new(
            FileState::Processing,
            vec![FileState::Active],
        ));
        let pipeline = make_pipeline(Arc::clone(&client), 10);

        let phases = Mutex::new(Vec::new());
        let result = pipeline
            .analyze(sample_clip(), &[FocusArea::SpaceCreation], |p| {
                phases.lock().unwrap().push(p)
            })
            .await
            .unwrap();

        assert_eq!(result.text, "T");
        assert_eq!(client.upload_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.poll_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.generate_calls.load(Ordering::SeqCst), 1);

        // Temp file existed during upload and is gone afterwards.
        assert!(client.path_existed_at_upload.load(Ordering::SeqCst));
        assert!(!client.recorded_path().unwrap().exists());

        // Phase reporting covers the whole run in order.
        assert_eq!(
            *phases.lock().unwrap(),
            vec![
                RunPhase::Persisting,
                RunPhase::Uploading,
                RunPhase::WaitingRemote,
                RunPhase::Analyzing
            ]
        );
    }

    /// An immediately ACTIVE upload needs zero polls.
    #[tokio::test]
    async fn immediately_active_skips_polling() {
        let client = Arc::new(ScriptedClient::new(FileState::Active, vec![]));
        let pipeline = make_pipeline(Arc::clone(&client), 10);

        let result = pipeline
            .analyze(sample_clip(), &[], |_| {})
            .await
            .unwrap();

        assert_eq!(result.text, "T");
        assert_eq!(client.poll_calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.generate_calls.load(Ordering::SeqCst), 1);
    }

    /// A FAILED handle aborts the run before inference and still cleans up.
    #[tokio::test]
    async fn failed_remote_state_aborts_without_inference() {
        let client = Arc::new(ScriptedClient::new(
            FileState::Processing,
            vec![FileState::Failed],
        ));
        let pipeline = make_pipeline(Arc::clone(&client), 10);

        let err = pipeline
            .analyze(sample_clip(), &[FocusArea::PressingTraps], |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::RemoteProcessing { .. }));
        assert_eq!(client.generate_calls.load(Ordering::SeqCst), 0);
        assert!(!client.recorded_path().unwrap().exists());
    }

    /// FAILED straight from the upload response skips the poll loop too.
    #[tokio::test]
    async fn failed_on_upload_response_aborts_immediately() {
        let client = Arc::new(ScriptedClient::new(FileState::Failed, vec![]));
        let pipeline = make_pipeline(Arc::clone(&client), 10);

        let err = pipeline.analyze(sample_clip(), &[], |_| {}).await.unwrap_err();

        assert!(matches!(err, PipelineError::RemoteProcessing { .. }));
        assert_eq!(client.poll_calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.generate_calls.load(Ordering::SeqCst), 0);
    }

    /// The poll loop is bounded: exhausting the budget yields Timeout.
    #[tokio::test]
    async fn poll_budget_exhaustion_times_out() {
        let client = Arc::new(ScriptedClient::new(
            FileState::Processing,
            vec![FileState::Processing],
        ));
        let pipeline = make_pipeline(Arc::clone(&client), 3);

        let err = pipeline.analyze(sample_clip(), &[], |_| {}).await.unwrap_err();

        assert!(matches!(err, PipelineError::Timeout { attempts: 3 }));
        assert_eq!(client.poll_calls.load(Ordering::SeqCst), 3);
        assert_eq!(client.generate_calls.load(Ordering::SeqCst), 0);
        assert!(!client.recorded_path().unwrap().exists());
    }

    /// Upload failure surfaces as Upload and removes the staged file.
    #[tokio::test]
    async fn upload_failure_cleans_up_temp_file() {
        let client = Arc::new(ScriptedClient::failing_upload());
        let pipeline = make_pipeline(Arc::clone(&client), 10);

        let err = pipeline.analyze(sample_clip(), &[], |_| {}).await.unwrap_err();

        assert!(matches!(err, PipelineError::Upload(_)));
        assert_eq!(client.poll_calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.generate_calls.load(Ordering::SeqCst), 0);
        assert!(!client.recorded_path().unwrap().exists());
    }

    /// An empty clip is rejected before any side effect.
    #[tokio::test]
    async fn empty_clip_is_rejected_without_network_calls() {
        let client = Arc::new(ScriptedClient::new(FileState::Active, vec![]));
        let pipeline = make_pipeline(Arc::clone(&client), 10);

        let err = pipeline
            .analyze(UploadedClip::new(Vec::new(), ClipKind::Mp4), &[], |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::EmptyClip));
        assert_eq!(client.upload_calls.load(Ordering::SeqCst), 0);
    }

    /// A disallowed extension is rejected before the file is even read.
    #[tokio::test]
    async fn unsupported_extension_is_rejected_without_network_calls() {
        let client = Arc::new(ScriptedClient::new(FileState::Active, vec![]));
        let pipeline = make_pipeline(Arc::clone(&client), 10);

        let err = pipeline
            .analyze_path(Path::new("notes.txt"), &[], |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::UnsupportedFormat(ext) if ext == "txt"));
        assert_eq!(client.upload_calls.load(Ordering::SeqCst), 0);
    }

    /// analyze_path drives the same pipeline end to end from a real file.
    #[tokio::test]
    async fn analyze_path_runs_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let clip_path = dir.path().join("match1.mp4");
        std::fs::write(&clip_path, [9u8, 9, 9]).unwrap();

        let client = Arc::new(ScriptedClient::new(
            FileState::Processing,
            vec![FileState::Active],
        ));
        let pipeline = make_pipeline(Arc::clone(&client), 10);

        let result = pipeline
            .analyze_path(&clip_path, &[FocusArea::SpaceCreation], |_| {})
            .await
            .unwrap();

        assert_eq!(result.text, "T");
        // The staged copy is gone; the user's own file is untouched.
        assert!(!client.recorded_path().unwrap().exists());
        assert!(clip_path.exists());
    }

    // ---- AnalysisResult::quick_summary ---

    #[test]
    fn quick_summary_takes_first_two_paragraphs() {
        let result = AnalysisResult {
            text: "First.\n\nSecond.\n\nThird.".into(),
        };
        assert_eq!(result.quick_summary(), "First.\n\nSecond.");
    }

    #[test]
    fn quick_summary_of_short_text_is_the_text() {
        let result = AnalysisResult {
            text: "Only paragraph.".into(),
        };
        assert_eq!(result.quick_summary(), "Only paragraph.");
    }
}
