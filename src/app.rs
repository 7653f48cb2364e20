//! Pitch Vision desktop window — egui/eframe application.
//!
//! # Architecture
//!
//! [`PitchVisionApp`] is the top-level [`eframe::App`] that owns the UI state
//! and two channel endpoints:
//!
//! * `command_tx` — sends [`AppCommand`] to the analysis orchestrator.
//! * `event_rx`  — receives [`AppEvent`] progress and results back.
//!
//! The window shows two analysis surfaces as tabs:
//!
//! | Tab | Flow |
//! |-----|------|
//! | Pitch Analyzer | idea text → one generation call → feedback |
//! | Match Analyzer | clip path + focus areas → upload/poll/inference → analysis |
//!
//! The match result renders under two sub-views, "Full Analysis" and
//! "Quick Summary"; both come from the same single run.

use std::path::PathBuf;

use eframe::egui;
use tokio::sync::mpsc;

use crate::analysis::FocusArea;
use crate::config::AppConfig;
use crate::pipeline::{AnalysisResult, RunPhase};

// ---------------------------------------------------------------------------
// Channel protocol
// ---------------------------------------------------------------------------

/// Commands sent from the UI thread to the analysis orchestrator.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Analyse a pitch idea (text surface).
    AnalyzePitch { idea: String },
    /// Analyse a match clip (video surface).
    AnalyzeClip {
        path: PathBuf,
        focus: Vec<FocusArea>,
    },
}

/// Results / progress events delivered from the orchestrator to the UI.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Pitch feedback is ready.
    PitchComplete { feedback: String },
    /// The pitch run failed.
    PitchFailed { message: String },
    /// The match pipeline moved to a new phase.
    ClipPhase { phase: RunPhase },
    /// The match analysis is ready.
    ClipComplete { result: AnalysisResult },
    /// The match run failed.
    ClipFailed { message: String },
}

// ---------------------------------------------------------------------------
// Tab state
// ---------------------------------------------------------------------------

/// Which analysis surface is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Pitch,
    Match,
}

/// Which view of the match result is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchView {
    FullAnalysis,
    QuickSummary,
}

/// Collect the focus areas whose checkbox is ticked, in declaration order.
pub fn selected_focus(flags: &[bool; 4]) -> Vec<FocusArea> {
    FocusArea::ALL
        .iter()
        .zip(flags.iter())
        .filter_map(|(area, on)| on.then_some(*area))
        .collect()
}

// ---------------------------------------------------------------------------
// PitchVisionApp
// ---------------------------------------------------------------------------

/// eframe application — the two-tab analysis window.
pub struct PitchVisionApp {
    // ── Tab state ────────────────────────────────────────────────────────
    surface: Surface,
    match_view: MatchView,

    // ── Pitch surface ────────────────────────────────────────────────────
    pitch_input: String,
    pitch_feedback: Option<String>,
    pitch_error: Option<String>,
    pitch_busy: bool,

    // ── Match surface ────────────────────────────────────────────────────
    clip_path: String,
    /// Checkbox states aligned with `FocusArea::ALL`.
    focus_flags: [bool; 4],
    run_phase: RunPhase,
    match_result: Option<AnalysisResult>,
    match_error: Option<String>,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<AppCommand>,
    event_rx: mpsc::Receiver<AppEvent>,

    // ── Configuration ────────────────────────────────────────────────────
    #[allow(dead_code)]
    config: AppConfig,
}

impl PitchVisionApp {
    /// * `command_tx` — sender end of the command channel.
    /// * `event_rx`   — receiver end of the event channel.
    /// * `config`     — loaded application configuration.
    pub fn new(
        command_tx: mpsc::Sender<AppCommand>,
        event_rx: mpsc::Receiver<AppEvent>,
        config: AppConfig,
    ) -> Self {
        Self {
            surface: Surface::Pitch,
            match_view: MatchView::FullAnalysis,
            pitch_input: String::new(),
            pitch_feedback: None,
            pitch_error: None,
            pitch_busy: false,
            clip_path: String::new(),
            focus_flags: [false; 4],
            run_phase: RunPhase::Idle,
            match_result: None,
            match_error: None,
            command_tx,
            event_rx,
            config,
        }
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending orchestrator events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::PitchComplete { feedback } => {
                    self.pitch_busy = false;
                    self.pitch_error = None;
                    self.pitch_feedback = Some(feedback);
                }
                AppEvent::PitchFailed { message } => {
                    self.pitch_busy = false;
                    self.pitch_feedback = None;
                    self.pitch_error = Some(message);
                }
                AppEvent::ClipPhase { phase } => {
                    self.run_phase = phase;
                }
                AppEvent::ClipComplete { result } => {
                    self.run_phase = RunPhase::Done;
                    self.match_error = None;
                    // Overwrite, never append: only the latest run is kept.
                    self.match_result = Some(result);
                }
                AppEvent::ClipFailed { message } => {
                    self.run_phase = RunPhase::Error;
                    self.match_error = Some(message);
                }
            }
        }
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn submit_pitch(&mut self) {
        if self.pitch_input.trim().is_empty() {
            self.pitch_error = Some("Please enter a pitch idea first!".into());
            return;
        }
        self.pitch_error = None;
        self.pitch_busy = true;
        let _ = self.command_tx.try_send(AppCommand::AnalyzePitch {
            idea: self.pitch_input.clone(),
        });
    }

    fn submit_clip(&mut self) {
        if self.clip_path.trim().is_empty() {
            self.match_error = Some("Please upload a video file to begin.".into());
            return;
        }
        self.match_error = None;
        self.run_phase = RunPhase::Persisting;
        let _ = self.command_tx.try_send(AppCommand::AnalyzeClip {
            path: PathBuf::from(self.clip_path.trim()),
            focus: selected_focus(&self.focus_flags),
        });
    }

    // ── Views ────────────────────────────────────────────────────────────

    fn draw_pitch_tab(&mut self, ui: &mut egui::Ui) {
        ui.label("Enter your idea below to get a professional analysis.");
        ui.add_space(4.0);

        ui.add(
            egui::TextEdit::multiline(&mut self.pitch_input)
                .hint_text("e.g. A subscription service for organic dog treats…")
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let button = ui.add_enabled(!self.pitch_busy, egui::Button::new("Analyze My Pitch"));
            if button.clicked() {
                self.submit_pitch();
            }
            if self.pitch_busy {
                ui.spinner();
                ui.label("Analyzing your pitch…");
            }
        });

        if let Some(message) = &self.pitch_error {
            ui.colored_label(egui::Color32::ORANGE, message);
        }

        if let Some(feedback) = &self.pitch_feedback {
            ui.separator();
            ui.heading("Professional Feedback");
            egui::ScrollArea::vertical()
                .id_salt("pitch_feedback")
                .show(ui, |ui| {
                    ui.label(feedback);
                });
        }
    }

    fn draw_match_tab(&mut self, ui: &mut egui::Ui) {
        ui.label("Pick a match clip (mp4, mov or avi) and the areas to focus on.");
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Clip path:");
            ui.add(
                egui::TextEdit::singleline(&mut self.clip_path)
                    .hint_text("/path/to/match1.mp4")
                    .desired_width(f32::INFINITY),
            );
        });

        ui.add_space(4.0);
        ui.label("Focus areas:");
        ui.horizontal_wrapped(|ui| {
            for (area, flag) in FocusArea::ALL.iter().zip(self.focus_flags.iter_mut()) {
                ui.checkbox(flag, area.label());
            }
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let button =
                ui.add_enabled(!self.run_phase.is_busy(), egui::Button::new("Analyze Clip"));
            if button.clicked() {
                self.submit_clip();
            }
            if self.run_phase.is_busy() {
                ui.spinner();
                ui.label(self.run_phase.label());
            }
        });

        if let Some(message) = &self.match_error {
            ui.colored_label(egui::Color32::ORANGE, message);
        }

        if let Some(result) = &self.match_result {
            ui.separator();
            ui.horizontal(|ui| {
                ui.selectable_value(
                    &mut self.match_view,
                    MatchView::FullAnalysis,
                    "Full Analysis",
                );
                ui.selectable_value(
                    &mut self.match_view,
                    MatchView::QuickSummary,
                    "Quick Summary",
                );
            });

            let text = match self.match_view {
                MatchView::FullAnalysis => result.text.clone(),
                MatchView::QuickSummary => result.quick_summary(),
            };
            egui::ScrollArea::vertical()
                .id_salt("match_result")
                .show(ui, |ui| {
                    ui.label(text);
                });
        }
    }
}

impl eframe::App for PitchVisionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Pitch Vision");
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.surface, Surface::Pitch, "Pitch Analyzer");
                ui.selectable_value(&mut self.surface, Surface::Match, "Match Analyzer");
            });
            ui.separator();

            match self.surface {
                Surface::Pitch => self.draw_pitch_tab(ui),
                Surface::Match => self.draw_match_tab(ui),
            }
        });

        // Keep repainting while background work is in flight so channel
        // events are picked up promptly.
        if self.pitch_busy || self.run_phase.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
