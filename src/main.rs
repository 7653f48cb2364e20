//! Application entry point — Pitch Vision.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Resolve the Gemini API key — absence is fatal and halts startup
//!    before the window opens.
//! 4. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Build the [`HttpGeminiClient`] from config.
//! 6. Create the command / event channels.
//! 7. Spawn the analysis orchestrator on the tokio runtime.
//! 8. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use tokio::sync::mpsc;

use pitch_vision::{
    analysis::PitchAnalyzer,
    app::{AppCommand, AppEvent, PitchVisionApp},
    config::{AppConfig, API_KEY_ENV},
    gemini::{GeminiClient, HttpGeminiClient},
    pipeline::MatchPipeline,
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Analysis orchestrator
// ---------------------------------------------------------------------------

/// Command loop that runs inside the tokio runtime.
///
/// Listens for [`AppCommand`]s, drives the pitch analyzer or the match
/// pipeline, and emits [`AppEvent`]s back to the UI.  Commands are handled
/// one at a time; the UI disables its buttons while a run is in flight.
async fn run_orchestrator(
    client: Arc<dyn GeminiClient>,
    config: AppConfig,
    mut command_rx: mpsc::Receiver<AppCommand>,
    event_tx: mpsc::Sender<AppEvent>,
) {
    let pitch = PitchAnalyzer::new(Arc::clone(&client));
    let pipeline = MatchPipeline::new(Arc::clone(&client), config.poll.clone());

    while let Some(command) = command_rx.recv().await {
        match command {
            AppCommand::AnalyzePitch { idea } => {
                let event = match pitch.analyze(&idea).await {
                    Ok(feedback) => AppEvent::PitchComplete { feedback },
                    Err(e) => {
                        log::warn!("pitch analysis failed: {e}");
                        AppEvent::PitchFailed {
                            message: format!("An error occurred with the AI: {e}"),
                        }
                    }
                };
                let _ = event_tx.send(event).await;
            }

            AppCommand::AnalyzeClip { path, focus } => {
                let phase_tx = event_tx.clone();
                let outcome = pipeline
                    .analyze_path(&path, &focus, |phase| {
                        let _ = phase_tx.try_send(AppEvent::ClipPhase { phase });
                    })
                    .await;

                let event = match outcome {
                    Ok(result) => AppEvent::ClipComplete { result },
                    Err(e) => {
                        log::warn!("match analysis failed: {e}");
                        AppEvent::ClipFailed {
                            message: e.to_string(),
                        }
                    }
                };
                let _ = event_tx.send(event).await;
            }
        }
    }

    log::info!("orchestrator: command channel closed, shutting down");
}

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([760.0, 640.0])
        .with_min_inner_size([480.0, 360.0]);

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pitch Vision starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Credential — fatal when absent (nothing works without it)
    let api_key = match config.gemini.resolve_api_key() {
        Some(key) => key,
        None => {
            log::error!(
                "API key not found. Set the {API_KEY_ENV} environment variable \
                 or add `api_key` under [gemini] in settings.toml."
            );
            eprintln!("API key not found. Please add '{API_KEY_ENV}' to your environment.");
            std::process::exit(1);
        }
    };

    // 4. Tokio runtime (2 worker threads)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 5. Gemini client
    let client: Arc<dyn GeminiClient> =
        Arc::new(HttpGeminiClient::from_config(&config.gemini, api_key));

    // 6. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>(16);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // 7. Spawn the orchestrator onto the tokio runtime
    rt.spawn(run_orchestrator(
        client,
        config.clone(),
        command_rx,
        event_tx,
    ));

    // 8. Build the egui app and run it (blocks until the window is closed)
    let app = PitchVisionApp::new(command_tx, event_rx, config.clone());
    let options = native_options(&config);

    eframe::run_native(
        "Pitch Vision",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
