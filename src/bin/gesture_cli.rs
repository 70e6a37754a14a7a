use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gesture_presenter::calibration::{CalibrationEngine, CalibrationStep, ThresholdTable};
use gesture_presenter::config::AppConfig;
use gesture_presenter::engine::{
    ChannelHub, GestureClassifier, GestureSession, Mode, NoisyClassifier,
};
use gesture_presenter::fixtures::FrameScript;
use gesture_presenter::gesture::GestureSample;
use gesture_presenter::graph::WorkflowGraph;
use gesture_presenter::presentation::PresentationEvent;
use gesture_presenter::storage::{JsonThresholdStore, MemoryThresholdStore, ThresholdStore};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "gesture_cli",
    about = "Deterministic replay harness for the gesture presentation core"
)]
struct Cli {
    /// JSON configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a workflow graph and print its issues as JSON
    Validate {
        #[arg(long)]
        graph: PathBuf,
    },
    /// Replay a recorded script through calibration and print the thresholds
    Calibrate {
        #[arg(long)]
        script: PathBuf,
        /// Also write the thresholds to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replay a recorded script in live mode, one presentation event per line
    Present {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        thresholds: PathBuf,
        #[command(flatten)]
        replay: ReplayArgs,
    },
    /// Like `present`, with seeded confidence jitter on every frame
    Simulate {
        #[arg(long)]
        graph: PathBuf,
        /// Thresholds file; every gesture uses the default threshold when omitted
        #[arg(long)]
        thresholds: Option<PathBuf>,
        /// Maximum absolute confidence offset
        #[arg(long, default_value_t = 0.05)]
        jitter: f32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[command(flatten)]
        replay: ReplayArgs,
    },
}

#[derive(Args, Debug, Clone)]
struct ReplayArgs {
    /// Recorded classifier script (JSON array of frames)
    #[arg(long)]
    script: PathBuf,
    /// Pace frames at their recorded offsets instead of as fast as possible
    #[arg(long, default_value_t = false)]
    realtime: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Validate { graph } => run_validate(&graph),
        Commands::Calibrate { script, out } => run_calibrate(config, &script, out),
        Commands::Present {
            graph,
            thresholds,
            replay,
        } => {
            let graph = load_graph(&graph)?;
            let table = load_thresholds(&thresholds)?;
            let script = FrameScript::load(&replay.script)?;
            let classifier = script.classifier();
            let summary =
                replay_live(config, graph, classifier, table, &script, replay.realtime).await?;
            emit_summary(&summary)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Simulate {
            graph,
            thresholds,
            jitter,
            seed,
            replay,
        } => {
            let graph = load_graph(&graph)?;
            let table = match thresholds {
                Some(path) => load_thresholds(&path)?,
                None => ThresholdTable::uniform(config.dispatch.default_threshold),
            };
            let script = FrameScript::load(&replay.script)?;
            let classifier = NoisyClassifier::new(script.classifier(), jitter, seed);
            let summary =
                replay_live(config, graph, classifier, table, &script, replay.realtime).await?;
            emit_summary(&summary)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_validate(path: &Path) -> Result<ExitCode> {
    let graph = load_graph(path)?;
    let issues = graph.validate();
    println!("{}", serde_json::to_string_pretty(&issues)?);

    if issues.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

fn run_calibrate(config: AppConfig, script_path: &Path, out: Option<PathBuf>) -> Result<ExitCode> {
    let script = FrameScript::load(script_path)?;
    let settle = Duration::from_millis(config.calibration.settle_ms);
    let mut engine = CalibrationEngine::new(config.calibration);

    let start = Instant::now();
    engine.start(start);

    let mut completed = None;
    for (frame, recorded) in script.video_frames(start).zip(script.frames()) {
        if let Some(CalibrationStep::Completed { table }) = engine.tick(frame.captured_at) {
            completed = Some(table);
            break;
        }
        let sample = recorded
            .classification()
            .and_then(|raw| GestureSample::from_raw(&raw, frame.captured_at));
        if let Some(sample) = sample {
            engine.submit_sample(sample)?;
        }
    }

    // The recording may stop inside the final settle pause
    if completed.is_none() {
        let end = start + script.duration() + settle;
        if let Some(CalibrationStep::Completed { table }) = engine.tick(end) {
            completed = Some(table);
        }
    }

    let table = match completed {
        Some(table) => table,
        None => {
            let progress = engine.progress();
            bail!(
                "script ended before calibration finished ({} of 6 gestures, {:?} pending)",
                progress.gestures_done,
                progress.current_gesture
            );
        }
    };

    if let Some(path) = out {
        JsonThresholdStore::new(&path)
            .save(&table)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(ExitCode::SUCCESS)
}

async fn replay_live<C: GestureClassifier>(
    config: AppConfig,
    graph: Arc<WorkflowGraph>,
    classifier: C,
    table: ThresholdTable,
    script: &FrameScript,
    realtime: bool,
) -> Result<ReplaySummary> {
    let hub = ChannelHub::new();
    let mut events = hub.subscribe_presentation();
    let mut session = GestureSession::with_hub(
        config,
        graph,
        classifier,
        MemoryThresholdStore::with_table(table),
        hub,
    );

    let start = Instant::now();
    if session.begin(start) != Mode::Live {
        bail!("thresholds do not cover every gesture");
    }
    drain_events(&mut events)?;

    let paced_from = tokio::time::Instant::now();
    let mut skipped_frames = 0;
    for frame in script.video_frames(start) {
        if realtime {
            tokio::time::sleep_until(paced_from + (frame.captured_at - start)).await;
        }
        if session.tick(frame.captured_at, frame).skipped {
            skipped_frames += 1;
        }
        drain_events(&mut events)?;
    }

    let state = session.presentation().state();
    Ok(ReplaySummary {
        frames: script.len(),
        skipped_frames,
        final_node: state.current_node_id.clone(),
        zoom_level: state.zoom_level,
        metrics: session.hub().telemetry().snapshot().counts,
    })
}

fn drain_events(events: &mut broadcast::Receiver<PresentationEvent>) -> Result<()> {
    loop {
        match events.try_recv() {
            Ok(event) => println!("{}", serde_json::to_string(&event)?),
            Err(TryRecvError::Lagged(missed)) => {
                tracing::warn!(missed, "presentation events dropped");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
        }
    }
}

fn load_graph(path: &Path) -> Result<Arc<WorkflowGraph>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let graph = WorkflowGraph::from_json(&contents)
        .with_context(|| format!("parsing graph {}", path.display()))?;
    Ok(Arc::new(graph))
}

fn load_thresholds(path: &Path) -> Result<ThresholdTable> {
    match JsonThresholdStore::new(path)
        .load()
        .with_context(|| format!("loading thresholds {}", path.display()))?
    {
        Some(table) => Ok(table),
        None => bail!("thresholds file {} does not exist", path.display()),
    }
}

fn emit_summary(summary: &ReplaySummary) -> Result<()> {
    eprintln!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

#[derive(Serialize)]
struct ReplaySummary {
    frames: usize,
    skipped_frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_node: Option<String>,
    zoom_level: f32,
    metrics: BTreeMap<String, u64>,
}
