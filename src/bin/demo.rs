//! demo - scripted end-to-end proctoring session

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use proctor_engine::{
    BBox, Detection, EngineConfig, ProctorEngine, RefreshScheduler, ScriptedBackend,
    SyntheticSource,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON detection script (list of frames). Uses a built-in scenario if omitted.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Number of refresh cycles to run.
    #[arg(long, default_value_t = 600)]
    cycles: u64,
    /// Override the configured refresh rate.
    #[arg(long, env = "PROCTOR_REFRESH_HZ")]
    fps: Option<u32>,
    /// Synthetic frame width.
    #[arg(long, default_value_t = 640)]
    width: u32,
    /// Synthetic frame height.
    #[arg(long, default_value_t = 480)]
    height: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = EngineConfig::load()?;
    if let Some(fps) = args.fps {
        if fps == 0 {
            return Err(anyhow!("fps must be >= 1"));
        }
        cfg.refresh_hz = fps;
    }

    let backend = match &args.script {
        Some(path) => ScriptedBackend::from_json_file(path)?,
        None => builtin_scenario(),
    };

    let refresh_hz = cfg.refresh_hz;
    let mut engine = ProctorEngine::new(cfg);
    engine
        .load_model(backend)
        .context("failed to load detector")?;
    engine.attach_source(Box::new(SyntheticSource::new(args.width, args.height)));

    let stop = engine.stop_handle();
    ctrlc::set_handler(move || stop.stop()).context("error setting Ctrl-C handler")?;

    engine.start()?;
    log::info!(
        "running {} cycles at {} Hz (Ctrl-C to stop)",
        args.cycles,
        refresh_hz
    );
    let mut scheduler = RefreshScheduler::new(refresh_hz).with_cycle_limit(args.cycles);
    let cycles = engine.run(&mut scheduler);
    engine.stop();

    let snap = engine.snapshot();
    log::info!("cycles run: {}", cycles);
    log::info!("warnings: {}", snap.warning_count);
    log::info!("persons in last frame: {}", snap.person_count);
    log::info!(
        "prohibited objects seen: {:?}",
        snap.prohibited_objects_ever_detected
    );
    log::info!("moving too much: {}", snap.is_moving_too_much);
    log::info!(
        "frames: processed={} failed={} skipped={}",
        snap.stats.frames_processed,
        snap.stats.frames_failed,
        snap.stats.frames_skipped
    );
    if let Some(err) = &snap.last_error {
        log::warn!("last error: {}", err);
    }
    Ok(())
}

/// Ten seconds at 60 Hz: a still candidate, a lean to the side, a phone,
/// a second person, an empty chair.
fn builtin_scenario() -> ScriptedBackend {
    let person = |x: f32| Detection::new("person", 0.92, BBox::new(x, 80.0, 220.0, 360.0));
    let phone = Detection::new("cell phone", 0.55, BBox::new(420.0, 300.0, 40.0, 80.0));

    let mut frames = Vec::new();
    frames.extend(std::iter::repeat(vec![person(200.0)]).take(120));
    frames.extend(std::iter::repeat(vec![person(240.0)]).take(120));
    frames.extend(std::iter::repeat(vec![person(240.0), phone]).take(120));
    frames.extend(std::iter::repeat(vec![person(240.0), person(20.0)]).take(120));
    frames.extend(std::iter::repeat(Vec::new()).take(120));
    ScriptedBackend::from_detections(frames)
}
