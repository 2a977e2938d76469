//! # ARBORA Headless Installation
//!
//! Runs the full frame loop without a renderer. A scripted hand opens
//! (galaxy), makes a fist (tree), then pinches a photo card; a double click
//! toggles the formation once more.
//!
//! Usage: `arbora_installation [config.toml]`
//!
//! Log level through `RUST_LOG` (default `info`).

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use arbora::input::{PointerInput, RawLandmarks, ScriptedSource, SyntheticHand};
use arbora::scene::TARGET_FRAME_TIME;
use arbora::shared::Vec2;
use arbora::{DirectoryAssets, Installation, InstallationConfig, InstallationError, SceneEvent};
use tracing_subscriber::EnvFilter;

/// Frames to run (10 s at 60 FPS).
const FRAMES: u64 = 600;

/// Capture cadence of the scripted hand (30 Hz).
const CAPTURE_CADENCE: Duration = Duration::from_millis(33);

fn repeat(hand: Option<SyntheticHand>, captures: usize) -> impl Iterator<Item = Option<RawLandmarks>> {
    std::iter::repeat(hand.map(|h| h.to_raw())).take(captures)
}

fn script() -> Vec<Option<RawLandmarks>> {
    repeat(None, 15)
        .chain(repeat(Some(SyntheticHand::open()), 60))
        .chain(repeat(Some(SyntheticHand::fist()), 60))
        .chain(repeat(Some(SyntheticHand::open().pinching()), 45))
        .chain(repeat(Some(SyntheticHand::pointing()), 15))
        .chain(repeat(None, 30))
        .collect()
}

fn run() -> Result<(), InstallationError> {
    let config = match std::env::args().nth(1) {
        Some(path) => InstallationConfig::load(path)?,
        None => InstallationConfig::default(),
    };

    let mut loader = DirectoryAssets::new("assets/photos");
    let mut installation = Installation::new(&config, &mut loader)?;
    installation.enable_tracking(ScriptedSource::new(script(), CAPTURE_CADENCE));

    let dt = TARGET_FRAME_TIME.as_secs_f32();
    for frame in 0..FRAMES {
        let start = Instant::now();

        // Double click at 8 s.
        if frame == 480 {
            let t = installation.clock();
            installation.push_pointer(PointerInput::Press { pos: Vec2::ZERO, time: t });
            installation.push_pointer(PointerInput::Release { pos: Vec2::ZERO });
            installation.push_pointer(PointerInput::Press { pos: Vec2::ZERO, time: t + 0.15 });
            installation.push_pointer(PointerInput::Release { pos: Vec2::ZERO });
        }

        for event in installation.frame(dt) {
            if let SceneEvent::FormationChanged { to, .. } = event {
                tracing::info!("Frame {}: now showing {}", frame, to.name());
            }
        }

        if frame % 60 == 59 {
            tracing::info!(
                "t={:.1}s mode={:?} settled={:.0}%",
                installation.clock(),
                installation.context().mode(),
                installation.choreographer().settled_fraction() * 100.0
            );
        }

        if let Some(rest) = TARGET_FRAME_TIME.checked_sub(start.elapsed()) {
            thread::sleep(rest);
        }
    }

    installation.disable_tracking();
    installation.stats().log_summary();
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
