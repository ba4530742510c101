//! Planar HSA visualization node.
//!
//! Renders the robot at a fixed rate from a synthetic bending sweep and logs
//! statistics of the published frames.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use hsaviz_core::{Kinematics, PiecewiseConstantStrain, Pose, Renderer, WorkspaceBoundaryProvider};
use hsaviz_node::{
    BendingSweep, ChannelPublisher, Frame, LatestInputs, LoopSettings, NodeConfig, run_render_loop,
};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Input update rate of the synthetic sweep.
const SWEEP_UPDATE_PERIOD: Duration = Duration::from_millis(10);
/// Frames buffered between the loop and the consumer.
const FRAME_QUEUE: usize = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Planar HSA robot visualization node")]
struct Args {
    /// JSON configuration file (falls back to $HSAVIZ_CONFIG, then defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop after publishing this many frames
    #[arg(long)]
    frames: Option<u64>,
    /// Peak bending strain of the synthetic sweep, in rad/m
    #[arg(long, default_value_t = 10.0)]
    amplitude: f64,
    /// Duration of one sweep, in seconds
    #[arg(long, default_value_t = 4.0)]
    period: f64,
    /// Log statistics every N frames
    #[arg(long, default_value_t = 20)]
    log_every: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = NodeConfig::resolve(args.config.as_deref()).context("loading configuration")?;
    let boundaries = config
        .workspace_boundaries()
        .context("loading workspace boundaries")?;
    let kinematics = PiecewiseConstantStrain::new(config.rod_offset);
    let renderer = Renderer::new(
        kinematics,
        config.geometry.clone(),
        config.renderer.clone(),
        boundaries.as_ref().map(|b| b as &dyn WorkspaceBoundaryProvider),
    )
    .context("building renderer")?;
    let renderer = Arc::new(renderer);

    info!(
        segments = config.geometry.num_segments(),
        width = config.renderer.width,
        height = config.renderer.height,
        frequency = config.rendering_frequency,
        "renderer ready"
    );

    let inputs = Arc::new(LatestInputs::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (publisher, frames) = ChannelPublisher::channel(FRAME_QUEUE);

    let sweep = BendingSweep {
        num_segments: config.geometry.num_segments(),
        amplitude: args.amplitude,
        period: args.period.max(f64::EPSILON),
    };
    let setpoint = kinematics.end_effector(&config.geometry, &sweep.target());
    let sweep_task = tokio::spawn(drive_sweep(
        sweep,
        setpoint,
        Arc::clone(&inputs),
        shutdown_rx.clone(),
    ));
    let consumer_task = tokio::spawn(consume_frames(frames, args.log_every.max(1)));

    let settings = LoopSettings {
        frequency: config.rendering_frequency,
        max_frames: args.frames,
    };
    let mut render_task = tokio::spawn(run_render_loop(
        Arc::clone(&renderer),
        inputs,
        publisher,
        settings,
        shutdown_rx,
    ));

    let stats = tokio::select! {
        res = &mut render_task => res.context("render loop panicked")?,
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl-c received, shutting down");
            let _ = shutdown_tx.send(true);
            render_task.await.context("render loop panicked")?
        }
    };
    let _ = shutdown_tx.send(true);

    if let Err(e) = sweep_task.await {
        warn!(error = %e, "sweep task failed");
    }
    let consumed = consumer_task.await.context("frame consumer panicked")?;
    info!(
        published = stats.published,
        consumed,
        failed = stats.failed,
        dropped = stats.dropped,
        "done"
    );
    Ok(())
}

/// Feed the sweep into the latest inputs until shutdown.
async fn drive_sweep(
    sweep: BendingSweep,
    setpoint: Pose,
    inputs: Arc<LatestInputs>,
    mut shutdown: watch::Receiver<bool>,
) {
    let start = Instant::now();
    let mut interval = tokio::time::interval(SWEEP_UPDATE_PERIOD);
    loop {
        let stop = *shutdown.borrow();
        if stop {
            break;
        }
        tokio::select! {
            _ = interval.tick() => {
                let t = start.elapsed().as_secs_f64();
                inputs.set_configuration(sweep.configuration_at(t));
                inputs.set_annotations(sweep.annotations_at(t, setpoint));
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}

/// Drain published frames, logging summary statistics.
async fn consume_frames(mut frames: mpsc::Receiver<Frame>, log_every: u64) -> u64 {
    let mut consumed = 0;
    while let Some(frame) = frames.recv().await {
        consumed += 1;
        if frame.sequence % log_every == 0 {
            let background = *frame.image.get_pixel(0, 0);
            let ink = frame.image.pixels().filter(|p| **p != background).count();
            info!(
                sequence = frame.sequence,
                width = frame.image.width(),
                height = frame.image.height(),
                ink,
                "frame"
            );
        }
    }
    consumed
}
