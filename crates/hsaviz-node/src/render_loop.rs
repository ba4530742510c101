//! Fixed-rate render loop.
//!
//! One tick renders the latest inputs and hands the frame to the publisher.
//! Ticks missed while a frame is still being drawn are skipped, never
//! replayed. A frame that fails to render is logged and not published; the
//! loop keeps going.

use std::sync::Arc;
use std::time::Duration;

use hsaviz_core::{Kinematics, Renderer};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::publisher::{Frame, FramePublisher, PublishError};
use crate::state::LatestInputs;

/// Rate and optional frame budget of a loop run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSettings {
    /// Ticks per second.
    pub frequency: f64,
    /// Stop after this many published frames.
    pub max_frames: Option<u64>,
}

/// Longest tick period, used for non-positive or non-finite frequencies.
const MAX_PERIOD: Duration = Duration::from_secs(3600);
/// Shortest tick period; `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_nanos(1);

impl LoopSettings {
    /// Tick period, clamped to `[1 ns, 1 h]`.
    pub fn period(&self) -> Duration {
        let seconds = 1.0 / self.frequency;
        if seconds.is_finite() && seconds > 0.0 {
            Duration::from_secs_f64(seconds.min(MAX_PERIOD.as_secs_f64())).max(MIN_PERIOD)
        } else {
            MAX_PERIOD
        }
    }
}

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    /// Ticks with no configuration yet.
    pub idle: u64,
    pub published: u64,
    /// Frames that failed to render.
    pub failed: u64,
    /// Frames rendered but refused by a busy consumer.
    pub dropped: u64,
}

/// Render at `settings.frequency` until shutdown, frame budget, or a closed
/// publisher.
pub async fn run_render_loop<K, P>(
    renderer: Arc<Renderer<K>>,
    inputs: Arc<LatestInputs>,
    mut publisher: P,
    settings: LoopSettings,
    mut shutdown: watch::Receiver<bool>,
) -> LoopStats
where
    K: Kinematics,
    P: FramePublisher,
{
    let mut interval = tokio::time::interval(settings.period());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats = LoopStats::default();

    tracing::info!(frequency = settings.frequency, max_frames = ?settings.max_frames, "render loop started");

    loop {
        let stop = *shutdown.borrow();
        if stop {
            break;
        }
        if settings.max_frames.is_some_and(|max| stats.published >= max) {
            break;
        }

        tokio::select! {
            _ = interval.tick() => {}
            changed = shutdown.changed() => {
                if changed.is_err() {
                    // A dropped sender counts as shutdown.
                    break;
                }
                continue;
            }
        }
        stats.ticks += 1;

        let Some((q, annotations)) = inputs.snapshot() else {
            stats.idle += 1;
            continue;
        };

        let image = match renderer.draw(&q, &annotations) {
            Ok(image) => image,
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(error = %e, "frame not rendered");
                continue;
            }
        };

        let frame = Frame {
            sequence: stats.published,
            image,
        };
        match publisher.publish(frame) {
            Ok(()) => stats.published += 1,
            Err(PublishError::Busy) => {
                stats.dropped += 1;
                tracing::debug!("consumer busy, frame dropped");
            }
            Err(PublishError::Closed) => {
                tracing::info!("frame consumer closed");
                break;
            }
        }
    }

    tracing::info!(?stats, "render loop stopped");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_frequency() {
        let settings = LoopSettings {
            frequency: 20.0,
            max_frames: None,
        };
        assert_eq!(settings.period(), Duration::from_millis(50));
    }

    #[test]
    fn test_period_is_never_zero() {
        let period = |frequency| {
            LoopSettings {
                frequency,
                max_frames: None,
            }
            .period()
        };
        assert_eq!(period(1e12), Duration::from_nanos(1));
        assert_eq!(period(f64::MAX), Duration::from_nanos(1));
        assert_eq!(period(0.0), MAX_PERIOD);
        assert_eq!(period(-5.0), MAX_PERIOD);
        assert_eq!(period(f64::NAN), MAX_PERIOD);
        assert_eq!(period(1e-9), MAX_PERIOD);
    }
}
