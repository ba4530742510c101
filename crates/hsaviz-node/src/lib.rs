//! HSA Viz Node — drives a renderer at a fixed rate.
//!
//! Input sources write into [`LatestInputs`]; [`run_render_loop`] snapshots
//! them every tick, renders, and hands frames to a [`FramePublisher`].

pub mod config;
pub mod publisher;
pub mod render_loop;
pub mod state;
pub mod sweep;

pub use config::{ConfigError, MAX_RENDERING_FREQUENCY, NodeConfig};
pub use publisher::{ChannelPublisher, Frame, FramePublisher, PublishError};
pub use render_loop::{LoopSettings, LoopStats, run_render_loop};
pub use state::LatestInputs;
pub use sweep::BendingSweep;
