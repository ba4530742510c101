//! Frame output seam.

use image::RgbImage;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// One rendered frame with its position in the output sequence.
#[derive(Debug, Clone)]
pub struct Frame {
    pub sequence: u64,
    pub image: RgbImage,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// The consumer is behind; this frame was dropped.
    #[error("consumer is busy, frame dropped")]
    Busy,
    /// The consumer is gone; no further frame can be delivered.
    #[error("consumer disconnected")]
    Closed,
}

/// Destination for rendered frames.
pub trait FramePublisher {
    fn publish(&mut self, frame: Frame) -> Result<(), PublishError>;
}

/// Publishes frames on a bounded in-process channel without waiting.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    tx: mpsc::Sender<Frame>,
}

impl ChannelPublisher {
    /// A publisher and the receiving end, holding at most `capacity` frames.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl FramePublisher for ChannelPublisher {
    fn publish(&mut self, frame: Frame) -> Result<(), PublishError> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => PublishError::Busy,
            TrySendError::Closed(_) => PublishError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(sequence: u64) -> Frame {
        Frame {
            sequence,
            image: RgbImage::new(2, 2),
        }
    }

    #[test]
    fn test_full_channel_drops_frame() {
        let (mut publisher, mut rx) = ChannelPublisher::channel(1);
        assert_eq!(publisher.publish(frame(0)), Ok(()));
        assert_eq!(publisher.publish(frame(1)), Err(PublishError::Busy));
        assert_eq!(rx.try_recv().map(|f| f.sequence).ok(), Some(0));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_is_reported() {
        let (mut publisher, rx) = ChannelPublisher::channel(4);
        drop(rx);
        assert_eq!(publisher.publish(frame(0)), Err(PublishError::Closed));
    }
}
