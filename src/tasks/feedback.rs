//! Haptic feedback background task

use std::{sync::Arc, time::Duration};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{clock::ClockEvent, state::AppState};

/// Length of the pulse when a side runs out of time.
pub const EXPIRY_VIBRATION: Duration = Duration::from_millis(50);

/// A device feedback request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Short tap acknowledging a press, pause or restart.
    Tap,
    /// Vibration pulse of the given length.
    Vibrate(Duration),
}

impl Feedback {
    pub fn for_event(event: &ClockEvent) -> Self {
        match event {
            ClockEvent::Expired { .. } => Feedback::Vibrate(EXPIRY_VIBRATION),
            _ => Feedback::Tap,
        }
    }
}

/// Fire-and-forget receiver of feedback requests.
pub trait FeedbackSink: Send + Sync {
    fn notify(&self, feedback: Feedback);
}

/// Sink that only logs; stands in for a device vibrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn notify(&self, feedback: Feedback) {
        match feedback {
            Feedback::Tap => info!("Feedback: tap"),
            Feedback::Vibrate(length) => info!("Feedback: vibrate for {}ms", length.as_millis()),
        }
    }
}

/// Forward clock events to `sink` until the event channel closes
pub async fn feedback_task<S: FeedbackSink>(state: Arc<AppState>, sink: S) {
    info!("Starting feedback task");

    let mut event_rx = state.event_tx.subscribe();
    drop(state);

    loop {
        match event_rx.recv().await {
            Ok(event) => sink.notify(Feedback::for_event(&event)),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Feedback task lagged, dropped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Feedback task finished");
}
