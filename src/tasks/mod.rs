//! Background tasks module
//!
//! The tick driver that advances a running clock, and the task that turns
//! clock events into device feedback.

pub mod feedback;
pub mod tick_driver;

// Re-export main types
pub use feedback::{feedback_task, Feedback, FeedbackSink, LogFeedback};
pub use tick_driver::TickDriver;
