//! Chess Clock - A headless two-sided chess clock served over HTTP
//!
//! The clock core tracks both countdowns against a monotonic time source;
//! the rest of the crate drives it with a tick task, persists display
//! settings, and exposes every user action as an HTTP endpoint.

pub mod api;
pub mod clock;
pub mod config;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{ClockError, ClockEvent, ClockState, Side};
pub use config::Config;
pub use state::AppState;
pub use utils::{format_time, shutdown_signal};
