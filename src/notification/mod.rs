//! Observers of the notification stream.
//!
//! Both observers pull the rendered content from the observable at notify
//! time. The logger records it; the engine fans it out to every registered
//! delivery strategy.
pub mod engine;
pub mod logger;

pub use engine::NotificationEngine;
pub use logger::{LogFormat, Logger};
