/// Notifier - composition and dispatch of notifications
///
/// Content is built from a plain message wrapped in decorators, published
/// through a `NotificationService`, and delivered by observers: a logger and
/// a notification engine that fans out to email, SMS and pop-up strategies.
pub mod notification;

pub mod cli;
pub mod clock;
pub mod config;
pub mod content;
pub mod core;
pub mod error;
pub mod observable;
pub mod pipeline;
pub mod service;
pub mod sink;
pub mod strategies;
pub mod types;

// Re-export core types for convenience
pub use crate::core::*;
pub use content::{ContentExt, Decorated, SignatureDecorator, SimpleNotification, TimeStampDecorator};
pub use error::NotifierError;
pub use observable::{NotificationObservable, ObserverFailurePolicy};
pub use service::NotificationService;
