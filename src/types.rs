//! Common type aliases used throughout the pipeline.

use crate::core::{DeliveryStrategy, NotificationContent, Observer, Sink};
use std::sync::Arc;

pub type SharedContent = Arc<dyn NotificationContent>;
pub type SharedObserver = Arc<dyn Observer>;
pub type SharedStrategy = Arc<dyn DeliveryStrategy>;
pub type SharedSink = Arc<dyn Sink>;
