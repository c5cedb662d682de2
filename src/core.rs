//! Core domain types and capability traits for the notification pipeline
//!
//! This module defines the contracts that govern how content is produced,
//! how observers react to a new notification, and how delivery channels
//! consume the final rendered text.

use crate::error::StrategyFailure;
use crate::observable::NotificationObservable;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};

// =============================================================================
// Capability Traits
// =============================================================================

/// Produces the textual payload of a notification.
///
/// Implementations are built once and never edited in place. Wrapping a
/// content value produces a new outer node that owns the inner one.
pub trait NotificationContent: Send + Sync {
    /// Renders the content.
    ///
    /// Pure for every implementation except ones that read a clock, which
    /// render the instant at which they are called.
    fn content(&self) -> String;
}

/// Reacts to a change of the observable's current notification.
#[async_trait]
pub trait Observer: Send + Sync {
    /// A short, descriptive name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Called once per published notification, in subscription order.
    ///
    /// # Arguments
    /// * `source` - The observable that is notifying. Observers pull the
    ///   current content from it rather than receiving it directly.
    ///
    /// # Returns
    /// * `Ok(())` if the observer handled the notification
    /// * `Err` if it failed; the observable's failure policy decides what
    ///   happens to the remaining observers
    async fn update(&self, source: &NotificationObservable) -> Result<()>;
}

/// Delivers final rendered content through one channel.
#[async_trait]
pub trait DeliveryStrategy: Send + Sync {
    /// A unique, descriptive name for the channel (e.g., "email", "sms").
    fn name(&self) -> &str;

    /// Sends the rendered content through this channel.
    ///
    /// # Returns
    /// * `Ok(())` if the content was delivered
    /// * `Err` if the channel failed; sibling strategies are still attempted
    async fn send_notification(&self, content: &str) -> Result<()>;
}

/// A line-oriented destination for rendered output (console, buffer, ...).
pub trait Sink: Send + Sync {
    fn write_line(&self, line: &str) -> Result<()>;
}

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

// =============================================================================
// Reports
// =============================================================================

/// The result of handing content to a single strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { strategy: String },
    Failed(StrategyFailure),
}

impl DeliveryOutcome {
    pub fn strategy(&self) -> &str {
        match self {
            DeliveryOutcome::Delivered { strategy } => strategy.as_str(),
            DeliveryOutcome::Failed(failure) => failure.strategy.as_str(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// Per-strategy outcomes of one fan-out, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_delivered()).count()
    }

    /// Returns the failed deliveries, in registration order.
    pub fn failures(&self) -> Vec<StrategyFailure> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                DeliveryOutcome::Failed(failure) => Some(failure.clone()),
                DeliveryOutcome::Delivered { .. } => None,
            })
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(DeliveryOutcome::is_delivered)
    }
}

/// An observer whose `update` failed during a notify pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    pub observer: String,
    pub reason: String,
}

/// Summary of one notify pass over the subscribed observers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyReport {
    /// Number of observers whose `update` was invoked.
    pub notified: usize,
    /// Observers that failed, in the order they were notified.
    pub failures: Vec<ObserverFailure>,
}

impl NotifyReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
