//! The observable that holds the current notification and its subscribers.
//!
//! Publishing is a cascade: store the new content, then await every
//! subscribed observer's `update` in subscription order. Cascades are
//! serialized, so observers always read the notification that triggered
//! them. The subscriber list is only locked long enough to take a snapshot,
//! never while an observer runs.

use crate::core::{NotifyReport, Observer, ObserverFailure};
use crate::error::NotifierError;
use crate::types::{SharedContent, SharedObserver};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// What to do when an observer's `update` fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObserverFailurePolicy {
    /// Stop at the first failure and return it to the publisher.
    #[default]
    FailFast,
    /// Record the failure and keep notifying the remaining observers.
    Isolate,
}

/// Compares two trait objects by the address of their data, ignoring vtables.
pub(crate) fn same_instance<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

pub struct NotificationObservable {
    current: RwLock<Option<SharedContent>>,
    observers: RwLock<Vec<SharedObserver>>,
    policy: ObserverFailurePolicy,
    cascade: Mutex<()>,
}

impl Default for NotificationObservable {
    fn default() -> Self {
        Self::new(ObserverFailurePolicy::default())
    }
}

impl NotificationObservable {
    pub fn new(policy: ObserverFailurePolicy) -> Self {
        Self {
            current: RwLock::new(None),
            observers: RwLock::new(Vec::new()),
            policy,
            cascade: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> ObserverFailurePolicy {
        self.policy
    }

    /// Appends an observer. Subscribing the same observer twice means it is
    /// notified twice.
    pub fn subscribe(&self, observer: SharedObserver) {
        debug!(observer = observer.name(), "Observer subscribed");
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Removes the first subscription of `observer`.
    ///
    /// Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, observer: &SharedObserver) -> bool {
        let mut observers = self
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match observers.iter().position(|o| same_instance(o, observer)) {
            Some(index) => {
                let removed = observers.remove(index);
                debug!(observer = removed.name(), "Observer unsubscribed");
                true
            }
            None => false,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` once a notification has been set.
    pub fn is_active(&self) -> bool {
        self.current_notification().is_some()
    }

    pub fn current_notification(&self) -> Option<SharedContent> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Renders the current notification, or `None` before the first publish.
    pub fn current_content(&self) -> Option<String> {
        self.current_notification().map(|c| c.content())
    }

    /// Like [`current_content`](Self::current_content), for observers that
    /// treat an empty observable as an error.
    pub fn require_content(&self) -> Result<String, NotifierError> {
        self.current_content()
            .ok_or(NotifierError::NoCurrentNotification)
    }

    /// Stores `notification` as current and notifies every observer.
    ///
    /// Must not be called from inside an observer of this observable: the
    /// call would wait for the cascade it is part of.
    pub async fn set_current(&self, notification: SharedContent) -> Result<NotifyReport, NotifierError> {
        let _cascade = self.cascade.lock().await;
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(notification);
        self.notify_observers().await
    }

    /// Re-runs the cascade for the current notification.
    pub async fn notify(&self) -> Result<NotifyReport, NotifierError> {
        let _cascade = self.cascade.lock().await;
        self.notify_observers().await
    }

    async fn notify_observers(&self) -> Result<NotifyReport, NotifierError> {
        let observers: Vec<SharedObserver> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut report = NotifyReport::default();
        for observer in observers {
            report.notified += 1;
            if let Err(e) = observer.update(self).await {
                metrics::counter!("observer_failures_total").increment(1);
                match self.policy {
                    ObserverFailurePolicy::FailFast => {
                        return Err(NotifierError::Observer {
                            observer: observer.name().to_string(),
                            reason: format!("{:#}", e),
                        });
                    }
                    ObserverFailurePolicy::Isolate => {
                        warn!(observer = observer.name(), error = %e, "Observer failed, continuing with the rest");
                        report.failures.push(ObserverFailure {
                            observer: observer.name().to_string(),
                            reason: format!("{:#}", e),
                        });
                    }
                }
            }
        }
        Ok(report)
    }
}
