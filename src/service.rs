//! The notification service: the single entry point for publishing.
//!
//! A service owns the observable and an append-only history. It is built
//! explicitly and shared by reference (usually behind an `Arc`); there is
//! no process-global instance.

use crate::core::NotifyReport;
use crate::error::NotifierError;
use crate::observable::{NotificationObservable, ObserverFailurePolicy};
use crate::types::{SharedContent, SharedObserver};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

pub struct NotificationService {
    observable: Arc<NotificationObservable>,
    history: RwLock<Vec<SharedContent>>,
    dispatch: Mutex<()>,
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new(ObserverFailurePolicy::default())
    }
}

impl NotificationService {
    pub fn new(policy: ObserverFailurePolicy) -> Self {
        Self::with_observable(Arc::new(NotificationObservable::new(policy)))
    }

    pub fn with_observable(observable: Arc<NotificationObservable>) -> Self {
        Self {
            observable,
            history: RwLock::new(Vec::new()),
            dispatch: Mutex::new(()),
        }
    }

    pub fn observable(&self) -> &Arc<NotificationObservable> {
        &self.observable
    }

    /// Shorthand for subscribing to the service's observable.
    pub fn subscribe(&self, observer: SharedObserver) {
        self.observable.subscribe(observer);
    }

    pub fn unsubscribe(&self, observer: &SharedObserver) -> bool {
        self.observable.unsubscribe(observer)
    }

    /// Records `content` and publishes it.
    ///
    /// Returns once every observer, and every strategy behind them, has run.
    /// Concurrent callers are serialized: history order matches publish order.
    #[instrument(skip_all)]
    pub async fn send_notification(&self, content: SharedContent) -> Result<NotifyReport, NotifierError> {
        let _dispatch = self.dispatch.lock().await;
        let position = {
            let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
            history.push(content.clone());
            history.len()
        };
        debug!(position, "Publishing notification");
        metrics::counter!("notifications_sent_total").increment(1);
        self.observable.set_current(content).await
    }

    /// A snapshot of every notification sent, oldest first.
    pub fn history(&self) -> Vec<SharedContent> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn history_len(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
