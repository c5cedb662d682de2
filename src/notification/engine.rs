//! The notification engine fans each notification out to its strategies.
//!
//! Strategies run one after another in registration order, each with its
//! own optional timeout. A failing or slow strategy is recorded and the
//! fan-out moves on to the next one.

use crate::core::{DeliveryOutcome, DeliveryReport, Observer};
use crate::error::{NotifierError, StrategyFailure};
use crate::observable::{same_instance, NotificationObservable};
use crate::types::SharedStrategy;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument};

pub struct NotificationEngine {
    strategies: RwLock<Vec<SharedStrategy>>,
    timeout: Option<Duration>,
    last_report: Mutex<Option<DeliveryReport>>,
}

impl Default for NotificationEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl NotificationEngine {
    /// Creates an engine. `timeout` bounds each individual strategy call.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            strategies: RwLock::new(Vec::new()),
            timeout,
            last_report: Mutex::new(None),
        }
    }

    pub fn add_notification_strategy(&self, strategy: SharedStrategy) {
        debug!(strategy = strategy.name(), "Strategy registered");
        self.strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(strategy);
    }

    /// Removes the first registration of `strategy`. Returns `false` if it
    /// was not registered.
    pub fn remove_notification_strategy(&self, strategy: &SharedStrategy) -> bool {
        let mut strategies = self
            .strategies
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match strategies.iter().position(|s| same_instance(s, strategy)) {
            Some(index) => {
                strategies.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The report of the most recent fan-out triggered through `update`.
    pub fn last_report(&self) -> Option<DeliveryReport> {
        self.last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sends `content` through every registered strategy.
    #[instrument(skip(self, content))]
    pub async fn fan_out(&self, content: &str) -> DeliveryReport {
        let strategies: Vec<SharedStrategy> = self
            .strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut report = DeliveryReport {
            outcomes: Vec::with_capacity(strategies.len()),
        };
        for strategy in strategies {
            let name = strategy.name().to_string();
            let result = match self.timeout {
                Some(limit) => match timeout(limit, strategy.send_notification(content)).await {
                    Ok(result) => result,
                    Err(_) => Err(NotifierError::Timeout {
                        strategy: name.clone(),
                        timeout: limit,
                    }
                    .into()),
                },
                None => strategy.send_notification(content).await,
            };

            match result {
                Ok(()) => {
                    metrics::counter!("deliveries_succeeded_total").increment(1);
                    report.outcomes.push(DeliveryOutcome::Delivered { strategy: name });
                }
                Err(e) => {
                    metrics::counter!("deliveries_failed_total").increment(1);
                    error!(strategy = %name, error = %e, "Delivery failed");
                    report.outcomes.push(DeliveryOutcome::Failed(StrategyFailure {
                        strategy: name,
                        reason: format!("{:#}", e),
                    }));
                }
            }
        }

        info!(
            attempted = report.attempted(),
            delivered = report.delivered(),
            "Fan-out complete"
        );
        report
    }
}

#[async_trait]
impl Observer for NotificationEngine {
    fn name(&self) -> &str {
        "notification_engine"
    }

    async fn update(&self, source: &NotificationObservable) -> Result<()> {
        let content = source.require_content()?;
        let report = self.fan_out(&content).await;
        *self
            .last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(report.clone());

        if report.is_success() {
            Ok(())
        } else {
            let failures = report.failures();
            Err(NotifierError::Delivery {
                failed: failures.len(),
                attempted: report.attempted(),
                failures,
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DeliveryStrategy;
    use crate::observable::ObserverFailurePolicy;
    use crate::sink::MemorySink;
    use crate::strategies::{EmailStrategy, PopUpStrategy, SmsStrategy};
    use std::sync::Arc;

    struct StalledStrategy;

    #[async_trait]
    impl DeliveryStrategy for StalledStrategy {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn send_notification(&self, _content: &str) -> Result<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    struct UnreachableStrategy;

    #[async_trait]
    impl DeliveryStrategy for UnreachableStrategy {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn send_notification(&self, _content: &str) -> Result<()> {
            anyhow::bail!("channel unreachable")
        }
    }

    #[tokio::test]
    async fn test_fan_out_in_registration_order() {
        // Arrange
        let sink = MemorySink::new();
        let engine = NotificationEngine::default();
        engine.add_notification_strategy(Arc::new(EmailStrategy::new("a@b.c", Arc::new(sink.clone()))));
        engine.add_notification_strategy(Arc::new(SmsStrategy::new("555", Arc::new(sink.clone()))));
        engine.add_notification_strategy(Arc::new(PopUpStrategy::new(Arc::new(sink.clone()))));

        // Act
        let report = engine.fan_out("hello").await;

        // Assert
        assert!(report.is_success());
        let order: Vec<&str> = report.outcomes.iter().map(|o| o.strategy()).collect();
        assert_eq!(order, vec!["email", "sms", "popup"]);
        assert_eq!(
            sink.lines(),
            vec![
                "Sending Email notification on a@b.c\nhello",
                "Sending SMS notification on 555\nhello",
                "Sending pop up notification \nhello",
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_siblings() {
        let sink = MemorySink::new();
        let engine = NotificationEngine::default();
        engine.add_notification_strategy(Arc::new(UnreachableStrategy));
        engine.add_notification_strategy(Arc::new(PopUpStrategy::new(Arc::new(sink.clone()))));

        let report = engine.fan_out("x").await;

        assert_eq!(report.attempted(), 2);
        assert_eq!(report.delivered(), 1);
        assert_eq!(report.failures()[0].strategy, "unreachable");
        assert!(report.failures()[0].reason.contains("channel unreachable"));
        assert_eq!(sink.lines().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_strategy_is_timed_out() {
        let sink = MemorySink::new();
        let engine = NotificationEngine::new(Some(Duration::from_millis(50)));
        engine.add_notification_strategy(Arc::new(StalledStrategy));
        engine.add_notification_strategy(Arc::new(PopUpStrategy::new(Arc::new(sink.clone()))));

        let report = engine.fan_out("x").await;

        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].strategy, "stalled");
        assert!(report.failures()[0].reason.contains("timed out"));
        assert_eq!(sink.lines(), vec!["Sending pop up notification \nx"]);
    }

    #[tokio::test]
    async fn test_remove_strategy() {
        let engine = NotificationEngine::default();
        let popup: SharedStrategy = Arc::new(PopUpStrategy::new(Arc::new(MemorySink::new())));
        engine.add_notification_strategy(popup.clone());
        engine.add_notification_strategy(Arc::new(UnreachableStrategy));

        assert!(engine.remove_notification_strategy(&popup));
        assert!(!engine.remove_notification_strategy(&popup));
        assert_eq!(engine.strategy_count(), 1);
    }

    #[tokio::test]
    async fn test_update_reports_delivery_failure() {
        use crate::content::{ContentExt, SimpleNotification};

        let engine = Arc::new(NotificationEngine::default());
        engine.add_notification_strategy(Arc::new(UnreachableStrategy));
        let observable = NotificationObservable::new(ObserverFailurePolicy::Isolate);
        observable.subscribe(engine.clone());

        let report = observable
            .set_current(SimpleNotification::new("x").into_shared())
            .await
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].observer, "notification_engine");
        assert!(report.failures[0].reason.contains("1 of 1 delivery strategies failed"));
        let last = engine.last_report().unwrap();
        assert!(!last.is_success());
    }

    // Registers `late` on its engine the first time it sends.
    struct RecruitingStrategy {
        engine: std::sync::Weak<NotificationEngine>,
        late: SharedStrategy,
        recruited: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl DeliveryStrategy for RecruitingStrategy {
        fn name(&self) -> &str {
            "recruiter"
        }

        async fn send_notification(&self, _content: &str) -> Result<()> {
            if !self.recruited.swap(true, std::sync::atomic::Ordering::SeqCst) {
                if let Some(engine) = self.engine.upgrade() {
                    engine.add_notification_strategy(self.late.clone());
                }
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_strategy_registered_during_fan_out_joins_next_one() {
        use crate::content::{ContentExt, SimpleNotification};

        // Arrange
        let sink = MemorySink::new();
        let engine = Arc::new(NotificationEngine::default());
        engine.add_notification_strategy(Arc::new(RecruitingStrategy {
            engine: Arc::downgrade(&engine),
            late: Arc::new(PopUpStrategy::new(Arc::new(sink.clone()))),
            recruited: std::sync::atomic::AtomicBool::new(false),
        }));
        let observable = NotificationObservable::default();
        observable.subscribe(engine.clone());

        // Act
        tokio::time::timeout(
            Duration::from_secs(2),
            observable.set_current(SimpleNotification::new("one").into_shared()),
        )
        .await
        .expect("fan-out did not finish")
        .unwrap();
        let first = engine.last_report().unwrap();
        observable
            .set_current(SimpleNotification::new("two").into_shared())
            .await
            .unwrap();

        // Assert
        assert_eq!(first.attempted(), 1);
        assert_eq!(engine.strategy_count(), 2);
        assert_eq!(engine.last_report().unwrap().attempted(), 2);
        assert_eq!(sink.lines(), vec!["Sending pop up notification \ntwo"]);
    }
}
