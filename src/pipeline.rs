//! Wiring a notification service from configuration.

use crate::config::{Config, DecorationConfig};
use crate::content::{ContentExt, SignatureDecorator, SimpleNotification, TimeStampDecorator};
use crate::core::{Clock, NotifyReport};
use crate::error::NotifierError;
use crate::notification::{Logger, NotificationEngine};
use crate::service::NotificationService;
use crate::strategies::{EmailStrategy, PopUpStrategy, SmsStrategy};
use crate::types::{SharedContent, SharedSink};
use std::sync::Arc;
use tracing::info;

/// A service with its observers wired according to a [`Config`].
pub struct Pipeline {
    pub service: Arc<NotificationService>,
    pub engine: Arc<NotificationEngine>,
    pub logger: Option<Arc<Logger>>,
    clock: Arc<dyn Clock>,
    decoration: DecorationConfig,
}

impl Pipeline {
    /// Builds content for `text`: signed first (if asked), then timestamped,
    /// so the timestamp renders ahead of the signature.
    pub fn compose(&self, text: &str, sign: bool, timestamp: bool) -> SharedContent {
        let mut content = SimpleNotification::new(text).into_shared();
        if sign {
            content = Arc::new(SignatureDecorator::new(
                content,
                self.decoration.signature.clone(),
            ));
        }
        if timestamp {
            content = Arc::new(TimeStampDecorator::with_format(
                content,
                self.clock.clone(),
                self.decoration.timestamp_format.clone(),
            ));
        }
        content
    }

    pub async fn send(&self, content: SharedContent) -> Result<NotifyReport, NotifierError> {
        self.service.send_notification(content).await
    }
}

/// Creates the service, subscribes the logger (if enabled) then the engine,
/// and registers the configured strategies: email, SMS, pop-up.
///
/// Every observer and strategy writes to `sink`.
pub fn build_pipeline(config: &Config, sink: SharedSink, clock: Arc<dyn Clock>) -> Result<Pipeline, NotifierError> {
    config.validate()?;

    let service = Arc::new(NotificationService::new(config.observers.failure_policy));

    let logger = if config.observers.logger {
        let logger = Arc::new(Logger::with_format(sink.clone(), config.observers.log_format));
        service.subscribe(logger.clone());
        Some(logger)
    } else {
        None
    };

    let engine = Arc::new(NotificationEngine::new(config.delivery.timeout()));
    if let Some(email) = &config.delivery.email {
        engine.add_notification_strategy(Arc::new(EmailStrategy::new(
            email.address.clone(),
            sink.clone(),
        )));
    }
    if let Some(sms) = &config.delivery.sms {
        engine.add_notification_strategy(Arc::new(SmsStrategy::new(sms.number.clone(), sink.clone())));
    }
    if config.delivery.popup {
        engine.add_notification_strategy(Arc::new(PopUpStrategy::new(sink)));
    }
    service.subscribe(engine.clone());

    info!(
        observers = service.observable().observer_count(),
        strategies = engine.strategy_count(),
        "Notification pipeline ready"
    );

    Ok(Pipeline {
        service,
        engine,
        logger,
        clock,
        decoration: config.decoration.clone(),
    })
}
