//! Delivery strategies: one per channel.
//!
//! Each strategy renders a channel-specific message around the final
//! notification text and hands it to its sink. None of them share state.

use crate::core::DeliveryStrategy;
use crate::types::SharedSink;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Delivers to an email address.
pub struct EmailStrategy {
    address: String,
    sink: SharedSink,
}

impl EmailStrategy {
    pub fn new(address: impl Into<String>, sink: SharedSink) -> Self {
        Self {
            address: address.into(),
            sink,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl DeliveryStrategy for EmailStrategy {
    fn name(&self) -> &str {
        "email"
    }

    #[instrument(skip(self, content), fields(address = %self.address))]
    async fn send_notification(&self, content: &str) -> Result<()> {
        debug!("Delivering email notification");
        self.sink.write_line(&format!(
            "Sending Email notification on {}\n{}",
            self.address, content
        ))
    }
}

/// Delivers to a mobile number.
pub struct SmsStrategy {
    number: String,
    sink: SharedSink,
}

impl SmsStrategy {
    pub fn new(number: impl Into<String>, sink: SharedSink) -> Self {
        Self {
            number: number.into(),
            sink,
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

#[async_trait]
impl DeliveryStrategy for SmsStrategy {
    fn name(&self) -> &str {
        "sms"
    }

    #[instrument(skip(self, content), fields(number = %self.number))]
    async fn send_notification(&self, content: &str) -> Result<()> {
        debug!("Delivering SMS notification");
        self.sink.write_line(&format!(
            "Sending SMS notification on {}\n{}",
            self.number, content
        ))
    }
}

/// Shows a pop-up. Has no destination.
pub struct PopUpStrategy {
    sink: SharedSink,
}

impl PopUpStrategy {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl DeliveryStrategy for PopUpStrategy {
    fn name(&self) -> &str {
        "popup"
    }

    async fn send_notification(&self, content: &str) -> Result<()> {
        debug!("Delivering pop-up notification");
        self.sink
            .write_line(&format!("Sending pop up notification \n{}", content))
    }
}
