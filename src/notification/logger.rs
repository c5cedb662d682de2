//! An observer that records every notification it sees.
//!
//! The record goes to a sink (plain text or one JSON object per line) and
//! is also emitted as a `tracing` event.

use crate::core::Observer;
use crate::observable::NotificationObservable;
use crate::types::SharedSink;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// The layout of each logged record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    #[default]
    PlainText,
    Json,
}

#[derive(Serialize)]
struct LogRecord<'a> {
    sequence: u64,
    content: &'a str,
}

pub struct Logger {
    sink: SharedSink,
    format: LogFormat,
    sequence: AtomicU64,
}

impl Logger {
    pub fn new(sink: SharedSink) -> Self {
        Self::with_format(sink, LogFormat::PlainText)
    }

    pub fn with_format(sink: SharedSink, format: LogFormat) -> Self {
        Self {
            sink,
            format,
            sequence: AtomicU64::new(0),
        }
    }

    /// Number of notifications logged so far.
    pub fn logged(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    fn render(&self, sequence: u64, content: &str) -> Result<String> {
        Ok(match self.format {
            LogFormat::PlainText => format!("New notification: {}", content),
            LogFormat::Json => serde_json::to_string(&LogRecord { sequence, content })?,
        })
    }
}

#[async_trait]
impl Observer for Logger {
    fn name(&self) -> &str {
        "logger"
    }

    async fn update(&self, source: &NotificationObservable) -> Result<()> {
        let content = source.require_content()?;
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        info!(sequence, content = %content, "Received notification");
        self.sink.write_line(&self.render(sequence, &content)?)
    }
}
