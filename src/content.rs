//! Notification content and the decorator chain that builds it.
//!
//! A chain is assembled bottom-up: a [`SimpleNotification`] at the leaf,
//! wrapped by any number of decorators. Rendering calls the innermost node
//! first and applies each transform on the way out, so the outermost
//! decorator's prefix appears first in the final text.

use crate::core::{Clock, NotificationContent};
use crate::types::SharedContent;
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write;
use std::sync::Arc;

/// The default layout used by [`TimeStampDecorator`].
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The default text prepended by [`SignatureDecorator`].
pub const DEFAULT_SIGNATURE: &str = "Sample signature";

impl<T: NotificationContent + ?Sized> NotificationContent for Arc<T> {
    fn content(&self) -> String {
        (**self).content()
    }
}

/// A fixed piece of text. Terminal node of every chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleNotification {
    text: String,
}

impl SimpleNotification {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl NotificationContent for SimpleNotification {
    fn content(&self) -> String {
        self.text.clone()
    }
}

type Transform = Box<dyn Fn(String) -> String + Send + Sync>;

/// Wraps an inner content with an arbitrary transform of its output.
pub struct Decorated {
    inner: SharedContent,
    transform: Transform,
}

impl Decorated {
    pub fn new<F>(inner: SharedContent, transform: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        Self {
            inner,
            transform: Box::new(transform),
        }
    }

    pub fn inner(&self) -> &SharedContent {
        &self.inner
    }
}

impl NotificationContent for Decorated {
    fn content(&self) -> String {
        (self.transform)(self.inner.content())
    }
}

/// Prepends the render-time instant, read from an injected [`Clock`].
pub struct TimeStampDecorator {
    inner: SharedContent,
    clock: Arc<dyn Clock>,
    format: String,
}

impl TimeStampDecorator {
    /// Creates a decorator using [`DEFAULT_TIMESTAMP_FORMAT`].
    pub fn new(inner: SharedContent, clock: Arc<dyn Clock>) -> Self {
        Self::with_format(inner, clock, DEFAULT_TIMESTAMP_FORMAT)
    }

    pub fn with_format(inner: SharedContent, clock: Arc<dyn Clock>, format: impl Into<String>) -> Self {
        Self {
            inner,
            clock,
            format: format.into(),
        }
    }

    pub fn inner(&self) -> &SharedContent {
        &self.inner
    }

    fn stamp(&self) -> String {
        let now = self.clock.now();
        let mut stamp = String::new();
        // chrono reports a bad layout as a fmt error rather than at parse time.
        if write!(stamp, "{}", now.format(&self.format)).is_err() {
            stamp = now.format(DEFAULT_TIMESTAMP_FORMAT).to_string();
        }
        stamp
    }
}

impl NotificationContent for TimeStampDecorator {
    fn content(&self) -> String {
        format!("{} {}", self.stamp(), self.inner.content())
    }
}

/// Prepends a fixed signature.
pub struct SignatureDecorator {
    inner: SharedContent,
    signature: String,
}

impl SignatureDecorator {
    pub fn new(inner: SharedContent, signature: impl Into<String>) -> Self {
        Self {
            inner,
            signature: signature.into(),
        }
    }

    pub fn inner(&self) -> &SharedContent {
        &self.inner
    }
}

impl NotificationContent for SignatureDecorator {
    fn content(&self) -> String {
        format!("{} {}", self.signature, self.inner.content())
    }
}

/// Returns `true` if `format` is a layout chrono can render.
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Fluent wrapping for any content value.
///
/// ```rust,ignore
/// let content = SimpleNotification::new("Notification ready")
///     .signed("Sample signature")
///     .timestamped(Arc::new(SystemClock));
/// ```
pub trait ContentExt: NotificationContent + Sized + 'static {
    fn into_shared(self) -> SharedContent {
        Arc::new(self)
    }

    fn signed(self, signature: impl Into<String>) -> SignatureDecorator {
        SignatureDecorator::new(self.into_shared(), signature)
    }

    fn timestamped(self, clock: Arc<dyn Clock>) -> TimeStampDecorator {
        TimeStampDecorator::new(self.into_shared(), clock)
    }

    fn timestamped_with(self, clock: Arc<dyn Clock>, format: impl Into<String>) -> TimeStampDecorator {
        TimeStampDecorator::with_format(self.into_shared(), clock, format)
    }

    fn decorate<F>(self, transform: F) -> Decorated
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        Decorated::new(self.into_shared(), transform)
    }
}

impl<T: NotificationContent + 'static> ContentExt for T {}
