#![allow(dead_code)]
use async_trait::async_trait;
use notifier::core::DeliveryStrategy;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

/// A strategy that appends `"<name>:<content>"` to a journal shared with
/// other mocks, so tests can assert cross-component ordering.
#[derive(Clone, Debug)]
pub struct RecordingStrategy {
    pub name: String,
    pub journal: Arc<Mutex<Vec<String>>>,
}

impl RecordingStrategy {
    pub fn new(name: &str, journal: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            journal,
        }
    }
}

#[async_trait]
impl DeliveryStrategy for RecordingStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_notification(&self, content: &str) -> anyhow::Result<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, content));
        Ok(())
    }
}

/// A strategy whose failure can be toggled at runtime.
#[derive(Clone, Debug)]
pub struct FailableStrategy {
    pub name: String,
    pub delivered: Arc<Mutex<Vec<String>>>,
    fail_on_send: Arc<AtomicBool>,
}

impl FailableStrategy {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            delivered: Arc::new(Mutex::new(Vec::new())),
            fail_on_send: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_fail_on_send(&self, fail: bool) {
        self.fail_on_send.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DeliveryStrategy for FailableStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_notification(&self, content: &str) -> anyhow::Result<()> {
        if self.fail_on_send.load(Ordering::SeqCst) {
            anyhow::bail!("{} channel unreachable", self.name);
        }
        self.delivered.lock().unwrap().push(content.to_string());
        Ok(())
    }
}
