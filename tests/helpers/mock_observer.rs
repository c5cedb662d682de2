#![allow(dead_code)]
use async_trait::async_trait;
use notifier::core::Observer;
use notifier::observable::NotificationObservable;
use std::sync::{Arc, Mutex};

/// An observer that appends `"<name>:<content>"` to a shared journal and
/// optionally fails afterwards.
#[derive(Clone, Debug)]
pub struct RecordingObserver {
    pub name: String,
    pub journal: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

impl RecordingObserver {
    pub fn new(name: &str, journal: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            journal,
            fail: false,
        }
    }

    pub fn failing(name: &str, journal: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            fail: true,
            ..Self::new(name, journal)
        }
    }
}

#[async_trait]
impl Observer for RecordingObserver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn update(&self, source: &NotificationObservable) -> anyhow::Result<()> {
        let content = source.require_content()?;
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, content));
        if self.fail {
            anyhow::bail!("{} failed on purpose", self.name);
        }
        Ok(())
    }
}
