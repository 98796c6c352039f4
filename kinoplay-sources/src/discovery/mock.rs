//! Scripted discovery client for testing.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kinoplay_core::CatalogId;
use url::Url;

use super::{DiscoveredSource, DiscoveryClient};
use crate::errors::SourceError;

/// What one discovery call does.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Sources(Vec<DiscoveredSource>),
    Fail(SourceError),
    Panic,
}

/// One scripted call: wait `delay`, then produce `outcome`.
#[derive(Debug, Clone)]
pub(crate) struct Step {
    pub delay: Duration,
    pub outcome: Outcome,
}

impl Step {
    pub fn sources(sources: Vec<DiscoveredSource>) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Outcome::Sources(sources),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Discovery double that replays steps in order and then repeats the last one.
#[derive(Debug)]
pub(crate) struct ScriptedDiscovery {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Step>,
    calls: AtomicUsize,
}

impl ScriptedDiscovery {
    pub fn new(steps: Vec<Step>) -> Self {
        let last = steps
            .last()
            .cloned()
            .unwrap_or_else(|| Step::sources(Vec::new()));
        Self {
            steps: Mutex::new(steps.into()),
            last: Mutex::new(last),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn returning(sources: Vec<DiscoveredSource>) -> Self {
        Self::new(vec![Step::sources(sources)])
    }

    pub fn failing(error: SourceError) -> Self {
        Self::new(vec![Step {
            delay: Duration::ZERO,
            outcome: Outcome::Fail(error),
        }])
    }

    pub fn panicking() -> Self {
        Self::new(vec![Step {
            delay: Duration::ZERO,
            outcome: Outcome::Panic,
        }])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscoveryClient for ScriptedDiscovery {
    async fn discover(&self, _catalog_id: CatalogId) -> Result<Vec<DiscoveredSource>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let step = {
            let mut steps = self.steps.lock().unwrap();
            match steps.pop_front() {
                Some(step) => step,
                None => self.last.lock().unwrap().clone(),
            }
        };

        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }

        match step.outcome {
            Outcome::Sources(sources) => Ok(sources),
            Outcome::Fail(error) => Err(error),
            Outcome::Panic => panic!("scripted discovery panic"),
        }
    }
}

/// Builds a discovered source record.
pub(crate) fn discovered(name: &str, url: &str) -> DiscoveredSource {
    DiscoveredSource {
        name: name.to_string(),
        url: Url::parse(url).unwrap(),
        quality: None,
    }
}
