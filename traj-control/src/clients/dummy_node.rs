use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::{Duration, SystemTime},
};

use crate::{
    clients::DummyActionClient,
    error::Result,
    telemetry::{telemetry_channel, TelemetryPublisher, TelemetrySubscription},
    traits::{Clock, Liveness, Node, TelemetrySource},
};

/// Dummy Node for Debug or Tests
///
/// Scripted telemetry is queued as soon as a topic is subscribed.
#[derive(Debug, Clone)]
pub struct DummyNode {
    client: DummyActionClient,
    clock_valid: bool,
    ok_count: Option<usize>,
    liveness_checks: Arc<AtomicUsize>,
    scripts: HashMap<String, Vec<Vec<f64>>>,
    publishers: Arc<Mutex<HashMap<String, TelemetryPublisher>>>,
}

impl Default for DummyNode {
    fn default() -> Self {
        Self::new(DummyActionClient::new(""))
    }
}

impl DummyNode {
    pub fn new(client: DummyActionClient) -> Self {
        Self {
            client,
            clock_valid: true,
            ok_count: None,
            liveness_checks: Arc::new(AtomicUsize::new(0)),
            scripts: HashMap::new(),
            publishers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_clock_valid(mut self, clock_valid: bool) -> Self {
        self.clock_valid = clock_valid;
        self
    }

    /// `is_ok` returns `true` only for its first `count` calls.
    pub fn with_ok_count(mut self, count: usize) -> Self {
        self.ok_count = Some(count);
        self
    }

    /// Messages delivered on `topic` right after it is subscribed.
    pub fn with_telemetry(mut self, topic: &str, messages: Vec<Vec<f64>>) -> Self {
        self.scripts.insert(topic.to_owned(), messages);
        self
    }

    pub fn client(&self) -> &DummyActionClient {
        &self.client
    }

    /// Publishes `values` on `topic` if someone subscribed to it.
    pub fn publish(&self, topic: &str, values: Vec<f64>) -> bool {
        match self.publishers.lock().unwrap().get(topic) {
            Some(publisher) => {
                publisher.push(values);
                true
            }
            None => false,
        }
    }

    pub fn subscribed_topics(&self) -> Vec<String> {
        let mut topics: Vec<_> = self.publishers.lock().unwrap().keys().cloned().collect();
        topics.sort();
        topics
    }
}

impl Clock for DummyNode {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn wait_for_valid(&self, _timeout: Duration) -> bool {
        self.clock_valid
    }
}

impl Liveness for DummyNode {
    fn is_ok(&self) -> bool {
        let checks = self.liveness_checks.fetch_add(1, Ordering::SeqCst);
        self.ok_count.map_or(true, |count| checks < count)
    }
}

impl TelemetrySource for DummyNode {
    fn subscribe(&self, topic: &str, queue_size: usize) -> Result<TelemetrySubscription> {
        let (publisher, subscription) = telemetry_channel(topic, queue_size);
        for message in self.scripts.get(topic).into_iter().flatten() {
            publisher.push(message.clone());
        }
        self.publishers
            .lock()
            .unwrap()
            .insert(topic.to_owned(), publisher);
        Ok(subscription)
    }
}

impl Node for DummyNode {
    type Client = DummyActionClient;

    fn action_client(&self, server_name: &str) -> Result<Self::Client> {
        Ok(self.client.clone().with_server_name(server_name))
    }
}
