use std::{
    any::Any,
    fmt::{self, Write as _},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use flume::{Receiver, Sender, TrySendError};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Creates the two ends of a bounded telemetry queue for `topic`.
///
/// When `queue_size` messages are pending, pushing a new one evicts the oldest.
pub fn telemetry_channel(
    topic: &str,
    queue_size: usize,
) -> (TelemetryPublisher, TelemetrySubscription) {
    let (sender, receiver) = flume::bounded(queue_size.max(1));
    let dropped = Arc::new(AtomicUsize::new(0));
    let publisher = TelemetryPublisher {
        sender,
        evict: receiver.clone(),
        dropped: dropped.clone(),
    };
    let subscription = TelemetrySubscription {
        topic: topic.to_owned(),
        receiver,
        dropped,
        _guard: None,
    };
    (publisher, subscription)
}

/// Producer side of a telemetry queue, handed to the transport callback.
#[derive(Clone)]
pub struct TelemetryPublisher {
    sender: Sender<Vec<f64>>,
    evict: Receiver<Vec<f64>>,
    dropped: Arc<AtomicUsize>,
}

impl TelemetryPublisher {
    /// Queues `values`, never blocking the caller.
    ///
    /// A full queue is retried once before the oldest message is evicted.
    /// If the consumer drains the queue between the retry and the eviction,
    /// one message is still dropped.
    pub fn push(&self, values: Vec<f64>) {
        let mut values = match self.sender.try_send(values) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => return,
            Err(TrySendError::Full(v)) => v,
        };
        loop {
            match self.sender.try_send(values) {
                Ok(()) => return,
                Err(TrySendError::Full(v)) => {
                    values = v;
                    if self.evict.try_recv().is_ok() {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

impl fmt::Debug for TelemetryPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryPublisher")
            .field("pending", &self.sender.len())
            .field("dropped", &self.dropped.load(Ordering::Relaxed))
            .finish()
    }
}

/// Consumer side of a telemetry queue.
pub struct TelemetrySubscription {
    topic: String,
    receiver: Receiver<Vec<f64>>,
    dropped: Arc<AtomicUsize>,
    // keeps the transport subscription alive
    _guard: Option<Box<dyn Any>>,
}

impl TelemetrySubscription {
    /// Ties the lifetime of a backend handle to this subscription.
    pub fn with_guard(mut self, guard: impl Any) -> Self {
        self._guard = Some(Box::new(guard));
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Number of messages evicted because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Takes every message pending right now without blocking.
    pub fn try_iter(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        self.receiver.try_iter()
    }
}

impl fmt::Debug for TelemetrySubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetrySubscription")
            .field("topic", &self.topic)
            .field("pending", &self.receiver.len())
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// Append-only text log with one line per message: `<index> <v0> <v1> ...`.
#[derive(Debug)]
pub struct TelemetryLog<W: Write = BufWriter<fs_err::File>> {
    path: PathBuf,
    count: usize,
    sink: W,
}

impl TelemetryLog {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let file = fs_err::File::create(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Opened telemetry log {path:?}");
        Ok(Self::from_writer(path, BufWriter::new(file)))
    }
}

impl<W: Write> TelemetryLog<W> {
    pub fn from_writer(path: impl Into<PathBuf>, sink: W) -> Self {
        Self {
            path: path.into(),
            count: 0,
            sink,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn append(&mut self, values: &[f64]) -> Result<()> {
        self.count += 1;
        let line = format_line(self.count, values);
        self.sink
            .write_all(line.as_bytes())
            .map_err(|source| self.io_error(source))
    }

    /// Flushes and releases the sink.
    pub fn close(mut self) -> Result<W> {
        self.sink.flush().map_err(|source| self.io_error(source))?;
        debug!("Closed {:?} after {} lines", self.path, self.count);
        Ok(self.sink)
    }

    fn io_error(&self, source: io::Error) -> Error {
        Error::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn format_line(index: usize, values: &[f64]) -> String {
    let mut line = index.to_string();
    for value in values {
        // Debug keeps the fractional part, e.g. `0.0` instead of `0`.
        let _ = write!(line, " {value:?}");
    }
    line.push('\n');
    line
}

/// A subscription paired with the log its messages are written to.
#[derive(Debug)]
pub struct TelemetryStream<W: Write = BufWriter<fs_err::File>> {
    subscription: TelemetrySubscription,
    log: TelemetryLog<W>,
}

impl<W: Write> TelemetryStream<W> {
    pub fn new(subscription: TelemetrySubscription, log: TelemetryLog<W>) -> Self {
        Self { subscription, log }
    }

    /// Writes every pending message to the log. Returns how many were written.
    pub fn drain(&mut self) -> Result<usize> {
        let mut written = 0;
        for values in self.subscription.try_iter() {
            self.log.append(&values)?;
            written += 1;
        }
        Ok(written)
    }

    pub fn count(&self) -> usize {
        self.log.count()
    }

    pub fn dropped(&self) -> usize {
        self.subscription.dropped()
    }

    /// Unsubscribes and closes the log.
    pub fn close(self) -> Result<W> {
        let dropped = self.subscription.dropped();
        if dropped > 0 {
            warn!(
                "{} messages on {} were dropped because the queue was full",
                dropped,
                self.subscription.topic()
            );
        }
        drop(self.subscription);
        self.log.close()
    }
}
