//! Dispatch unit binding one handler to one bounded queue and one worker thread
//!
//! Lifecycle: `Idle` (created) → `Running` (after [`LogBucket::start`]) →
//! `Completed` (after [`LogBucket::close`], terminal). Logging call sites push into
//! the queue and poke the worker through a capacity-1 wake-up channel; they never
//! wait for the handler. The worker waits on the close signal, the wake-up channel
//! and an idle timeout, so it neither spins nor misses a close.

use super::error::{LoggerError, Result};
use super::failure_policy::{FailureCallback, FailurePolicy, HandlerFailure};
use super::formatter::LogFormat;
use super::handler::{LogHandler, Payload};
use super::log_queue::LogQueue;
use super::metrics::LoggerMetrics;
use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::Mutex;
use serde::Serialize;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Settings shared by every bucket of one manager
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub(crate) idle_poll: Duration,
    pub(crate) failure_policy: FailurePolicy,
    pub(crate) on_failure: Option<FailureCallback>,
    pub(crate) metrics: Arc<LoggerMetrics>,
}

/// Point-in-time view of one registered handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerStats {
    pub name: String,
    pub format: LogFormat,
    pub enabled: bool,
    pub completed: bool,
    pub capacity: usize,
    pub pending: usize,
    pub delivered: u64,
    pub failures: u64,
    pub evicted: u64,
}

/// State shared between the bucket owner and its worker thread
struct BucketShared {
    name: String,
    handler: Arc<dyn LogHandler>,
    queue: LogQueue<Payload>,
    completed: AtomicBool,
    delivered: AtomicU64,
    failures: AtomicU64,
    consecutive_failures: AtomicU32,
    context: WorkerContext,
}

pub struct LogBucket {
    shared: Arc<BucketShared>,
    in_process: AtomicBool,
    wake_tx: Sender<()>,
    done_tx: Mutex<Option<Sender<()>>>,
    receivers: Mutex<Option<(Receiver<()>, Receiver<()>)>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl LogBucket {
    pub(crate) fn new(
        name: impl Into<String>,
        handler: Arc<dyn LogHandler>,
        context: WorkerContext,
    ) -> Self {
        let (done_tx, done_rx) = bounded(0);
        let (wake_tx, wake_rx) = bounded(1);
        let queue = LogQueue::new(handler.queue_len());

        Self {
            shared: Arc::new(BucketShared {
                name: name.into(),
                handler,
                queue,
                completed: AtomicBool::new(false),
                delivered: AtomicU64::new(0),
                failures: AtomicU64::new(0),
                consecutive_failures: AtomicU32::new(0),
                context,
            }),
            in_process: AtomicBool::new(false),
            wake_tx,
            done_tx: Mutex::new(Some(done_tx)),
            receivers: Mutex::new(Some((done_rx, wake_rx))),
            worker: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn handler(&self) -> &Arc<dyn LogHandler> {
        &self.shared.handler
    }

    /// Format family the handler currently asks for
    pub fn format(&self) -> LogFormat {
        self.shared.handler.format()
    }

    /// Not closed and the handler is switched on
    pub fn enabled(&self) -> bool {
        !self.is_completed() && self.shared.handler.enabled()
    }

    pub fn is_completed(&self) -> bool {
        self.shared.completed.load(Ordering::Acquire)
    }

    /// Whether a worker thread has been started for this bucket
    pub fn is_running(&self) -> bool {
        self.in_process.load(Ordering::Acquire) && !self.is_completed()
    }

    /// Spawn the worker thread; only the first call does anything
    ///
    /// Returns `Ok(true)` if this call started the worker.
    pub fn start(&self) -> Result<bool> {
        if self
            .in_process
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(false);
        }

        let Some((done_rx, wake_rx)) = self.receivers.lock().take() else {
            return Ok(false);
        };

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name(format!("log-bucket-{}", self.shared.name))
            .spawn(move || shared.run(done_rx, wake_rx));

        match spawned {
            Ok(handle) => {
                *self.worker.lock() = Some(handle);
                Ok(true)
            }
            Err(e) => {
                self.shared.completed.store(true, Ordering::Release);
                Err(LoggerError::io_operation(
                    "spawning bucket worker",
                    format!("handler '{}' will not receive entries", self.shared.name),
                    e,
                ))
            }
        }
    }

    /// Queue a payload for the worker; never blocks on the handler
    ///
    /// Returns the number of older payloads evicted to make room.
    pub fn push(&self, payload: Payload) -> usize {
        if payload.is_empty() {
            return 0;
        }

        let metrics = &self.shared.context.metrics;
        let evicted = self.shared.queue.push(payload);
        metrics.record_queued();
        for _ in 0..evicted {
            metrics.record_evicted();
        }

        // A pending wake-up already covers this payload.
        let _ = self.wake_tx.try_send(());
        evicted
    }

    /// Signal the worker to stop and discard pending payloads
    ///
    /// Returns false if the bucket was already completed.
    pub fn close(&self) -> bool {
        let first = !self.shared.completed.swap(true, Ordering::AcqRel);
        drop(self.done_tx.lock().take());
        drop(self.receivers.lock().take());
        self.shared.queue.clear();
        first
    }

    /// Wait for the worker thread to exit, giving up after `timeout`
    ///
    /// Returns true if no worker is left running. Joining from the worker's own
    /// thread (a handler unregistering itself) returns immediately.
    pub fn join(&self, timeout: Duration) -> bool {
        let Some(handle) = self.worker.lock().take() else {
            return true;
        };

        if handle.thread().id() == thread::current().id() {
            return true;
        }

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!(
                        "[LOGGER ERROR] Worker for handler '{}' panicked: {:?}",
                        self.shared.name, e
                    );
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Worker for handler '{}' did not finish within {:?}. \
                     Its handler is still inside process().",
                    self.shared.name, timeout
                );
                return false;
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(1));
        }
    }

    pub fn pending(&self) -> usize {
        self.shared.queue.count()
    }

    pub fn stats(&self) -> HandlerStats {
        let shared = &self.shared;
        HandlerStats {
            name: shared.name.clone(),
            format: shared.handler.format(),
            enabled: shared.handler.enabled(),
            completed: self.is_completed(),
            capacity: shared.queue.capacity(),
            pending: shared.queue.count(),
            delivered: shared.delivered.load(Ordering::Relaxed),
            failures: shared.failures.load(Ordering::Relaxed),
            evicted: shared.queue.evicted_count(),
        }
    }
}

impl Drop for LogBucket {
    fn drop(&mut self) {
        // The registry closes buckets before dropping them; this only matters for
        // buckets that never made it into a registry.
        if !self.is_completed() {
            self.close();
        }
    }
}

impl BucketShared {
    fn run(&self, done: Receiver<()>, wake: Receiver<()>) {
        let idle = self.context.idle_poll;

        loop {
            if self.completed.load(Ordering::Acquire) {
                break;
            }

            if !self.handler.enabled() {
                // Disabled handlers keep their queue; just wait for close or re-enable.
                let closed = select! {
                    recv(done) -> _ => true,
                    default(idle) => false,
                };
                if closed {
                    break;
                }
                continue;
            }

            match self.queue.pop() {
                Some(payload) => self.deliver(&payload),
                None => {
                    // A dropped wake-up sender means the bucket itself is gone.
                    let closed = select! {
                        recv(done) -> _ => true,
                        recv(wake) -> msg => msg.is_err(),
                        default(idle) => false,
                    };
                    if closed {
                        break;
                    }
                }
            }
        }

        self.completed.store(true, Ordering::Release);
    }

    fn deliver(&self, payload: &Payload) {
        // The handler may have switched format after this payload was rendered.
        if payload.format() != self.handler.format() {
            return;
        }

        let result = catch_unwind(AssertUnwindSafe(|| self.handler.process(payload)));
        let error = match result {
            Ok(Ok(())) => {
                self.consecutive_failures.store(0, Ordering::Relaxed);
                self.delivered.fetch_add(1, Ordering::Relaxed);
                self.context.metrics.record_delivered();
                return;
            }
            Ok(Err(e)) => LoggerError::handler_failed(&self.name, e.to_string()),
            Err(panic) => LoggerError::handler_panicked(&self.name, panic_message(&*panic)),
        };

        self.record_failure(error);
    }

    fn record_failure(&self, error: LoggerError) {
        let consecutive = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        let total = self.failures.fetch_add(1, Ordering::Relaxed) + 1;
        self.context.metrics.record_handler_failure();

        let disabled = self.context.failure_policy.should_disable(consecutive)
            && self.handler.enabled();
        if disabled {
            self.handler.disable();
            self.consecutive_failures.store(0, Ordering::Relaxed);
            self.context.metrics.record_handler_disabled();
        }

        if disabled {
            eprintln!(
                "[LOGGER CRITICAL] Handler '{}' disabled after {} consecutive failures: {}. \
                 Other handlers continue to function.",
                self.name, consecutive, error
            );
        } else if error.is_panic() || consecutive == 1 || total % 1000 == 0 {
            eprintln!(
                "[LOGGER ERROR] Handler '{}' failed ({} failures so far): {}",
                self.name, total, error
            );
        }

        if let Some(ref callback) = self.context.on_failure {
            let failure = HandlerFailure {
                handler: self.name.clone(),
                error,
                consecutive_failures: consecutive,
                disabled,
            };
            if catch_unwind(AssertUnwindSafe(|| callback(&failure))).is_err() {
                eprintln!(
                    "[LOGGER ERROR] Failure callback panicked while reporting handler '{}'",
                    self.name
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
