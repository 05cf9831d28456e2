use std::collections::{HashSet, VecDeque};
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use loyalty_core::EventId;
use loyalty_events::{EventBus, EventEnvelope, Subscription};
use loyalty_points::{
    AccountLedger, ConfigurationStore, DomainNotification, OrderDirectory, PointAccrualService,
};

/// How many recent event ids a worker remembers for de-duplication.
pub const DEFAULT_DEDUP_WINDOW: usize = 10_000;

/// Counters reported when a worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Notifications handled (whether or not they changed a balance).
    pub processed: u64,
    /// Redeliveries skipped because their event id was already seen.
    pub duplicates: u64,
    /// Business rejections (insufficient points).
    pub rejected: u64,
    /// Any other failure.
    pub failed: u64,
    /// The worker thread panicked; the counters above are lost.
    pub crashed: bool,
}

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<WorkerStats>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(self) -> WorkerStats {
        let _ = self.shutdown.send(());
        self.join()
    }

    /// Wait for the worker to drain its subscription and stop on its own
    /// (happens once every publisher of the bus is dropped).
    ///
    /// A panicked worker has no stats to report; the panic is logged and
    /// `WorkerStats::crashed` is set.
    pub fn join(mut self) -> WorkerStats {
        let Some(handle) = self.join.take() else {
            return WorkerStats::default();
        };
        let name = handle.thread().name().unwrap_or("accrual-worker").to_string();
        match handle.join() {
            Ok(stats) => stats,
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(worker = %name, panic = %message, "accrual worker panicked");
                WorkerStats {
                    crashed: true,
                    ..WorkerStats::default()
                }
            }
        }
    }
}

/// Remembers the last `capacity` event ids.
#[derive(Debug)]
struct SeenEvents {
    capacity: usize,
    order: VecDeque<EventId>,
    ids: HashSet<EventId>,
}

impl SeenEvents {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            ids: HashSet::new(),
        }
    }

    /// Returns `false` when `id` was already seen.
    fn insert(&mut self, id: EventId) -> bool {
        if !self.ids.insert(id) {
            return false;
        }
        self.order.push_back(id);
        if self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.ids.remove(&evicted);
            }
        }
        true
    }
}

/// Feeds bus notifications into a `PointAccrualService`.
///
/// The bus delivers at least once and point adjustments are not idempotent,
/// so the worker skips any envelope whose event id it has already handled
/// (within the de-duplication window). An id is remembered whatever the
/// outcome of handling it; failures are logged and never retried.
#[derive(Debug)]
pub struct AccrualWorker;

impl AccrualWorker {
    pub fn spawn<B, C, O, L>(
        name: &'static str,
        bus: &B,
        service: Arc<PointAccrualService<C, O, L>>,
    ) -> io::Result<WorkerHandle>
    where
        B: EventBus<EventEnvelope<DomainNotification>>,
        C: ConfigurationStore + 'static,
        O: OrderDirectory + 'static,
        L: AccountLedger + 'static,
    {
        Self::spawn_with_window(name, bus, service, DEFAULT_DEDUP_WINDOW)
    }

    pub fn spawn_with_window<B, C, O, L>(
        name: &'static str,
        bus: &B,
        service: Arc<PointAccrualService<C, O, L>>,
        dedup_window: usize,
    ) -> io::Result<WorkerHandle>
    where
        B: EventBus<EventEnvelope<DomainNotification>>,
        C: ConfigurationStore + 'static,
        O: OrderDirectory + 'static,
        L: AccountLedger + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let sub = bus.subscribe();

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, sub, shutdown_rx, dedup_window, &service))?;

        Ok(WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        })
    }
}

fn worker_loop<C, O, L>(
    name: &'static str,
    sub: Subscription<EventEnvelope<DomainNotification>>,
    shutdown_rx: mpsc::Receiver<()>,
    dedup_window: usize,
    service: &PointAccrualService<C, O, L>,
) -> WorkerStats
where
    C: ConfigurationStore,
    O: OrderDirectory,
    L: AccountLedger,
{
    let tick = Duration::from_millis(250);
    let mut seen = SeenEvents::new(dedup_window);
    let mut stats = WorkerStats::default();

    loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(envelope) => {
                let event_id = envelope.event_id();
                if !seen.insert(event_id) {
                    debug!(worker = name, %event_id, "duplicate delivery skipped");
                    stats.duplicates += 1;
                    continue;
                }

                stats.processed += 1;
                if let Err(err) = service.handle_notification(envelope.into_payload()) {
                    if err.is_business_rejection() {
                        stats.rejected += 1;
                    } else {
                        stats.failed += 1;
                    }
                    warn!(worker = name, %event_id, error = %err, "accrual worker handler failed");
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    stats
}
