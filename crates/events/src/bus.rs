//! Publish/subscribe abstraction (mechanics only).
//!
//! Platform notifications (member registered, order status changed, ...) reach
//! the points handler through a bus. The contract is deliberately loose:
//!
//! - **Transport-agnostic**: in-memory channels here, a broker in production
//! - **At-least-once delivery**: the same envelope may arrive more than once
//! - **No ordering guarantees** across publishers
//!
//! Point adjustments are *not* idempotent, so consumers that mutate balances
//! must de-duplicate on `EventEnvelope::event_id` before acting.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// A subscription to a bus (broadcast semantics: every subscription receives
/// its own copy of each published message).
///
/// Subscriptions are meant for single-threaded consumption.
///
/// ```ignore
/// let subscription = bus.subscribe();
/// loop {
///     match subscription.recv_timeout(Duration::from_millis(250)) {
///         Ok(message) => process(message)?,
///         Err(RecvTimeoutError::Timeout) => continue,  // check for shutdown
///         Err(RecvTimeoutError::Disconnected) => break, // bus closed
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus.
///
/// `publish()` can fail (e.g. bus is full, transport error); the failure is
/// surfaced to the publisher. Implementations must be safe to share across
/// threads.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
