//! Process-local bus that fans each envelope out to every subscription.
//!
//! Dropping the bus drops every sender, so a drained subscription reports
//! `Disconnected`. The accrual worker uses that as its end-of-input signal.

use std::sync::{Mutex, MutexGuard, mpsc};

use thiserror::Error;

use crate::bus::{EventBus, Subscription};

#[derive(Debug, Error)]
pub enum InMemoryBusError {
    #[error("event bus lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    senders: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live subscriptions as of the last publish. Dropped ones linger until then.
    pub fn subscriber_count(&self) -> usize {
        self.senders().map(|s| s.len()).unwrap_or(0)
    }

    fn senders(&self) -> Result<MutexGuard<'_, Vec<mpsc::Sender<M>>>, InMemoryBusError> {
        self.senders.lock().map_err(|_| InMemoryBusError::Poisoned)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    /// Never fails for lack of subscribers: with none attached the message is dropped.
    fn publish(&self, message: M) -> Result<(), Self::Error> {
        self.senders()?
            .retain(|sender| sender.send(message.clone()).is_ok());
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (sender, receiver) = mpsc::channel();
        // On a poisoned lock the subscription is returned detached and
        // reports `Disconnected` on first receive.
        if let Ok(mut senders) = self.senders() {
            senders.push(sender);
        }
        Subscription::new(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_receives_every_message() {
        let bus = InMemoryEventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(1u32).unwrap();
        bus.publish(2u32).unwrap();

        assert_eq!(a.try_recv().unwrap(), 1);
        assert_eq!(a.try_recv().unwrap(), 2);
        assert_eq!(b.try_recv().unwrap(), 1);
        assert_eq!(b.try_recv().unwrap(), 2);
    }

    #[test]
    fn dropped_subscribers_are_pruned_on_publish() {
        let bus = InMemoryEventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish("hello").unwrap();

        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.try_recv().unwrap(), "hello");
    }

    #[test]
    fn dropping_the_bus_disconnects_after_drain() {
        use std::sync::mpsc::TryRecvError;

        let bus = InMemoryEventBus::new();
        let sub = bus.subscribe();
        bus.publish(7u8).unwrap();
        drop(bus);

        assert_eq!(sub.try_recv().unwrap(), 7);
        assert_eq!(sub.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn publishing_without_subscribers_is_not_an_error() {
        let bus = InMemoryEventBus::<u8>::new();

        assert!(bus.publish(1).is_ok());
        assert_eq!(bus.subscriber_count(), 0);
    }
}
