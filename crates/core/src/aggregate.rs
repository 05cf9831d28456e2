//! Event-sourced aggregate traits.

/// Identity and version of an aggregate.
pub trait AggregateRoot {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Number of events applied so far. Zero means no history.
    fn version(&self) -> u64;
}

/// Command handling split into a pure decision and a state transition.
///
/// `handle` validates a command against current state and returns the events
/// it produces, or an error, without touching `self`. `apply` folds one event
/// into state and bumps `version()` by one. A point account rejects an
/// overdraft in `handle`, so a rejected debit leaves the balance as it was.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    fn apply(&mut self, event: &Self::Event);

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}
