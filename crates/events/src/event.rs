use chrono::{DateTime, Utc};

/// A fact recorded in an aggregate's history.
///
/// `event_type` is the stable name persisted alongside the payload
/// (e.g. "points.account.adjusted"); `version` is bumped whenever the payload
/// shape changes so stored history can be upcast.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn event_type(&self) -> &'static str;

    fn version(&self) -> u32;

    /// Business time of the fact, not the time it was stored.
    fn occurred_at(&self) -> DateTime<Utc>;
}
