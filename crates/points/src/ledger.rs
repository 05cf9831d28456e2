use std::sync::Arc;

use crate::error::LedgerError;
use crate::event::PointAdjustment;

/// Service of record for member point balances.
///
/// `apply` is the only mutation surface. Implementations must:
/// - apply each adjustment atomically per member (no lost updates),
/// - serialize concurrent adjustments to the same member,
/// - reject a debit that would drive the balance negative with
///   `LedgerError::InsufficientBalance`, leaving the balance untouched.
///
/// There is no idempotency key: applying the same adjustment twice changes the
/// balance twice. Callers de-duplicate upstream.
pub trait AccountLedger: Send + Sync {
    fn apply(&self, adjustment: &PointAdjustment) -> Result<(), LedgerError>;
}

impl<L> AccountLedger for Arc<L>
where
    L: AccountLedger + ?Sized,
{
    fn apply(&self, adjustment: &PointAdjustment) -> Result<(), LedgerError> {
        (**self).apply(adjustment)
    }
}
