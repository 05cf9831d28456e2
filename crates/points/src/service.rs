//! Accrual orchestration: engine decision → ledger mutation.

use tracing::{debug, info, warn};

use crate::config::ConfigurationStore;
use crate::engine::PointPolicyEngine;
use crate::error::PolicyError;
use crate::event::{AccrualEvent, PointAdjustment};
use crate::ledger::AccountLedger;
use crate::notification::DomainNotification;
use crate::order::OrderDirectory;

/// Wires the policy engine to its collaborators.
///
/// Every call is a single synchronous pass: read rates (when the rule needs
/// them), resolve the order (when the rule needs it), decide, apply at most one
/// ledger mutation. Nothing is retried.
#[derive(Debug, Clone)]
pub struct PointAccrualService<C, O, L> {
    config: C,
    orders: O,
    ledger: L,
}

impl<C, O, L> PointAccrualService<C, O, L>
where
    C: ConfigurationStore,
    O: OrderDirectory,
    L: AccountLedger,
{
    pub fn new(config: C, orders: O, ledger: L) -> Self {
        Self {
            config,
            orders,
            ledger,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Evaluate `event` and apply the resulting adjustment, if any.
    ///
    /// Returns the adjustment that was applied. An insufficient balance is
    /// reported as `PolicyError::InsufficientPoints` and leaves the balance
    /// unchanged.
    pub fn accrue(&self, event: &AccrualEvent) -> Result<Option<PointAdjustment>, PolicyError> {
        let decision =
            PointPolicyEngine::evaluate(event, &self.config, |sn| self.orders.find_by_sn(sn))?;

        let Some(adjustment) = decision else {
            debug!(event = event.kind(), "no point adjustment for event");
            return Ok(None);
        };

        if let Err(err) = self.ledger.apply(&adjustment) {
            let err = PolicyError::from(err);
            warn!(
                event = event.kind(),
                member_id = %adjustment.member_id,
                delta = adjustment.delta,
                error = %err,
                "point adjustment rejected"
            );
            return Err(err);
        }

        info!(
            event = event.kind(),
            member_id = %adjustment.member_id,
            delta = adjustment.delta,
            reason = %adjustment.reason,
            "points adjusted"
        );
        Ok(Some(adjustment))
    }

    /// Map a raw platform notification and accrue it.
    pub fn handle_notification(
        &self,
        notification: DomainNotification,
    ) -> Result<Option<PointAdjustment>, PolicyError> {
        match notification.into_accrual() {
            Some(event) => self.accrue(&event),
            None => Ok(None),
        }
    }
}
