use serde::{Deserialize, Serialize};

use loyalty_core::{MemberId, Money, OrderSn};

/// A domain occurrence that may change a member's point balance.
///
/// Constructed per occurrence, evaluated once, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccrualEvent {
    MemberRegistered {
        member_id: MemberId,
    },
    ReviewSubmitted {
        member_id: MemberId,
    },
    OrderCompleted {
        order_sn: OrderSn,
    },
    OrderCancelled {
        order_sn: OrderSn,
    },
    AfterSaleCompleted {
        member_id: MemberId,
        refund_amount: Money,
    },
    PointOrderCreated {
        member_id: MemberId,
        points_to_spend: i64,
        order_references: Vec<OrderSn>,
    },
}

impl AccrualEvent {
    /// Stable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AccrualEvent::MemberRegistered { .. } => "member_registered",
            AccrualEvent::ReviewSubmitted { .. } => "review_submitted",
            AccrualEvent::OrderCompleted { .. } => "order_completed",
            AccrualEvent::OrderCancelled { .. } => "order_cancelled",
            AccrualEvent::AfterSaleCompleted { .. } => "after_sale_completed",
            AccrualEvent::PointOrderCreated { .. } => "point_order_created",
        }
    }
}

/// Signed change to a member's balance, with the reason recorded in history.
///
/// `delta > 0` credits, `delta < 0` debits. The reason always names the
/// point amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointAdjustment {
    pub member_id: MemberId,
    pub delta: i64,
    pub reason: String,
}

impl PointAdjustment {
    pub fn is_credit(&self) -> bool {
        self.delta > 0
    }

    /// Magnitude of the change.
    pub fn points(&self) -> i64 {
        self.delta.saturating_abs()
    }
}
