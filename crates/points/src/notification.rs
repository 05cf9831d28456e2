//! Platform notifications and their mapping to accrual events.
//!
//! The platform broadcasts broad signals (an order changed status, an
//! after-sale ticket moved). Only some of them concern points; `into_accrual`
//! picks those out.

use serde::{Deserialize, Serialize};

use loyalty_core::{MemberId, Money, OrderSn};

use crate::event::AccrualEvent;
use crate::order::OrderStatus;

/// After-sale (return/refund) ticket status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AfterSaleStatus {
    Apply,
    Pass,
    Refuse,
    BuyerReturn,
    SellerReDelivery,
    SellerConfirm,
    SellerTermination,
    BuyerCancel,
    WaitRefund,
    Complete,
}

/// Raw notification as received from the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainNotification {
    MemberRegistered {
        member_id: MemberId,
    },
    /// A goods review was completed.
    ReviewSubmitted {
        member_id: MemberId,
    },
    OrderStatusChanged {
        order_sn: OrderSn,
        new_status: OrderStatus,
    },
    AfterSaleStatusChanged {
        member_id: MemberId,
        #[serde(default)]
        service_status: Option<AfterSaleStatus>,
        actual_refund_price: Money,
    },
    /// A trade (one or more orders) was created at checkout.
    TradeCreated {
        member_id: MemberId,
        #[serde(default)]
        pay_point: Option<i64>,
        order_references: Vec<OrderSn>,
    },
}

impl DomainNotification {
    /// Bus topic the notification is published on.
    pub fn topic(&self) -> &'static str {
        match self {
            DomainNotification::MemberRegistered { .. } => "member",
            DomainNotification::ReviewSubmitted { .. } => "review",
            DomainNotification::OrderStatusChanged { .. } => "order",
            DomainNotification::AfterSaleStatusChanged { .. } => "after_sale",
            DomainNotification::TradeCreated { .. } => "trade",
        }
    }

    /// The accrual event this notification triggers, if any.
    pub fn into_accrual(self) -> Option<AccrualEvent> {
        match self {
            DomainNotification::MemberRegistered { member_id } => {
                Some(AccrualEvent::MemberRegistered { member_id })
            }
            DomainNotification::ReviewSubmitted { member_id } => {
                Some(AccrualEvent::ReviewSubmitted { member_id })
            }
            DomainNotification::OrderStatusChanged {
                order_sn,
                new_status,
            } => match new_status {
                OrderStatus::Completed => Some(AccrualEvent::OrderCompleted { order_sn }),
                OrderStatus::Cancelled => Some(AccrualEvent::OrderCancelled { order_sn }),
                _ => None,
            },
            DomainNotification::AfterSaleStatusChanged {
                member_id,
                service_status: Some(AfterSaleStatus::Complete),
                actual_refund_price,
            } => Some(AccrualEvent::AfterSaleCompleted {
                member_id,
                refund_amount: actual_refund_price,
            }),
            DomainNotification::AfterSaleStatusChanged { .. } => None,
            DomainNotification::TradeCreated {
                member_id,
                pay_point: Some(points),
                order_references,
            } if points > 0 => Some(AccrualEvent::PointOrderCreated {
                member_id,
                points_to_spend: points,
                order_references,
            }),
            DomainNotification::TradeCreated { .. } => None,
        }
    }
}
