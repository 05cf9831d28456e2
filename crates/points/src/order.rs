use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use loyalty_core::{DomainError, MemberId, Money, OrderSn};

use crate::error::OrderLookupError;

/// How an order was priced.
///
/// Wire names are the platform's upper-case enum names. An unknown name is a
/// parse error, never silently treated as "not a points order".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderPromotionType {
    Normal,
    Gift,
    Pintuan,
    Kanjia,
    /// Paid wholly or partly with points (points-redemption order).
    Points,
}

impl OrderPromotionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPromotionType::Normal => "NORMAL",
            OrderPromotionType::Gift => "GIFT",
            OrderPromotionType::Pintuan => "PINTUAN",
            OrderPromotionType::Kanjia => "KANJIA",
            OrderPromotionType::Points => "POINTS",
        }
    }

    pub fn is_points_redemption(&self) -> bool {
        matches!(self, OrderPromotionType::Points)
    }
}

impl FromStr for OrderPromotionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL" => Ok(OrderPromotionType::Normal),
            "GIFT" => Ok(OrderPromotionType::Gift),
            "PINTUAN" => Ok(OrderPromotionType::Pintuan),
            "KANJIA" => Ok(OrderPromotionType::Kanjia),
            "POINTS" => Ok(OrderPromotionType::Points),
            other => Err(DomainError::validation(format!(
                "unknown order promotion type: {other}"
            ))),
        }
    }
}

/// Order lifecycle status as broadcast by the order module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Unpaid,
    Paid,
    Undelivered,
    Delivered,
    Completed,
    Take,
    StayPickedUp,
    Cancelled,
}

/// The parts of an order the points rules read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub sn: OrderSn,
    pub member_id: MemberId,
    pub promotion_type: OrderPromotionType,
    /// Amount actually paid (after discounts).
    pub final_price: Money,
    /// Points spent when the order was created, if any.
    #[serde(default)]
    pub pay_point: Option<i64>,
}

/// Resolves orders by serial number.
pub trait OrderDirectory: Send + Sync {
    fn find_by_sn(&self, sn: &OrderSn) -> Result<OrderSnapshot, OrderLookupError>;
}

impl<D> OrderDirectory for Arc<D>
where
    D: OrderDirectory + ?Sized,
{
    fn find_by_sn(&self, sn: &OrderSn) -> Result<OrderSnapshot, OrderLookupError> {
        (**self).find_by_sn(sn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_type_parses_platform_names() {
        assert_eq!(
            "POINTS".parse::<OrderPromotionType>().unwrap(),
            OrderPromotionType::Points
        );
        assert_eq!(
            "NORMAL".parse::<OrderPromotionType>().unwrap(),
            OrderPromotionType::Normal
        );
    }

    #[test]
    fn unknown_promotion_type_is_an_error() {
        let err = "point".parse::<OrderPromotionType>().unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("point") => {}
            other => panic!("unexpected error: {other:?}"),
        }

        let json = r#"{"sn":"O1","member_id":"0190a1b2-0000-7000-8000-000000000001",
            "promotion_type":"SECKILL","final_price":"10"}"#;
        assert!(serde_json::from_str::<OrderSnapshot>(json).is_err());
    }

    #[test]
    fn as_str_matches_wire_name() {
        for t in [
            OrderPromotionType::Normal,
            OrderPromotionType::Gift,
            OrderPromotionType::Pintuan,
            OrderPromotionType::Kanjia,
            OrderPromotionType::Points,
        ] {
            let wire = serde_json::to_string(&t).unwrap();
            assert_eq!(wire, format!("\"{}\"", t.as_str()));
            assert_eq!(t.as_str().parse::<OrderPromotionType>().unwrap(), t);
        }
    }

    #[test]
    fn order_status_uses_screaming_snake_case() {
        let s: OrderStatus = serde_json::from_str("\"STAY_PICKED_UP\"").unwrap();
        assert_eq!(s, OrderStatus::StayPickedUp);
    }
}
