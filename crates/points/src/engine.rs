//! Point accrual rules.
//!
//! One rule per `AccrualEvent` variant, evaluated by a single `match`. Each
//! event yields at most one adjustment. The engine holds no state and performs
//! no IO of its own; the rate store and the order lookup are passed in.

use loyalty_core::{MemberId, OrderSn};

use crate::config::ConfigurationStore;
use crate::error::{OrderLookupError, PolicyError};
use crate::event::{AccrualEvent, PointAdjustment};
use crate::order::OrderSnapshot;

/// Stateless decision logic: event → optional signed adjustment.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointPolicyEngine;

impl PointPolicyEngine {
    /// Evaluate one event.
    ///
    /// `rates` is read at most once, and only by rules that depend on it, so a
    /// missing setting does not block cancellations or point-order debits.
    /// `order_lookup` is called at most once. A computed delta of zero yields
    /// `None`.
    pub fn evaluate<R, F>(
        event: &AccrualEvent,
        rates: &R,
        order_lookup: F,
    ) -> Result<Option<PointAdjustment>, PolicyError>
    where
        R: ConfigurationStore + ?Sized,
        F: Fn(&OrderSn) -> Result<OrderSnapshot, OrderLookupError>,
    {
        match event {
            AccrualEvent::MemberRegistered { member_id } => {
                let bonus = rates.point_rates()?.registration_bonus();
                Ok(adjustment(
                    *member_id,
                    bonus,
                    format!("member registration bonus: {bonus} points"),
                ))
            }
            AccrualEvent::ReviewSubmitted { member_id } => {
                let bonus = rates.point_rates()?.review_bonus();
                Ok(adjustment(
                    *member_id,
                    bonus,
                    format!("review submission bonus: {bonus} points"),
                ))
            }
            AccrualEvent::OrderCompleted { order_sn } => {
                let order = order_lookup(order_sn)?;
                // Points orders never earn additional points.
                if order.promotion_type.is_points_redemption() {
                    return Ok(None);
                }
                let rate = rates.point_rates()?.earn_rate_per_currency_unit();
                let points = rate.points_for(order.final_price)?;
                Ok(adjustment(
                    order.member_id,
                    points,
                    format!("order placement bonus: {points} points"),
                ))
            }
            AccrualEvent::OrderCancelled { order_sn } => {
                let order = order_lookup(order_sn)?;
                match (order.promotion_type.is_points_redemption(), order.pay_point) {
                    (true, Some(spent)) if spent > 0 => Ok(adjustment(
                        order.member_id,
                        spent,
                        format!("order cancellation, points restored: {spent} points"),
                    )),
                    _ => Ok(None),
                }
            }
            AccrualEvent::AfterSaleCompleted {
                member_id,
                refund_amount,
            } => {
                let rate = rates.point_rates()?.earn_rate_per_currency_unit();
                let points = rate.points_for(*refund_amount)?;
                Ok(adjustment(
                    *member_id,
                    -points,
                    format!("refund processed, points deducted: {points} points"),
                ))
            }
            AccrualEvent::PointOrderCreated {
                member_id,
                points_to_spend,
                order_references,
            } => {
                if *points_to_spend <= 0 {
                    return Ok(None);
                }
                let refs = order_references
                    .iter()
                    .map(OrderSn::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                Ok(adjustment(
                    *member_id,
                    -*points_to_spend,
                    format!(
                        "order(s) [{refs}] created, points deducted: {points_to_spend} points"
                    ),
                ))
            }
        }
    }
}

fn adjustment(member_id: MemberId, delta: i64, reason: String) -> Option<PointAdjustment> {
    if delta == 0 {
        return None;
    }
    Some(PointAdjustment {
        member_id,
        delta,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PointRateConfig;
    use crate::error::ConfigError;
    use crate::order::OrderPromotionType;
    use loyalty_core::{DomainError, Money, PointRate};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn rates(register: i64, comment: i64, money: Decimal) -> PointRateConfig {
        PointRateConfig::new(register, comment, PointRate::new(money).unwrap()).unwrap()
    }

    fn sn(s: &str) -> OrderSn {
        OrderSn::new(s).unwrap()
    }

    fn order(
        member_id: MemberId,
        promotion_type: OrderPromotionType,
        final_price: Decimal,
        pay_point: Option<i64>,
    ) -> OrderSnapshot {
        OrderSnapshot {
            sn: sn("O100"),
            member_id,
            promotion_type,
            final_price: Money::new(final_price).unwrap(),
            pay_point,
        }
    }

    fn no_orders(sn: &OrderSn) -> Result<OrderSnapshot, OrderLookupError> {
        Err(OrderLookupError::NotFound(sn.clone()))
    }

    struct MissingRates;

    impl ConfigurationStore for MissingRates {
        fn point_rates(&self) -> Result<PointRateConfig, ConfigError> {
            Err(ConfigError::ConfigurationMissing)
        }
    }

    #[test]
    fn registration_credits_configured_bonus() {
        let member_id = MemberId::new();
        let event = AccrualEvent::MemberRegistered { member_id };

        let adj = PointPolicyEngine::evaluate(&event, &rates(100, 10, dec!(1)), no_orders)
            .unwrap()
            .unwrap();

        assert_eq!(adj.member_id, member_id);
        assert_eq!(adj.delta, 100);
        assert_eq!(adj.reason, "member registration bonus: 100 points");
    }

    #[test]
    fn review_credits_configured_bonus() {
        let member_id = MemberId::new();
        let event = AccrualEvent::ReviewSubmitted { member_id };

        let adj = PointPolicyEngine::evaluate(&event, &rates(100, 10, dec!(1)), no_orders)
            .unwrap()
            .unwrap();

        assert_eq!(adj.delta, 10);
        assert_eq!(adj.reason, "review submission bonus: 10 points");
    }

    #[test]
    fn order_completion_truncates_points() {
        let member_id = MemberId::new();
        let event = AccrualEvent::OrderCompleted { order_sn: sn("O100") };

        let adj = PointPolicyEngine::evaluate(&event, &rates(0, 0, dec!(1)), |_| {
            Ok(order(member_id, OrderPromotionType::Normal, dec!(99.9), None))
        })
        .unwrap()
        .unwrap();

        assert_eq!(adj.member_id, member_id);
        assert_eq!(adj.delta, 99);
        assert_eq!(adj.reason, "order placement bonus: 99 points");
    }

    #[test]
    fn points_order_completion_earns_nothing_and_skips_rates() {
        let event = AccrualEvent::OrderCompleted { order_sn: sn("O100") };

        let result = PointPolicyEngine::evaluate(&event, &MissingRates, |_| {
            Ok(order(MemberId::new(), OrderPromotionType::Points, dec!(500), Some(300)))
        })
        .unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn unknown_order_is_reported() {
        let event = AccrualEvent::OrderCompleted { order_sn: sn("O404") };

        let err = PointPolicyEngine::evaluate(&event, &rates(0, 0, dec!(1)), no_orders).unwrap_err();

        assert_eq!(err, PolicyError::OrderNotFound(sn("O404")));
    }

    #[test]
    fn unavailable_directory_is_passed_through() {
        let event = AccrualEvent::OrderCancelled { order_sn: sn("O1") };

        let err = PointPolicyEngine::evaluate(&event, &rates(0, 0, dec!(1)), |_| {
            Err(OrderLookupError::Unavailable("connection reset".to_string()))
        })
        .unwrap_err();

        match err {
            PolicyError::Collaborator(msg) if msg.contains("connection reset") => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn cancelling_points_order_restores_spent_points() {
        let member_id = MemberId::new();
        let event = AccrualEvent::OrderCancelled { order_sn: sn("O100") };

        let adj = PointPolicyEngine::evaluate(&event, &MissingRates, |_| {
            Ok(order(member_id, OrderPromotionType::Points, dec!(0), Some(300)))
        })
        .unwrap()
        .unwrap();

        assert_eq!(adj.delta, 300);
        assert_eq!(adj.reason, "order cancellation, points restored: 300 points");
    }

    #[test]
    fn cancelling_other_orders_changes_nothing() {
        let event = AccrualEvent::OrderCancelled { order_sn: sn("O100") };
        let config = rates(0, 0, dec!(1));

        let normal = PointPolicyEngine::evaluate(&event, &config, |_| {
            Ok(order(MemberId::new(), OrderPromotionType::Normal, dec!(80), Some(300)))
        })
        .unwrap();
        let points_without_spend = PointPolicyEngine::evaluate(&event, &config, |_| {
            Ok(order(MemberId::new(), OrderPromotionType::Points, dec!(80), None))
        })
        .unwrap();

        assert_eq!(normal, None);
        assert_eq!(points_without_spend, None);
    }

    #[test]
    fn completed_refund_debits_truncated_points() {
        let member_id = MemberId::new();
        let event = AccrualEvent::AfterSaleCompleted {
            member_id,
            refund_amount: Money::new(dec!(45.75)).unwrap(),
        };

        let adj = PointPolicyEngine::evaluate(&event, &rates(0, 0, dec!(2)), no_orders)
            .unwrap()
            .unwrap();

        assert_eq!(adj.delta, -91);
        assert_eq!(adj.reason, "refund processed, points deducted: 91 points");
    }

    #[test]
    fn point_order_creation_debits_spent_points() {
        let member_id = MemberId::new();
        let event = AccrualEvent::PointOrderCreated {
            member_id,
            points_to_spend: 250,
            order_references: vec![sn("O1"), sn("O2")],
        };

        let adj = PointPolicyEngine::evaluate(&event, &MissingRates, no_orders)
            .unwrap()
            .unwrap();

        assert_eq!(adj.delta, -250);
        assert_eq!(adj.reason, "order(s) [O1,O2] created, points deducted: 250 points");
    }

    #[test]
    fn point_order_without_spend_is_ignored() {
        for points_to_spend in [0, -5] {
            let event = AccrualEvent::PointOrderCreated {
                member_id: MemberId::new(),
                points_to_spend,
                order_references: vec![sn("O1")],
            };
            let result = PointPolicyEngine::evaluate(&event, &MissingRates, no_orders).unwrap();
            assert_eq!(result, None);
        }
    }

    #[test]
    fn rate_dependent_rules_fail_without_configuration() {
        let event = AccrualEvent::MemberRegistered { member_id: MemberId::new() };

        let err = PointPolicyEngine::evaluate(&event, &MissingRates, no_orders).unwrap_err();

        assert_eq!(err, PolicyError::ConfigurationMissing);
    }

    /// Store holding a raw setting value, parsed on every read.
    struct StoredSetting(&'static str);

    impl ConfigurationStore for StoredSetting {
        fn point_rates(&self) -> Result<PointRateConfig, ConfigError> {
            PointRateConfig::from_setting_json(self.0)
        }
    }

    #[test]
    fn malformed_setting_is_invalid_configuration() {
        let event = AccrualEvent::ReviewSubmitted { member_id: MemberId::new() };

        for raw in [
            r#"{"register":-5,"comment":1,"money":1}"#,
            r#"{"register":5,"comment":1,"money":-1}"#,
            r#"{"register":5}"#,
            "not json",
        ] {
            let err = PointPolicyEngine::evaluate(&event, &StoredSetting(raw), no_orders)
                .unwrap_err();
            assert!(
                matches!(err, PolicyError::InvalidConfiguration(_)),
                "{raw}: {err:?}"
            );
        }
    }

    #[test]
    fn refund_beyond_point_range_is_an_overflow() {
        let event = AccrualEvent::AfterSaleCompleted {
            member_id: MemberId::new(),
            refund_amount: Money::new(Decimal::MAX).unwrap(),
        };

        let err = PointPolicyEngine::evaluate(&event, &rates(0, 0, dec!(1)), no_orders).unwrap_err();

        assert!(matches!(err, PolicyError::Domain(DomainError::Overflow(_))));
    }

    #[test]
    fn zero_bonus_yields_no_adjustment() {
        let event = AccrualEvent::ReviewSubmitted { member_id: MemberId::new() };

        let result = PointPolicyEngine::evaluate(&event, &rates(10, 0, dec!(1)), no_orders).unwrap();

        assert_eq!(result, None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: registration credits exactly the configured bonus.
        #[test]
        fn registration_delta_is_configured_bonus(bonus in 1i64..1_000_000i64) {
            let event = AccrualEvent::MemberRegistered { member_id: MemberId::new() };

            let adj = PointPolicyEngine::evaluate(&event, &rates(bonus, 0, dec!(1)), no_orders)
                .unwrap()
                .unwrap();

            prop_assert_eq!(adj.delta, bonus);
            prop_assert!(adj.delta > 0);
            prop_assert!(adj.reason.contains(&bonus.to_string()));
        }

        /// Property: order completion earns floor(rate × price), never more.
        #[test]
        fn order_completion_never_rounds_up(
            rate_cents in 1i64..1_000i64,
            price_cents in 0i64..10_000_000i64,
        ) {
            let rate = Decimal::new(rate_cents, 2);
            let price = Decimal::new(price_cents, 2);
            let member_id = MemberId::new();
            let event = AccrualEvent::OrderCompleted { order_sn: sn("O100") };

            let result = PointPolicyEngine::evaluate(&event, &rates(0, 0, rate), |_| {
                Ok(order(member_id, OrderPromotionType::Normal, price, None))
            })
            .unwrap();

            let delta = result.map(|a| a.delta).unwrap_or(0);
            let exact = rate * price;
            prop_assert!(Decimal::from(delta) <= exact);
            prop_assert!(exact - Decimal::from(delta) < Decimal::ONE);
        }

        /// Property: points-redemption orders never earn on completion.
        #[test]
        fn points_orders_never_earn(price_cents in 0i64..10_000_000i64, spent in 0i64..100_000i64) {
            let event = AccrualEvent::OrderCompleted { order_sn: sn("O100") };

            let result = PointPolicyEngine::evaluate(&event, &rates(0, 0, dec!(1)), |_| {
                Ok(order(
                    MemberId::new(),
                    OrderPromotionType::Points,
                    Decimal::new(price_cents, 2),
                    Some(spent),
                ))
            })
            .unwrap();

            prop_assert_eq!(result, None);
        }

        /// Property: cancelling a points order restores exactly what was spent.
        #[test]
        fn cancellation_restores_exact_spend(spent in 1i64..10_000_000i64) {
            let event = AccrualEvent::OrderCancelled { order_sn: sn("O100") };

            let adj = PointPolicyEngine::evaluate(&event, &rates(0, 0, dec!(1)), |_| {
                Ok(order(MemberId::new(), OrderPromotionType::Points, dec!(0), Some(spent)))
            })
            .unwrap()
            .unwrap();

            prop_assert_eq!(adj.delta, spent);
            prop_assert!(adj.reason.contains(&spent.to_string()));
        }
    }
}
