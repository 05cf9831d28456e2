//! Member loyalty points (policy engine + point accounts).
//!
//! Converts platform notifications into signed point adjustments and applies
//! them through an `AccountLedger`. Decision logic is pure and deterministic;
//! configuration, order lookup and balance storage are collaborators passed in
//! from the outside.

pub mod account;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod notification;
pub mod order;
pub mod service;

pub use account::{
    AccountOpened, AdjustPoints, MemberPointAccount, OpenAccount, PointAccountCommand,
    PointAccountEvent, PointsAdjusted,
};
pub use config::{ConfigurationStore, PointRateConfig, SettingKey};
pub use engine::PointPolicyEngine;
pub use error::{ConfigError, LedgerError, OrderLookupError, PolicyError};
pub use event::{AccrualEvent, PointAdjustment};
pub use ledger::AccountLedger;
pub use notification::{AfterSaleStatus, DomainNotification};
pub use order::{OrderDirectory, OrderPromotionType, OrderSnapshot, OrderStatus};
pub use service::PointAccrualService;
