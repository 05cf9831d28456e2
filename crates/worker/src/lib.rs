//! Replays a fixture of platform notifications through the accrual pipeline.
//!
//! A fixture seeds the point setting, orders and opening balances, then lists
//! notifications in publication order. Every notification is wrapped in an
//! envelope and published on an in-memory bus drained by an `AccrualWorker`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use loyalty_core::MemberId;
use loyalty_events::{EventBus, EventEnvelope, InMemoryEventBus};
use loyalty_infra::{
    AccountSummary, AccrualWorker, InMemoryAccountLedger, InMemoryOrderDirectory,
    InMemorySettingStore, WorkerStats,
};
use loyalty_points::{DomainNotification, OrderSnapshot, PointAccrualService, SettingKey};

/// Environment variable naming the fixture when no argument is given.
pub const FIXTURE_ENV: &str = "LOYALTY_FIXTURE";

#[derive(Debug, Deserialize)]
pub struct Fixture {
    /// Stored `POINT_SETTING` value. Absent means unconfigured.
    #[serde(default)]
    pub point_setting: Option<serde_json::Value>,
    #[serde(default)]
    pub orders: Vec<OrderSnapshot>,
    #[serde(default)]
    pub accounts: Vec<OpeningBalance>,
    #[serde(default)]
    pub notifications: Vec<DomainNotification>,
}

#[derive(Debug, Deserialize)]
pub struct OpeningBalance {
    pub member_id: MemberId,
    pub opening_balance: i64,
}

#[derive(Debug)]
pub struct ReplayReport {
    pub stats: WorkerStats,
    pub accounts: Vec<AccountSummary>,
}

impl Fixture {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("malformed fixture")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        Self::from_json(&raw)
    }
}

/// Run every notification in `fixture` through a fresh pipeline.
pub fn replay(fixture: Fixture) -> anyhow::Result<ReplayReport> {
    let settings = Arc::new(InMemorySettingStore::new());
    if let Some(setting) = &fixture.point_setting {
        settings.put(SettingKey::PointSetting, setting.to_string())?;
    }

    let orders = Arc::new(InMemoryOrderDirectory::new());
    for order in fixture.orders {
        orders.upsert(order)?;
    }

    let ledger = Arc::new(InMemoryAccountLedger::new());
    for account in &fixture.accounts {
        ledger
            .open_account(account.member_id, account.opening_balance)
            .with_context(|| format!("opening account {}", account.member_id))?;
    }

    let service = Arc::new(PointAccrualService::new(settings, orders, ledger.clone()));

    let bus: InMemoryEventBus<EventEnvelope<DomainNotification>> = InMemoryEventBus::new();
    let worker = AccrualWorker::spawn("accrual-replay", &bus, service)
        .context("spawning accrual worker")?;

    let published = fixture.notifications.len();
    for notification in fixture.notifications {
        bus.publish(EventEnvelope::wrap(notification.topic(), notification))?;
    }
    drop(bus);
    tracing::debug!(published, "fixture published, waiting for worker to drain");

    let stats = worker.join();
    if stats.crashed {
        anyhow::bail!("accrual worker crashed before draining the fixture");
    }
    let mut accounts = ledger.summaries()?;
    accounts.sort_by_key(|a| a.member_id.to_string());

    Ok(ReplayReport { stats, accounts })
}
