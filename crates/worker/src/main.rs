use std::path::PathBuf;

use anyhow::Context;

use loyalty_worker::{FIXTURE_ENV, Fixture, replay};

fn main() -> anyhow::Result<()> {
    loyalty_observability::init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(FIXTURE_ENV).ok())
        .map(PathBuf::from)
        .with_context(|| format!("usage: loyalty-worker <fixture.json> (or set {FIXTURE_ENV})"))?;

    let fixture = Fixture::load(&path)?;
    tracing::info!(fixture = %path.display(), "replaying notifications");

    let report = replay(fixture)?;
    tracing::info!(
        processed = report.stats.processed,
        duplicates = report.stats.duplicates,
        rejected = report.stats.rejected,
        failed = report.stats.failed,
        "replay finished"
    );
    for account in &report.accounts {
        tracing::info!(
            member_id = %account.member_id,
            balance = account.balance,
            total_earned = account.total_earned,
            "account balance"
        );
    }

    Ok(())
}
