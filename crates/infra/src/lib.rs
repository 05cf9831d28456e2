//! Infrastructure layer: in-memory collaborators and the accrual worker.
//!
//! Production deployments swap these adapters for database/broker-backed
//! ones; the traits they implement live in `loyalty-points`.

pub mod config;
pub mod ledger;
pub mod orders;
pub mod workers;


pub use config::InMemorySettingStore;
pub use ledger::{AccountSummary, InMemoryAccountLedger};
pub use orders::InMemoryOrderDirectory;
pub use workers::{AccrualWorker, WorkerHandle, WorkerStats};
