//! Background workers.

pub mod accrual_worker;

pub use accrual_worker::{AccrualWorker, WorkerHandle, WorkerStats};
