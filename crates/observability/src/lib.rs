//! Process-wide logging setup shared by the loyalty binaries.

pub mod logging;

pub use logging::LogFormat;

/// Initialize logging from the environment (`RUST_LOG`, `LOYALTY_LOG_FORMAT`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    logging::init(LogFormat::from_env(), "info");
}
