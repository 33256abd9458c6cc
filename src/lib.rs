// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod assist;
pub mod config;
pub mod generator;
pub mod history;
pub mod question;
pub mod quiz;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod util;

/// Event-loop tick interval shared by the binary and the headless tests.
pub const TICK_RATE_MS: u64 = 250;
