//! Core application primitives (poll loop, retry, run state, liveness)

pub mod http;
pub mod monitor;
pub mod retry;
pub mod state;
pub mod supervisor;

pub use monitor::{Collaborators, CycleReport, Monitor, MonitorError, MonitorPhase};
pub use retry::{RetryClassify, RetryExecutor, RetryPolicy};
pub use state::RunState;
pub use supervisor::{supervise, ShutdownError};
