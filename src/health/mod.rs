//! Health checks for the locally running application
//!
//! A weak "is the right thing running" signal: a GET on the root path plus
//! substring markers, and an optional quota-free Gemini reachability check.

mod checker;
mod monitor;

pub use checker::{HealthChecker, HealthReport, HealthStatus};
pub use monitor::Monitor;
