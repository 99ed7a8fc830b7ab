//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the server process.
//!
//! ## Environment Variables
//!
//! ### `RUM_ADDR`
//!
//! Address the HTTP server binds to. Default: `0.0.0.0:9678`
//!
//! ### `RUM_STACK_SIZE`
//!
//! Sets the stack size for coroutines. Accepts values in:
//! - Decimal: `16384` (16 KB)
//! - Hexadecimal: `0x4000` (16 KB)
//!
//! Default: `0x4000` (16 KB). Every connection runs on its own coroutine, so
//! total stack memory is roughly stack size × open connections.
//!
//! ### `RUM_WORKERS`
//!
//! Number of `may` scheduler worker threads. Default: available parallelism.
//!
//! ## Usage
//!
//! ```rust
//! use rum::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! config.apply();
//! println!("Listening on {} with {} byte stacks", config.addr, config.stack_size);
//! ```
//!
//! ## Example Configuration
//!
//! ```bash
//! export RUM_STACK_SIZE=0x8000
//! export RUM_WORKERS=4
//! rum serve
//! ```

use std::env;
use std::thread;

pub const DEFAULT_ADDR: &str = "0.0.0.0:9678";
pub const DEFAULT_STACK_SIZE: usize = 0x4000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Listen address (default: `0.0.0.0:9678`)
    pub addr: String,
    /// Stack size for coroutines in bytes (default: 16 KB / 0x4000)
    pub stack_size: usize,
    /// Scheduler worker threads
    pub workers: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_owned(),
            stack_size: DEFAULT_STACK_SIZE,
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, usize::from)
}

/// Parse a size given in decimal or `0x`-prefixed hex.
fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`; unset or unparseable values fall back to defaults.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            addr: lookup("RUM_ADDR")
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(defaults.addr),
            stack_size: lookup("RUM_STACK_SIZE")
                .and_then(|v| parse_size(&v))
                .filter(|&s| s > 0)
                .unwrap_or(defaults.stack_size),
            workers: lookup("RUM_WORKERS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|&w| w > 0)
                .unwrap_or(defaults.workers),
        }
    }

    /// Apply stack size and worker count to the `may` runtime.
    ///
    /// Must run before the first coroutine is spawned to take full effect.
    pub fn apply(&self) {
        may::config()
            .set_stack_size(self.stack_size)
            .set_workers(self.workers);
    }
}
