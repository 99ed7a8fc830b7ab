//! # CLI Module
//!
//! Command-line interface for the `rum` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Serve the demo route table over HTTP:
//!
//! ```bash
//! rum serve --addr 127.0.0.1:9678
//! ```
//!
//! Runtime and logging settings come from the environment
//! (see [`crate::runtime_config`] and [`crate::logging`]).
//!
//! ### `routes`
//!
//! Print the demo route table:
//!
//! ```bash
//! rum routes
//! ```

mod commands;


pub use commands::{demo_engine, run_cli, Cli, Commands};
