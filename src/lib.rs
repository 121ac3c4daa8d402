//! explored - remembers the tracks you have already listened to.
//!
//! A small daemon that follows an MPRIS media player, reconstructs how long
//! each track has actually been listened to from coarse polling samples, and
//! once a track has been heard for long enough marks it as explored. Explored
//! tracks are skipped automatically the next time they come up.
//!
//! - Progress accrual and discovery state machine ([`tracker`])
//! - MPRIS host adapter over D-Bus ([`services::mpris`])
//! - JSON state file with change watching ([`store`])
//! - TOML configuration ([`config`]) and a small CLI ([`cli`])
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use explored::config::Config;
//!
//! let config = Config::default();
//! println!("Threshold: {} ms", config.tracker.threshold_ms);
//! ```

/// Configuration schema definitions and validation.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface for the registry, tracking flag and config.
pub mod cli;

/// Reactive services for system integration.
pub mod services;

/// File-backed persistence for the explored registry and flags.
pub mod store;

/// Listening progress accrual, discovery and auto-skip.
pub mod tracker;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use self::core::{ExploredError, Result};
