//! Live mirror of the oFono telephony daemon.
//!
//! Keeps in-memory copies of the oFono manager, its modems and their network
//! registration in sync with the daemon over D-Bus, and hands typed change
//! notifications to a telephony host through an explicit driver interface.
//!
//! ```rust,no_run
//! use ofono_sync::{
//!     config::Config,
//!     services::{DriverTable, TelephonyDriver, ofono},
//! };
//!
//! # async fn run() -> ofono_sync::Result<()> {
//! let config = Config::load_default()?;
//! let mut drivers = DriverTable::new();
//! let driver = ofono::init(&mut drivers, config.ofono)?;
//! driver.probe().await?;
//!
//! if let Some(manager) = driver.manager() {
//!     manager.wait_active().await;
//!     for modem in manager.modems() {
//!         println!("{} powered={}", modem.path(), modem.powered());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Configuration schema and loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Telephony services.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{Result, TelephonyError};
