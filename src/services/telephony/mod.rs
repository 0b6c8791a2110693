//! Capability interface between the telephony host and its backend drivers.
//!
//! The host owns a [`DriverRegistry`]; drivers are handed to it explicitly
//! instead of registering themselves in process-wide state.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::{error, info};

use crate::{Result, TelephonyError};

/// A telephony backend the host can start and stop.
#[async_trait]
pub trait TelephonyDriver: Send + Sync {
    /// Unique, stable driver name.
    fn name(&self) -> &'static str;

    /// Bring the driver up.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached.
    async fn probe(&self) -> Result<()>;

    /// Tear the driver down and release everything it holds.
    ///
    /// # Errors
    /// Returns an error if the backend refuses to shut down cleanly.
    async fn remove(&self) -> Result<()>;
}

/// Registry of drivers owned by the host.
pub trait DriverRegistry {
    /// Add `driver`.
    ///
    /// # Errors
    /// Returns `DriverAlreadyRegistered` if a driver with the same name exists.
    fn register(&mut self, driver: Arc<dyn TelephonyDriver>) -> Result<()>;

    /// Remove the driver called `name` and hand it back.
    ///
    /// # Errors
    /// Returns `DriverNotRegistered` if no such driver exists.
    fn unregister(&mut self, name: &str) -> Result<Arc<dyn TelephonyDriver>>;
}

/// In-memory [`DriverRegistry`], in registration order.
#[derive(Default)]
pub struct DriverTable {
    drivers: IndexMap<&'static str, Arc<dyn TelephonyDriver>>,
}

impl DriverTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The driver called `name`, if registered.
    pub fn get(&self, name: &str) -> Option<Arc<dyn TelephonyDriver>> {
        self.drivers.get(name).cloned()
    }

    /// Names of every registered driver.
    pub fn names(&self) -> Vec<&'static str> {
        self.drivers.keys().copied().collect()
    }

    /// Number of registered drivers.
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Whether no driver is registered.
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Probe every driver in registration order.
    ///
    /// # Errors
    /// Returns the first failure; later drivers are not probed.
    pub async fn probe_all(&self) -> Result<()> {
        for (name, driver) in &self.drivers {
            driver
                .probe()
                .await
                .inspect_err(|err| error!("Driver {name} failed to probe: {err}"))?;
            info!("Driver {name} probed");
        }
        Ok(())
    }

    /// Remove every driver in reverse registration order.
    ///
    /// Failures are logged and do not stop the remaining drivers.
    pub async fn remove_all(&self) {
        for (name, driver) in self.drivers.iter().rev() {
            if let Err(err) = driver.remove().await {
                error!("Driver {name} failed to shut down: {err}");
            }
        }
    }
}

impl DriverRegistry for DriverTable {
    fn register(&mut self, driver: Arc<dyn TelephonyDriver>) -> Result<()> {
        let name = driver.name();
        if self.drivers.contains_key(name) {
            return Err(TelephonyError::DriverAlreadyRegistered(name.to_string()));
        }

        self.drivers.insert(name, driver);
        info!("Registered telephony driver {name}");
        Ok(())
    }

    fn unregister(&mut self, name: &str) -> Result<Arc<dyn TelephonyDriver>> {
        let driver = self
            .drivers
            .shift_remove(name)
            .ok_or_else(|| TelephonyError::DriverNotRegistered(name.to_string()))?;

        info!("Unregistered telephony driver {name}");
        Ok(driver)
    }
}

impl std::fmt::Debug for DriverTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverTable")
            .field("drivers", &self.names())
            .finish()
    }
}
