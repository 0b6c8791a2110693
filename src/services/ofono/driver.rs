use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use super::{OfonoBus, OfonoError, OfonoManager, remote::RemoteBus};
use crate::{
    Result, TelephonyError,
    config::OfonoConfig,
    services::telephony::{DriverRegistry, TelephonyDriver},
};

/// Name the oFono driver registers under.
pub const DRIVER_NAME: &str = "ofono";

/// Telephony driver backed by the oFono daemon.
///
/// Probing connects to the bus and starts an [`OfonoManager`]; removing
/// drops the manager and with it every modem subscription.
pub struct OfonoDriver {
    config: OfonoConfig,
    bus: Option<Arc<dyn RemoteBus>>,
    manager: Mutex<Option<Arc<OfonoManager>>>,
}

impl OfonoDriver {
    /// Driver that connects according to `config` when probed.
    pub fn new(config: OfonoConfig) -> Self {
        Self {
            config,
            bus: None,
            manager: Mutex::new(None),
        }
    }

    /// Driver that uses an already established bus when probed.
    pub fn with_bus(bus: Arc<dyn RemoteBus>) -> Self {
        Self {
            config: OfonoConfig::default(),
            bus: Some(bus),
            manager: Mutex::new(None),
        }
    }

    /// The running manager, if the driver is probed.
    pub fn manager(&self) -> Option<Arc<OfonoManager>> {
        self.lock().clone()
    }

    async fn bus(&self) -> std::result::Result<Arc<dyn RemoteBus>, OfonoError> {
        if let Some(bus) = &self.bus {
            return Ok(Arc::clone(bus));
        }

        let bus: Arc<dyn RemoteBus> = Arc::new(OfonoBus::connect(&self.config).await?);
        Ok(bus)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<OfonoManager>>> {
        self.manager.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn failed(source: OfonoError) -> TelephonyError {
        TelephonyError::Driver {
            driver: DRIVER_NAME,
            source: Box::new(source),
        }
    }
}

#[async_trait]
impl TelephonyDriver for OfonoDriver {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    #[instrument(skip(self))]
    async fn probe(&self) -> Result<()> {
        if self.lock().is_some() {
            warn!("oFono driver probed twice");
            return Ok(());
        }

        let bus = self.bus().await.map_err(Self::failed)?;
        let manager = OfonoManager::create(bus).await.map_err(Self::failed)?;

        // A concurrent probe may have finished while this one was connecting.
        let discarded = {
            let mut slot = self.lock();
            if slot.is_some() {
                Some(manager)
            } else {
                *slot = Some(manager);
                None
            }
        };
        if discarded.is_some() {
            warn!("oFono driver probed concurrently, keeping the first manager");
            return Ok(());
        }

        info!("oFono driver started");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self) -> Result<()> {
        if self.lock().take().is_some() {
            info!("oFono driver stopped");
        }
        Ok(())
    }
}

impl std::fmt::Debug for OfonoDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfonoDriver")
            .field("config", &self.config)
            .field("manager", &self.manager())
            .finish()
    }
}

/// Register the oFono driver with `registry`.
///
/// Returns the registered driver so the host can reach its manager once
/// probed.
///
/// # Errors
/// Returns `DriverAlreadyRegistered` if an oFono driver is already present.
pub fn init(registry: &mut dyn DriverRegistry, config: OfonoConfig) -> Result<Arc<OfonoDriver>> {
    let driver = Arc::new(OfonoDriver::new(config));
    registry.register(driver.clone())?;
    Ok(driver)
}

/// Unregister the oFono driver from `registry`.
///
/// The driver is not removed; call [`TelephonyDriver::remove`] first if it
/// was probed.
///
/// # Errors
/// Returns `DriverNotRegistered` if no oFono driver is present.
pub fn exit(registry: &mut dyn DriverRegistry) -> Result<()> {
    registry.unregister(DRIVER_NAME).map(drop)
}
