mod properties;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use futures::Stream;
use tracing::{error, instrument};

use super::{
    NetworkStatus, NetworkTechnology, OfonoError, RegistrationMode,
    remote::{Interface, PropertyValue, RemoteBus, RemoteObject},
    sync::{PropertySynchronizer, SyncState},
};
use crate::services::common::{CallbackSlot, Property, types::ObjectPath};

/// Network registration state of one modem (`org.ofono.NetworkRegistration`).
///
/// Every field starts at its sentinel (`Unknown`, `0` or empty) and follows
/// the remote object once the initial fetch completes. Share it by cloning
/// the `Arc`; the subscription ends when the last clone drops.
#[derive(Debug)]
pub struct NetworkRegistration {
    path: ObjectPath,
    mode: Property<RegistrationMode>,
    status: Property<NetworkStatus>,
    location_area_code: Property<u16>,
    cell_id: Property<u32>,
    mcc: Property<String>,
    mnc: Property<String>,
    technology: Property<NetworkTechnology>,
    operator_name: Property<String>,
    strength: Property<u8>,
    base_station: Property<String>,
    status_changed: CallbackSlot<NetworkStatus>,
    strength_changed: CallbackSlot<u8>,
    sync: PropertySynchronizer,
}

impl NetworkRegistration {
    /// Bind the network registration interface at `path` and start syncing.
    ///
    /// Returns once the remote handle exists; the initial property fetch is
    /// still in flight at that point.
    ///
    /// # Errors
    /// Returns `OfonoError::ProxyCreationFailed` or a bus error if the remote
    /// object cannot be bound.
    #[instrument(skip(bus))]
    pub async fn create(bus: &dyn RemoteBus, path: &str) -> Result<Arc<Self>, OfonoError> {
        let remote = bus
            .object(path, Interface::NetworkRegistration)
            .await
            .inspect_err(|err| error!("Unable to bind network registration at {path}: {err}"))?;

        Ok(Self::from_remote(remote))
    }

    pub(crate) fn from_remote(remote: Arc<dyn RemoteObject>) -> Arc<Self> {
        let netreg = Arc::new(Self {
            path: remote.path().to_string(),
            mode: Property::new(RegistrationMode::default()),
            status: Property::new(NetworkStatus::default()),
            location_area_code: Property::new(0),
            cell_id: Property::new(0),
            mcc: Property::new(String::new()),
            mnc: Property::new(String::new()),
            technology: Property::new(NetworkTechnology::default()),
            operator_name: Property::new(String::new()),
            strength: Property::new(0),
            base_station: Property::new(String::new()),
            status_changed: CallbackSlot::new(),
            strength_changed: CallbackSlot::new(),
            sync: PropertySynchronizer::new(remote),
        });

        netreg
            .sync
            .start(&properties::PROPERTIES, Arc::downgrade(&netreg));

        netreg
    }

    /// Object path of the remote object.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Network selection mode.
    pub fn mode(&self) -> RegistrationMode {
        self.mode.get()
    }

    /// Registration status.
    pub fn status(&self) -> NetworkStatus {
        self.status.get()
    }

    /// Location area code, `0` until known.
    pub fn location_area_code(&self) -> u16 {
        self.location_area_code.get()
    }

    /// Cell id, `0` until known.
    pub fn cell_id(&self) -> u32 {
        self.cell_id.get()
    }

    /// Mobile country code, empty until known.
    pub fn mcc(&self) -> String {
        self.mcc.get()
    }

    /// Mobile network code, empty until known.
    pub fn mnc(&self) -> String {
        self.mnc.get()
    }

    /// Radio access technology.
    pub fn technology(&self) -> NetworkTechnology {
        self.technology.get()
    }

    /// Operator name, empty until known.
    pub fn operator_name(&self) -> String {
        self.operator_name.get()
    }

    /// Signal strength in percent, `0` until known.
    pub fn strength(&self) -> u8 {
        self.strength.get()
    }

    /// Base station name, empty until known.
    pub fn base_station(&self) -> String {
        self.base_station.get()
    }

    /// Call `handler` with the new status on every `Status` update.
    ///
    /// Replaces any previously registered status handler. The handler runs
    /// after the cached value has been updated, also for repeated values.
    pub fn register_status_changed_handler<F>(&self, handler: F)
    where
        F: Fn(NetworkStatus) + Send + Sync + 'static,
    {
        self.status_changed.set(handler);
    }

    /// Call `handler` with the new strength on every `Strength` update.
    ///
    /// Replaces any previously registered strength handler.
    pub fn register_strength_changed_handler<F>(&self, handler: F)
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        self.strength_changed.set(handler);
    }

    /// Stream of distinct status values, starting with the current one.
    pub fn watch_status(&self) -> impl Stream<Item = NetworkStatus> + Send + use<> {
        self.status.watch()
    }

    /// Stream of distinct strength values, starting with the current one.
    pub fn watch_strength(&self) -> impl Stream<Item = u8> + Send + use<> {
        self.strength.watch()
    }

    /// Progress of the initial property fetch.
    pub fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    /// Wait until the initial property fetch has completed or failed.
    pub async fn wait_synced(&self) -> SyncState {
        self.sync.wait_synced().await
    }

    /// Ask oFono to change a network registration property.
    ///
    /// # Errors
    /// Returns the error reported by oFono; the cache is left untouched.
    pub async fn set_property(&self, name: &str, value: PropertyValue) -> Result<(), OfonoError> {
        self.sync.set_property(name, value).await
    }
}
