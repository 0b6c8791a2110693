mod properties;

use std::{fmt, sync::Arc};

use futures::Stream;
use tracing::{debug, error, instrument, warn};

use super::{
    NetworkRegistration, OfonoError,
    remote::{Interface, PropertyMap, PropertyValue, RemoteBus, RemoteObject},
    sync::{PropertySynchronizer, SyncState},
};
use crate::services::common::{Property, types::ObjectPath};

/// One modem known to oFono (`org.ofono.Modem`).
///
/// Owns the subsystem objects bound on the same object path. A subsystem is
/// attached while `Interfaces` lists it and detached when it leaves the
/// list, so each appearance starts from a fresh property fetch. Entries are
/// shared through `Arc`; a holder may keep one alive after the manager has
/// dropped it from its collection.
pub struct Modem {
    path: ObjectPath,
    powered: Property<bool>,
    online: Property<bool>,
    lockdown: Property<bool>,
    emergency: Property<bool>,
    name: Property<String>,
    manufacturer: Property<String>,
    model: Property<String>,
    revision: Property<String>,
    serial: Property<String>,
    modem_type: Property<String>,
    interfaces: Property<Vec<String>>,
    features: Property<Vec<String>>,
    network_registration: Property<Option<Arc<NetworkRegistration>>>,
    network_registration_remote: Option<Arc<dyn RemoteObject>>,
    sync: PropertySynchronizer,
}

impl Modem {
    /// Bind the modem at `path` and its subsystems.
    ///
    /// `initial` is the property set delivered with `GetModems` or
    /// `ModemAdded`; it is visible as soon as this returns, before the
    /// modem's own property fetch completes. A subsystem that cannot be bound
    /// is logged and never attached.
    ///
    /// # Errors
    /// Returns an error if the modem object itself cannot be bound.
    #[instrument(skip(bus, initial))]
    pub async fn create(
        bus: &dyn RemoteBus,
        path: &str,
        initial: &PropertyMap,
    ) -> Result<Arc<Self>, OfonoError> {
        let remote = bus
            .object(path, Interface::Modem)
            .await
            .inspect_err(|err| error!("Unable to bind modem at {path}: {err}"))?;

        let network_registration_remote =
            match bus.object(path, Interface::NetworkRegistration).await {
                Ok(remote) => Some(remote),
                Err(err) => {
                    warn!("Modem {path} has no network registration: {err}");
                    None
                }
            };

        let modem = Arc::new(Self {
            path: path.to_string(),
            powered: Property::new(false),
            online: Property::new(false),
            lockdown: Property::new(false),
            emergency: Property::new(false),
            name: Property::new(String::new()),
            manufacturer: Property::new(String::new()),
            model: Property::new(String::new()),
            revision: Property::new(String::new()),
            serial: Property::new(String::new()),
            modem_type: Property::new(String::new()),
            interfaces: Property::new(Vec::new()),
            features: Property::new(Vec::new()),
            network_registration: Property::new(None),
            network_registration_remote,
            sync: PropertySynchronizer::new(remote),
        });

        for (name, value) in initial {
            properties::PROPERTIES.apply(&modem, path, name, value);
        }

        modem
            .sync
            .start(&properties::PROPERTIES, Arc::downgrade(&modem));

        debug!("Modem {path} created");
        Ok(modem)
    }

    /// Object path of the modem.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the modem is powered.
    pub fn powered(&self) -> bool {
        self.powered.get()
    }

    /// Whether the radio is on.
    pub fn online(&self) -> bool {
        self.online.get()
    }

    /// Whether the modem is locked down.
    pub fn lockdown(&self) -> bool {
        self.lockdown.get()
    }

    /// Whether the modem is in emergency mode.
    pub fn emergency(&self) -> bool {
        self.emergency.get()
    }

    /// Friendly name, empty until known.
    pub fn name(&self) -> String {
        self.name.get()
    }

    /// Manufacturer, empty until known.
    pub fn manufacturer(&self) -> String {
        self.manufacturer.get()
    }

    /// Model, empty until known.
    pub fn model(&self) -> String {
        self.model.get()
    }

    /// Firmware revision, empty until known.
    pub fn revision(&self) -> String {
        self.revision.get()
    }

    /// IMEI or equivalent serial, empty until known.
    pub fn serial(&self) -> String {
        self.serial.get()
    }

    /// Modem type ("hardware", "sap", "hfp", ...), empty until known.
    pub fn modem_type(&self) -> String {
        self.modem_type.get()
    }

    /// oFono interfaces currently available on this modem.
    pub fn interfaces(&self) -> Vec<String> {
        self.interfaces.get()
    }

    /// Features currently available on this modem.
    pub fn features(&self) -> Vec<String> {
        self.features.get()
    }

    /// Whether `interface` is currently listed in `Interfaces`.
    pub fn has_interface(&self, interface: &str) -> bool {
        self.interfaces
            .get()
            .iter()
            .any(|available| available == interface)
    }

    /// Network registration of this modem, while `Interfaces` lists it.
    pub fn network_registration(&self) -> Option<Arc<NetworkRegistration>> {
        self.network_registration.get()
    }

    /// Stream of the attached network registration, starting with the current one.
    ///
    /// Yields a new instance every time the interface reappears; handlers
    /// registered on an earlier instance do not carry over.
    pub fn watch_network_registration(
        &self,
    ) -> impl Stream<Item = Option<Arc<NetworkRegistration>>> + Send + use<> {
        self.network_registration.watch()
    }

    /// Attach or detach the network registration to match `Interfaces`.
    fn refresh_network_registration(&self) {
        let Some(remote) = &self.network_registration_remote else {
            return;
        };
        let listed = self.has_interface(Interface::NetworkRegistration.name());

        self.network_registration
            .modify(|current| match (listed, current.is_some()) {
                (true, false) => {
                    debug!("Modem {} gained network registration", self.path);
                    *current = Some(NetworkRegistration::from_remote(Arc::clone(remote)));
                    true
                }
                (false, true) => {
                    debug!("Modem {} lost network registration", self.path);
                    *current = None;
                    true
                }
                _ => false,
            });
    }

    /// Progress of the modem's own initial property fetch.
    pub fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    /// Wait until the modem's own initial property fetch has completed or failed.
    pub async fn wait_synced(&self) -> SyncState {
        self.sync.wait_synced().await
    }

    /// Power the modem up or down.
    ///
    /// # Errors
    /// Returns the error reported by oFono.
    pub async fn set_powered(&self, powered: bool) -> Result<(), OfonoError> {
        self.set_property("Powered", PropertyValue::Bool(powered))
            .await
    }

    /// Switch the radio on or off.
    ///
    /// # Errors
    /// Returns the error reported by oFono.
    pub async fn set_online(&self, online: bool) -> Result<(), OfonoError> {
        self.set_property("Online", PropertyValue::Bool(online))
            .await
    }

    /// Ask oFono to change a modem property.
    ///
    /// # Errors
    /// Returns the error reported by oFono; the cache is left untouched.
    pub async fn set_property(&self, name: &str, value: PropertyValue) -> Result<(), OfonoError> {
        self.sync.set_property(name, value).await
    }
}

impl fmt::Debug for Modem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modem")
            .field("path", &self.path)
            .field("powered", &self.powered.get())
            .field("online", &self.online.get())
            .field("interfaces", &self.interfaces.get())
            .field("network_registration", &self.network_registration.get())
            .field("sync", &self.sync)
            .finish()
    }
}
