//! The seam between the synchronization engine and the bus.
//!
//! Domain objects and the manager only ever talk to these traits. The zbus
//! implementation lives in [`super::bus`]; tests use the in-memory bus.

#[cfg(test)]
pub(crate) mod mock;
mod value;

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use futures::stream::BoxStream;

pub use value::PropertyValue;

use super::OfonoError;

/// Property name to value, as returned by `GetProperties`.
pub type PropertyMap = HashMap<String, PropertyValue>;

/// Stream of `(name, value)` pairs pushed by `PropertyChanged`.
pub type PropertyChangeStream = BoxStream<'static, (String, PropertyValue)>;

/// Stream of modem arrivals and departures pushed by the manager object.
pub type ModemEventStream = BoxStream<'static, ModemEvent>;

/// oFono interfaces this crate binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interface {
    /// `org.ofono.Modem`
    Modem,
    /// `org.ofono.NetworkRegistration`
    NetworkRegistration,
}

impl Interface {
    /// Fully qualified D-Bus interface name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Modem => "org.ofono.Modem",
            Self::NetworkRegistration => "org.ofono.NetworkRegistration",
        }
    }
}

/// Unsolicited change to the modem collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ModemEvent {
    /// `ModemAdded(o, a{sv})`
    Added {
        /// Object path of the new modem.
        path: String,
        /// Modem properties delivered with the signal.
        properties: PropertyMap,
    },
    /// `ModemRemoved(o)`
    Removed {
        /// Object path of the removed modem.
        path: String,
    },
}

/// One remote object exposing the oFono property protocol.
#[async_trait]
pub trait RemoteObject: Send + Sync + 'static {
    /// Object path this handle is bound to.
    fn path(&self) -> &str;

    /// Bulk fetch of every property.
    async fn get_properties(&self) -> Result<PropertyMap, OfonoError>;

    /// Ask the remote side to change one property.
    async fn set_property(&self, name: &str, value: PropertyValue) -> Result<(), OfonoError>;

    /// Subscribe to `PropertyChanged` notifications for this object.
    async fn receive_property_changed(&self) -> Result<PropertyChangeStream, OfonoError>;
}

/// The root manager object.
#[async_trait]
pub trait RemoteManager: Send + Sync + 'static {
    /// Enumerate every modem with its properties.
    async fn get_modems(&self) -> Result<Vec<(String, PropertyMap)>, OfonoError>;

    /// Subscribe to `ModemAdded`/`ModemRemoved`.
    async fn receive_modem_events(&self) -> Result<ModemEventStream, OfonoError>;
}

/// Factory for remote handles.
#[async_trait]
pub trait RemoteBus: Send + Sync + 'static {
    /// Bind the manager root object.
    async fn manager(&self) -> Result<Arc<dyn RemoteManager>, OfonoError>;

    /// Bind `interface` on the object at `path`.
    async fn object(
        &self,
        path: &str,
        interface: Interface,
    ) -> Result<Arc<dyn RemoteObject>, OfonoError>;
}
