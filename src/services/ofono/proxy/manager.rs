use std::collections::HashMap;

use zbus::{
    proxy,
    zvariant::{OwnedObjectPath, OwnedValue},
};

/// oFono root object.
///
/// Lists the modems the daemon knows about and announces arrivals and
/// departures.
#[proxy(
    default_service = "org.ofono",
    interface = "org.ofono.Manager",
    default_path = "/"
)]
pub trait Manager {
    /// Get an array of modem objects and their properties.
    ///
    /// # Returns
    /// One `(path, properties)` entry per modem, in the daemon's order.
    fn get_modems(&self) -> zbus::Result<Vec<(OwnedObjectPath, HashMap<String, OwnedValue>)>>;

    /// Emitted when a new modem has been added to the system.
    #[zbus(signal)]
    fn modem_added(
        &self,
        path: OwnedObjectPath,
        properties: HashMap<String, OwnedValue>,
    ) -> zbus::Result<()>;

    /// Emitted when a modem has been removed from the system.
    #[zbus(signal)]
    fn modem_removed(&self, path: OwnedObjectPath) -> zbus::Result<()>;
}
