use std::collections::HashMap;

use zbus::{
    proxy,
    zvariant::{OwnedValue, Value},
};

/// Basic modem control.
///
/// Bound on each modem path announced by the manager.
#[proxy(default_service = "org.ofono", interface = "org.ofono.Modem")]
pub trait Modem {
    /// Returns all modem properties.
    fn get_properties(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    /// Changes the value of the specified property.
    ///
    /// Only `Powered`, `Online` and `Lockdown` are writable.
    fn set_property(&self, name: &str, value: &Value<'_>) -> zbus::Result<()>;

    /// Emitted when a property of the modem changes.
    #[zbus(signal)]
    fn property_changed(&self, name: String, value: OwnedValue) -> zbus::Result<()>;
}
