use std::collections::HashMap;

use zbus::{
    proxy,
    zvariant::{OwnedValue, Value},
};

/// Network registration of one modem.
///
/// oFono exposes this interface on the modem's own object path once the
/// modem is online.
#[proxy(
    default_service = "org.ofono",
    interface = "org.ofono.NetworkRegistration"
)]
pub trait NetworkRegistration {
    /// Returns all network registration properties.
    fn get_properties(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    /// Changes the value of the specified property.
    fn set_property(&self, name: &str, value: &Value<'_>) -> zbus::Result<()>;

    /// Emitted when a network registration property changes.
    #[zbus(signal)]
    fn property_changed(&self, name: String, value: OwnedValue) -> zbus::Result<()>;
}
