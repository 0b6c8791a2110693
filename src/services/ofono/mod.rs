/// zbus implementation of the remote bus
pub mod bus;
/// Driver registration with the telephony host
pub mod driver;
/// oFono error types
pub mod error;
/// Modem collection tracking
pub mod manager;
/// Per-modem state
pub mod modem;
/// Network registration state
pub mod network_registration;
/// D-Bus proxy trait definitions
pub mod proxy;
/// Bus seam used by the synchronization engine
pub mod remote;
/// Property synchronization engine
pub mod sync;
/// Network registration value types
pub mod types;

pub use bus::OfonoBus;
pub use driver::{DRIVER_NAME, OfonoDriver, exit, init};
pub use error::OfonoError;
pub use manager::{ManagerState, OfonoManager};
pub use modem::Modem;
pub use network_registration::NetworkRegistration;
pub use remote::{PropertyMap, PropertyValue};
pub use sync::SyncState;
pub use types::*;
