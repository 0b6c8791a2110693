//! zbus proxies for the oFono interfaces this crate binds.

mod manager;
mod modem;
mod network_registration;

pub use manager::ManagerProxy;
pub use modem::ModemProxy;
pub use network_registration::NetworkRegistrationProxy;
