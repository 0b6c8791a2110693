/// Shared reactive building blocks
pub mod common;
/// oFono telephony backend
pub mod ofono;
/// Driver capability interface for the telephony host
pub mod telephony;

pub use ofono::{Modem, NetworkRegistration, OfonoDriver, OfonoError, OfonoManager};
pub use telephony::{DriverRegistry, DriverTable, TelephonyDriver};
