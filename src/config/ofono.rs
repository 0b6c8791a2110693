use std::fmt;

use serde::{Deserialize, Serialize};

/// Which message bus to reach oFono on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BusKind {
    /// The system bus, where oFono normally runs.
    #[default]
    System,

    /// The session bus, for test daemons such as phonesim setups.
    Session,
}

impl fmt::Display for BusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusKind::System => f.write_str("system"),
            BusKind::Session => f.write_str("session"),
        }
    }
}

/// oFono connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfonoConfig {
    /// Bus the daemon is reachable on.
    pub bus: BusKind,

    /// Well-known bus name of the daemon.
    pub service: String,

    /// Object path of the manager root object.
    pub manager_path: String,
}

impl Default for OfonoConfig {
    fn default() -> Self {
        Self {
            bus: BusKind::System,
            service: String::from("org.ofono"),
            manager_path: String::from("/"),
        }
    }
}
