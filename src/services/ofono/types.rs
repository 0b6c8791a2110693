use std::fmt;

/// Network selection mode (`Mode` property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegistrationMode {
    /// "auto" - the modem selects the network.
    Auto,
    /// "auto-only" - automatic selection, manual selection disallowed.
    AutoOnly,
    /// "manual" - the user selected the network.
    Manual,
    /// Never observed or not recognized.
    #[default]
    Unknown,
}

impl RegistrationMode {
    /// oFono string for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::AutoOnly => "auto-only",
            Self::Manual => "manual",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&str> for RegistrationMode {
    fn from(mode: &str) -> Self {
        match mode {
            "auto" => Self::Auto,
            "auto-only" => Self::AutoOnly,
            "manual" => Self::Manual,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for RegistrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network registration status (`Status` property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NetworkStatus {
    /// Not registered and not searching.
    Unregistered,
    /// Registered to the home network.
    Registered,
    /// Searching for a network.
    Searching,
    /// Registration was denied.
    Denied,
    /// Reported as unknown, never observed, or not recognized.
    #[default]
    Unknown,
    /// Registered to a roaming network.
    Roaming,
}

impl NetworkStatus {
    /// oFono string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unregistered => "unregistered",
            Self::Registered => "registered",
            Self::Searching => "searching",
            Self::Denied => "denied",
            Self::Unknown => "unknown",
            Self::Roaming => "roaming",
        }
    }

    /// Whether the modem is attached to a network, home or roaming.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered | Self::Roaming)
    }
}

impl From<&str> for NetworkStatus {
    fn from(status: &str) -> Self {
        match status {
            "unregistered" => Self::Unregistered,
            "registered" => Self::Registered,
            "searching" => Self::Searching,
            "denied" => Self::Denied,
            "roaming" => Self::Roaming,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Radio access technology (`Technology` property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NetworkTechnology {
    /// GSM
    Gsm,
    /// EDGE
    Edge,
    /// UMTS
    Umts,
    /// HSPA
    Hspa,
    /// LTE
    Lte,
    /// Never observed or not recognized.
    #[default]
    Unknown,
}

impl NetworkTechnology {
    /// oFono string for this technology.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gsm => "gsm",
            Self::Edge => "edge",
            Self::Umts => "umts",
            Self::Hspa => "hspa",
            Self::Lte => "lte",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&str> for NetworkTechnology {
    fn from(technology: &str) -> Self {
        match technology {
            "gsm" => Self::Gsm,
            "edge" => Self::Edge,
            "umts" => Self::Umts,
            "hspa" => Self::Hspa,
            "lte" => Self::Lte,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for NetworkTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
