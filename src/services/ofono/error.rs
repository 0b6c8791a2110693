/// oFono service errors
#[derive(thiserror::Error, Debug)]
pub enum OfonoError {
    /// D-Bus communication error
    #[error("D-Bus operation failed: {0}")]
    DbusError(#[from] zbus::Error),

    /// Connecting to the bus failed
    #[error("Failed to connect to the {bus} bus: {reason}")]
    ConnectionFailed {
        /// Which bus the connection was attempted on.
        bus: String,
        /// Reason for the failure.
        reason: String,
    },

    /// A proxy for a remote object could not be created
    #[error("Failed to create {interface} proxy at {path}: {reason}")]
    ProxyCreationFailed {
        /// Interface the proxy was meant to bind.
        interface: String,
        /// Object path the proxy was meant to bind.
        path: String,
        /// Reason for the failure.
        reason: String,
    },

    /// A property value did not have the type its parser expects
    #[error("Property {property} has type {actual}, expected {expected}")]
    PropertyTypeMismatch {
        /// Name of the property.
        property: String,
        /// Type the parser expects.
        expected: &'static str,
        /// Type that was received.
        actual: &'static str,
    },

    /// A bus value could not be represented as a property value
    #[error("Unsupported property value with signature {0}")]
    UnsupportedValue(String),

    /// Remote operation failed
    #[error("oFono operation failed: {operation} - {reason}")]
    OperationFailed {
        /// The operation that failed
        operation: &'static str,
        /// The reason the operation failed
        reason: String,
    },
}
