/// D-Bus object path reference.
///
/// Represents a D-Bus object path as a string (e.g., "/ril_0").
/// Used throughout the oFono service to identify remote objects without
/// holding a bus-level path type.
pub type ObjectPath = String;
