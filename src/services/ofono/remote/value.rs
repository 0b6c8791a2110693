use std::fmt;

use zbus::zvariant::Value;

use crate::services::ofono::OfonoError;

/// A property value as published by oFono.
///
/// oFono only ever publishes a handful of basic types through
/// `GetProperties`/`PropertyChanged`; this is the subset the domain parsers
/// understand, kept free of bus-level types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// D-Bus `b`
    Bool(bool),
    /// D-Bus `y`
    Byte(u8),
    /// D-Bus `q`
    U16(u16),
    /// D-Bus `u`
    U32(u32),
    /// D-Bus `s` or `o`
    Str(String),
    /// D-Bus `as`
    Strings(Vec<String>),
}

impl PropertyValue {
    /// Short name of the carried type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Byte(_) => "byte",
            Self::U16(_) => "uint16",
            Self::U32(_) => "uint32",
            Self::Str(_) => "string",
            Self::Strings(_) => "string array",
        }
    }

    /// Borrow the value as a string.
    ///
    /// # Errors
    /// Returns `PropertyTypeMismatch` if the value is not a string.
    pub fn as_str(&self, property: &str) -> Result<&str, OfonoError> {
        match self {
            Self::Str(value) => Ok(value),
            other => Err(other.mismatch(property, "string")),
        }
    }

    /// Read the value as a boolean.
    ///
    /// # Errors
    /// Returns `PropertyTypeMismatch` if the value is not a boolean.
    pub fn as_bool(&self, property: &str) -> Result<bool, OfonoError> {
        match self {
            Self::Bool(value) => Ok(*value),
            other => Err(other.mismatch(property, "bool")),
        }
    }

    /// Read the value as a byte.
    ///
    /// # Errors
    /// Returns `PropertyTypeMismatch` if the value is not a byte.
    pub fn as_u8(&self, property: &str) -> Result<u8, OfonoError> {
        match self {
            Self::Byte(value) => Ok(*value),
            other => Err(other.mismatch(property, "byte")),
        }
    }

    /// Read the value as a 16-bit unsigned integer.
    ///
    /// # Errors
    /// Returns `PropertyTypeMismatch` if the value is not a uint16.
    pub fn as_u16(&self, property: &str) -> Result<u16, OfonoError> {
        match self {
            Self::U16(value) => Ok(*value),
            other => Err(other.mismatch(property, "uint16")),
        }
    }

    /// Read the value as a 32-bit unsigned integer.
    ///
    /// # Errors
    /// Returns `PropertyTypeMismatch` if the value is not a uint32.
    pub fn as_u32(&self, property: &str) -> Result<u32, OfonoError> {
        match self {
            Self::U32(value) => Ok(*value),
            other => Err(other.mismatch(property, "uint32")),
        }
    }

    /// Borrow the value as a list of strings.
    ///
    /// # Errors
    /// Returns `PropertyTypeMismatch` if the value is not a string array.
    pub fn as_strings(&self, property: &str) -> Result<&[String], OfonoError> {
        match self {
            Self::Strings(values) => Ok(values),
            other => Err(other.mismatch(property, "string array")),
        }
    }

    /// Convert into a bus value for `SetProperty`.
    pub fn to_value(&self) -> Value<'_> {
        match self {
            Self::Bool(value) => Value::from(*value),
            Self::Byte(value) => Value::from(*value),
            Self::U16(value) => Value::from(*value),
            Self::U32(value) => Value::from(*value),
            Self::Str(value) => Value::from(value.as_str()),
            Self::Strings(values) => Value::from(values.clone()),
        }
    }

    fn mismatch(&self, property: &str, expected: &'static str) -> OfonoError {
        OfonoError::PropertyTypeMismatch {
            property: property.to_string(),
            expected,
            actual: self.type_name(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Byte(value) => write!(f, "{value}"),
            Self::U16(value) => write!(f, "{value}"),
            Self::U32(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value:?}"),
            Self::Strings(values) => write!(f, "{values:?}"),
        }
    }
}

impl TryFrom<&Value<'_>> for PropertyValue {
    type Error = OfonoError;

    fn try_from(value: &Value<'_>) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(value) => Ok(Self::Bool(*value)),
            Value::U8(value) => Ok(Self::Byte(*value)),
            Value::U16(value) => Ok(Self::U16(*value)),
            Value::U32(value) => Ok(Self::U32(*value)),
            Value::Str(value) => Ok(Self::Str(value.as_str().to_string())),
            Value::ObjectPath(path) => Ok(Self::Str(path.as_str().to_string())),
            Value::Value(inner) => Self::try_from(inner.as_ref()),
            Value::Array(array) => array
                .iter()
                .map(|item| match item {
                    Value::Str(value) => Ok(value.as_str().to_string()),
                    other => Err(OfonoError::UnsupportedValue(format!("{other:?}"))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Strings),
            other => Err(OfonoError::UnsupportedValue(format!("{other:?}"))),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u8> for PropertyValue {
    fn from(value: u8) -> Self {
        Self::Byte(value)
    }
}

impl From<u16> for PropertyValue {
    fn from(value: u16) -> Self {
        Self::U16(value)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        Self::U32(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(values: Vec<String>) -> Self {
        Self::Strings(values)
    }
}
