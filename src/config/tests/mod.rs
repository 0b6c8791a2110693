//! Unit tests for config module
//!
//! Tests defaults, parsing and serialization.
//! No filesystem dependencies - all in-memory.

#![allow(clippy::unwrap_used)]

use crate::{
    TelephonyError,
    config::{BusKind, Config, ConfigPaths, LogFormat, LogLevel},
};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert_eq!(config.general.log_format, LogFormat::Pretty);
    assert_eq!(config.ofono.bus, BusKind::System);
    assert_eq!(config.ofono.service, "org.ofono");
    assert_eq!(config.ofono.manager_path, "/");
}

#[test]
fn config_serialize_toml() {
    let toml_str = toml::to_string(&Config::default()).unwrap();

    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[ofono]"));
    assert!(toml_str.contains("bus = \"system\""));
}

#[test]
fn config_serialize_roundtrip() {
    let mut original = Config::default();
    original.general.log_level = LogLevel::Trace;
    original.ofono.bus = BusKind::Session;

    let toml_str = toml::to_string(&original).unwrap();

    assert_eq!(Config::from_toml(&toml_str).unwrap(), original);
}

#[test]
fn config_from_toml() {
    let config = Config::from_toml(
        r#"
        [general]
        log_level = "debug"
        log_format = "json"

        [ofono]
        bus = "session"
        service = "org.ofono.test"
    "#,
    )
    .unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.general.log_format, LogFormat::Json);
    assert_eq!(config.ofono.bus, BusKind::Session);
    assert_eq!(config.ofono.service, "org.ofono.test");
    assert_eq!(config.ofono.manager_path, "/");
}

#[test]
fn config_empty_toml() {
    assert_eq!(Config::from_toml("").unwrap(), Config::default());
}

#[test]
fn config_partial_section() {
    let config = Config::from_toml("[general]\nlog_level = \"warn\"\n").unwrap();

    assert_eq!(config.general.log_level, LogLevel::Warn);
    assert_eq!(config.general.log_format, LogFormat::Pretty);
    assert_eq!(config.ofono, Default::default());
}

#[test]
fn config_unknown_fields_are_ignored() {
    let config = Config::from_toml(
        r#"
        [general]
        unknown_field = "ignored"

        [unknown_section]
        some_field = 1
    "#,
    )
    .unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn config_invalid_toml() {
    let result = Config::from_toml("[general\nlog_level = ");

    assert!(matches!(
        result,
        Err(TelephonyError::TomlParseError { ref location, .. }) if location == "string"
    ));
}

#[test]
fn config_invalid_enum_value() {
    let result = Config::from_toml("[ofono]\nbus = \"starship\"\n");

    assert!(result.is_err());
}

#[test]
fn log_level_display_matches_filter_syntax() {
    assert_eq!(LogLevel::Error.to_string(), "error");
    assert_eq!(LogLevel::Warn.to_string(), "warn");
    assert_eq!(LogLevel::Info.to_string(), "info");
    assert_eq!(LogLevel::Debug.to_string(), "debug");
    assert_eq!(LogLevel::Trace.to_string(), "trace");
}

#[test]
fn bus_kind_display() {
    assert_eq!(BusKind::System.to_string(), "system");
    assert_eq!(BusKind::Session.to_string(), "session");
}

#[test]
fn config_paths_end_in_app_dir() {
    if std::env::var("HOME").is_err() && std::env::var("XDG_CONFIG_HOME").is_err() {
        return;
    }

    let main_config = ConfigPaths::main_config().unwrap();

    assert!(main_config.ends_with("ofono-sync/config.toml"));
    assert_eq!(main_config.parent(), Some(ConfigPaths::config_dir().unwrap().as_path()));
}
