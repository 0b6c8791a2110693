use super::Modem;
use crate::services::{
    common::Property,
    ofono::{OfonoError, remote::PropertyValue, sync::PropertyTable},
};

pub(super) static PROPERTIES: PropertyTable<Modem> = PropertyTable::new(&[
    ("Powered", |modem, value| set_bool(&modem.powered, "Powered", value)),
    ("Online", |modem, value| set_bool(&modem.online, "Online", value)),
    ("Lockdown", |modem, value| set_bool(&modem.lockdown, "Lockdown", value)),
    ("Emergency", |modem, value| set_bool(&modem.emergency, "Emergency", value)),
    ("Name", |modem, value| set_string(&modem.name, "Name", value)),
    ("Manufacturer", |modem, value| set_string(&modem.manufacturer, "Manufacturer", value)),
    ("Model", |modem, value| set_string(&modem.model, "Model", value)),
    ("Revision", |modem, value| set_string(&modem.revision, "Revision", value)),
    ("Serial", |modem, value| set_string(&modem.serial, "Serial", value)),
    ("Type", |modem, value| set_string(&modem.modem_type, "Type", value)),
    ("Interfaces", |modem, value| {
        set_strings(&modem.interfaces, "Interfaces", value)?;
        modem.refresh_network_registration();
        Ok(())
    }),
    ("Features", |modem, value| set_strings(&modem.features, "Features", value)),
]);

fn set_bool(field: &Property<bool>, name: &str, value: &PropertyValue) -> Result<(), OfonoError> {
    field.set(value.as_bool(name)?);
    Ok(())
}

fn set_string(
    field: &Property<String>,
    name: &str,
    value: &PropertyValue,
) -> Result<(), OfonoError> {
    field.set(value.as_str(name)?.to_string());
    Ok(())
}

fn set_strings(
    field: &Property<Vec<String>>,
    name: &str,
    value: &PropertyValue,
) -> Result<(), OfonoError> {
    field.set(value.as_strings(name)?.to_vec());
    Ok(())
}
