use super::NetworkRegistration;
use crate::services::ofono::{
    NetworkStatus, NetworkTechnology, OfonoError, RegistrationMode,
    remote::PropertyValue,
    sync::PropertyTable,
};

pub(super) static PROPERTIES: PropertyTable<NetworkRegistration> = PropertyTable::new(&[
    ("Mode", mode),
    ("Status", status),
    ("LocationAreaCode", location_area_code),
    ("CellId", cell_id),
    ("MobileCountryCode", mcc),
    ("MobileNetworkCode", mnc),
    ("Technology", technology),
    ("Name", operator_name),
    ("Strength", strength),
    ("BaseStation", base_station),
]);

fn mode(netreg: &NetworkRegistration, value: &PropertyValue) -> Result<(), OfonoError> {
    let mode = RegistrationMode::from(value.as_str("Mode")?);
    netreg.mode.set(mode);
    Ok(())
}

fn status(netreg: &NetworkRegistration, value: &PropertyValue) -> Result<(), OfonoError> {
    let status = NetworkStatus::from(value.as_str("Status")?);
    netreg.status.set(status);
    netreg.status_changed.notify(status);
    Ok(())
}

fn location_area_code(
    netreg: &NetworkRegistration,
    value: &PropertyValue,
) -> Result<(), OfonoError> {
    netreg
        .location_area_code
        .set(value.as_u16("LocationAreaCode")?);
    Ok(())
}

fn cell_id(netreg: &NetworkRegistration, value: &PropertyValue) -> Result<(), OfonoError> {
    netreg.cell_id.set(value.as_u32("CellId")?);
    Ok(())
}

fn mcc(netreg: &NetworkRegistration, value: &PropertyValue) -> Result<(), OfonoError> {
    netreg
        .mcc
        .set(value.as_str("MobileCountryCode")?.to_string());
    Ok(())
}

fn mnc(netreg: &NetworkRegistration, value: &PropertyValue) -> Result<(), OfonoError> {
    netreg
        .mnc
        .set(value.as_str("MobileNetworkCode")?.to_string());
    Ok(())
}

fn technology(netreg: &NetworkRegistration, value: &PropertyValue) -> Result<(), OfonoError> {
    let technology = NetworkTechnology::from(value.as_str("Technology")?);
    netreg.technology.set(technology);
    Ok(())
}

fn operator_name(netreg: &NetworkRegistration, value: &PropertyValue) -> Result<(), OfonoError> {
    netreg.operator_name.set(value.as_str("Name")?.to_string());
    Ok(())
}

fn strength(netreg: &NetworkRegistration, value: &PropertyValue) -> Result<(), OfonoError> {
    let strength = value.as_u8("Strength")?;
    netreg.strength.set(strength);
    netreg.strength_changed.notify(strength);
    Ok(())
}

fn base_station(netreg: &NetworkRegistration, value: &PropertyValue) -> Result<(), OfonoError> {
    netreg
        .base_station
        .set(value.as_str("BaseStation")?.to_string());
    Ok(())
}
