#![allow(clippy::unwrap_used)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use super::*;
use crate::services::ofono::remote::mock::{MockBus, MockObject, eventually, settle};

const PATH: &str = "/modem0/netreg";

fn setup() -> (Arc<MockBus>, Arc<MockObject>) {
    let bus = MockBus::new();
    let remote = bus.remote(PATH, Interface::NetworkRegistration);
    (bus, remote)
}

fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    (Arc::clone(&hits), hits)
}

#[tokio::test]
async fn getters_return_sentinels_before_sync() {
    let (bus, remote) = setup();
    remote.with_property("Status", "registered");
    let _release = remote.hold_fetch();

    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();
    settle().await;

    assert_eq!(netreg.path(), PATH);
    assert_eq!(netreg.sync_state(), SyncState::Pending);
    assert_eq!(netreg.mode(), RegistrationMode::Unknown);
    assert_eq!(netreg.status(), NetworkStatus::Unknown);
    assert_eq!(netreg.location_area_code(), 0);
    assert_eq!(netreg.cell_id(), 0);
    assert_eq!(netreg.mcc(), "");
    assert_eq!(netreg.mnc(), "");
    assert_eq!(netreg.technology(), NetworkTechnology::Unknown);
    assert_eq!(netreg.operator_name(), "");
    assert_eq!(netreg.strength(), 0);
    assert_eq!(netreg.base_station(), "");
}

#[tokio::test]
async fn bulk_fetch_populates_fields_and_fires_status_once() {
    let (bus, remote) = setup();
    remote
        .with_property("Status", "registered")
        .with_property("Strength", 80u8);
    let release = remote.hold_fetch();

    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    netreg.register_status_changed_handler(move |status| sink.lock().unwrap().push(status));

    release.send(()).unwrap();
    assert_eq!(netreg.wait_synced().await, SyncState::Synced);
    settle().await;

    assert_eq!(netreg.status(), NetworkStatus::Registered);
    assert_eq!(netreg.strength(), 80);
    assert_eq!(*seen.lock().unwrap(), vec![NetworkStatus::Registered]);
}

#[tokio::test]
async fn every_property_round_trips_through_its_parser() {
    let (bus, remote) = setup();
    remote
        .with_property("Mode", "manual")
        .with_property("Status", "roaming")
        .with_property("LocationAreaCode", 4711u16)
        .with_property("CellId", 0x00AB_CDEFu32)
        .with_property("MobileCountryCode", "262")
        .with_property("MobileNetworkCode", "01")
        .with_property("Technology", "umts")
        .with_property("Name", "Telekom.de")
        .with_property("Strength", 63u8)
        .with_property("BaseStation", "Berlin Mitte");

    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();
    netreg.wait_synced().await;

    assert_eq!(netreg.mode(), RegistrationMode::Manual);
    assert_eq!(netreg.status(), NetworkStatus::Roaming);
    assert_eq!(netreg.location_area_code(), 4711);
    assert_eq!(netreg.cell_id(), 0x00AB_CDEF);
    assert_eq!(netreg.mcc(), "262");
    assert_eq!(netreg.mnc(), "01");
    assert_eq!(netreg.technology(), NetworkTechnology::Umts);
    assert_eq!(netreg.operator_name(), "Telekom.de");
    assert_eq!(netreg.strength(), 63);
    assert_eq!(netreg.base_station(), "Berlin Mitte");
}

#[tokio::test]
async fn unrecognized_enum_strings_map_to_unknown() {
    let (bus, remote) = setup();
    remote
        .with_property("Mode", "automatic")
        .with_property("Status", "Registered")
        .with_property("Technology", "nr");

    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();
    netreg.wait_synced().await;

    assert_eq!(netreg.mode(), RegistrationMode::Unknown);
    assert_eq!(netreg.status(), NetworkStatus::Unknown);
    assert_eq!(netreg.technology(), NetworkTechnology::Unknown);
}

#[tokio::test]
async fn technology_update_fires_no_callback() {
    let (bus, remote) = setup();
    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();
    netreg.wait_synced().await;
    eventually(|| remote.is_subscribed()).await;

    let (status_hits, status_count) = counter();
    let (strength_hits, strength_count) = counter();
    netreg.register_status_changed_handler(move |_| {
        status_hits.fetch_add(1, Ordering::SeqCst);
    });
    netreg.register_strength_changed_handler(move |_| {
        strength_hits.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(netreg.technology(), NetworkTechnology::Unknown);
    remote.emit("Technology", "lte");
    eventually(|| netreg.technology() == NetworkTechnology::Lte).await;
    settle().await;

    assert_eq!(status_count.load(Ordering::SeqCst), 0);
    assert_eq!(strength_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn second_status_handler_replaces_first() {
    let (bus, remote) = setup();
    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();
    netreg.wait_synced().await;
    eventually(|| remote.is_subscribed()).await;

    let (first_hits, first_count) = counter();
    let (second_hits, second_count) = counter();
    netreg.register_status_changed_handler(move |_| {
        first_hits.fetch_add(1, Ordering::SeqCst);
    });
    netreg.register_status_changed_handler(move |_| {
        second_hits.fetch_add(1, Ordering::SeqCst);
    });

    remote.emit("Status", "searching");
    eventually(|| second_count.load(Ordering::SeqCst) == 1).await;

    assert_eq!(first_count.load(Ordering::SeqCst), 0);
    assert_eq!(netreg.status(), NetworkStatus::Searching);
}

#[tokio::test]
async fn strength_handler_fires_for_repeated_values() {
    let (bus, remote) = setup();
    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();
    netreg.wait_synced().await;
    eventually(|| remote.is_subscribed()).await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    netreg.register_strength_changed_handler(move |strength| sink.lock().unwrap().push(strength));

    remote.emit("Strength", 40u8);
    remote.emit("Strength", 40u8);
    remote.emit("Strength", 55u8);

    eventually(|| seen.lock().unwrap().len() == 3).await;
    assert_eq!(*seen.lock().unwrap(), vec![40, 40, 55]);
    assert_eq!(netreg.strength(), 55);
}

#[tokio::test]
async fn mistyped_and_unknown_properties_are_ignored() {
    let (bus, remote) = setup();
    remote.with_property("Strength", 30u8);
    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();
    netreg.wait_synced().await;
    eventually(|| remote.is_subscribed()).await;

    remote.emit("Strength", "strong");
    remote.emit("SignalQuality", 9u8);
    remote.emit("Name", "Vodafone.de");

    eventually(|| netreg.operator_name() == "Vodafone.de").await;
    assert_eq!(netreg.strength(), 30);
}

#[tokio::test]
async fn failed_fetch_keeps_sentinels_but_follows_updates() {
    let (bus, remote) = setup();
    remote.fail_fetch("org.ofono.Error.Failed");

    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();
    assert!(matches!(netreg.wait_synced().await, SyncState::Failed(_)));
    assert_eq!(netreg.status(), NetworkStatus::Unknown);

    eventually(|| remote.is_subscribed()).await;
    remote.emit("Status", "denied");
    eventually(|| netreg.status() == NetworkStatus::Denied).await;
}

#[tokio::test]
async fn create_fails_when_remote_is_unreachable() {
    let bus = MockBus::new();
    bus.make_unreachable(PATH);

    let result = NetworkRegistration::create(&*bus, PATH).await;

    assert!(matches!(
        result,
        Err(OfonoError::ProxyCreationFailed { ref path, .. }) if path == PATH
    ));
}

#[tokio::test]
async fn last_reference_drop_releases_subscription() {
    let (bus, remote) = setup();
    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();
    netreg.wait_synced().await;
    eventually(|| remote.is_subscribed()).await;

    let extra = Arc::clone(&netreg);
    drop(netreg);
    settle().await;
    assert!(remote.is_subscribed());

    drop(extra);
    eventually(|| !remote.is_subscribed()).await;
}

#[tokio::test]
async fn writes_go_to_remote_without_touching_cache() {
    let (bus, remote) = setup();
    let netreg = NetworkRegistration::create(&*bus, PATH).await.unwrap();
    netreg.wait_synced().await;

    netreg
        .set_property("Mode", PropertyValue::from("manual"))
        .await
        .unwrap();

    assert_eq!(
        remote.writes(),
        vec![("Mode".to_string(), PropertyValue::from("manual"))]
    );
    assert_eq!(netreg.mode(), RegistrationMode::Unknown);
}
