use tokio::sync::watch;
use std::sync::Arc;

use crate::handle::SnapshotHandle;
use crate::snapshot::{Pet, Snapshot};
use crate::test_support::{sample_base, sample_pet, sample_snapshot};

use super::*;

fn fixed(snapshot: Snapshot) -> SnapshotHandle {
    SnapshotHandle::fixed(snapshot)
}

#[test]
fn tracker_reports_coordinates_and_metadata() {
    // Arrange
    let tracker = PetTracker::new("pet-1", fixed(sample_snapshot()));

    // Act
    let attributes = tracker.attributes();

    // Assert
    assert_eq!(tracker.name(), "Rex Tracker");
    assert_eq!(tracker.unique_id(), "pet-1-tracker");
    assert_eq!(tracker.latitude(), Some(40.7128));
    assert_eq!(tracker.longitude(), Some(-74.006));
    assert_eq!(tracker.source_type(), "gps");
    assert_eq!(tracker.battery_level(), Some(55));
    assert_eq!(attributes["source_type"], "gps");
    assert_eq!(
        attributes["entity_picture"],
        "https://photos.example/pet-1.jpg"
    );
    assert_eq!(tracker.platform(), Platform::DeviceTracker);
}

#[test]
fn tracker_without_coordinates_reports_null_not_zero() {
    // Arrange
    let mut pet = sample_pet("pet-1", "Rex");
    pet.curr_latitude = None;
    pet.curr_longitude = None;
    pet.device = None;
    let tracker = PetTracker::new("pet-1", fixed(Snapshot::new(vec![pet], vec![])));

    // Act
    let attributes = tracker.attributes();

    // Assert
    assert_eq!(tracker.latitude(), None);
    assert_eq!(tracker.longitude(), None);
    assert_eq!(tracker.battery_level(), None);
    assert!(attributes["latitude"].is_null());
    assert!(attributes["longitude"].is_null());
    assert!(tracker.state().is_unknown());
}

#[test]
fn adapters_degrade_when_pet_missing_from_snapshot() {
    // Arrange
    let snapshot = fixed(Snapshot::new(vec![], vec![]));
    let tracker = PetTracker::new("ghost", snapshot.clone());
    let battery = BatterySensor::new("ghost", snapshot.clone());
    let text = TextSensor::new("ghost", snapshot.clone(), TextKind::ConnectedTo);

    // Act / Assert
    assert_eq!(tracker.name(), "Unknown Tracker");
    assert_eq!(tracker.unique_id(), "ghost-tracker");
    assert_eq!(tracker.latitude(), None);
    assert!(battery.state().is_unknown());
    assert!(!battery.is_charging());
    assert_eq!(battery.icon().as_deref(), Some("mdi:battery-unknown"));
    assert!(text.state().is_unknown());
    assert_eq!(tracker.device_info().name, "Unknown");
    assert_eq!(tracker.device_info().model, None);
}

#[test]
fn unique_id_survives_rename_across_snapshots() {
    // Arrange
    let (tx, rx) = watch::channel(Some(Arc::new(sample_snapshot())));
    let handle = SnapshotHandle::new(rx);
    let before = BatterySensor::new("pet-1", handle.clone());

    let mut renamed = sample_snapshot();
    renamed.pets[0].name = Some("Rexy".to_string());
    tx.send_replace(Some(Arc::new(renamed)));

    // Act
    let after = BatterySensor::new("pet-1", handle);

    // Assert
    assert_eq!(before.unique_id(), after.unique_id());
    assert_eq!(before.unique_id(), "pet-1-battery");
    assert_eq!(before.name(), "Rexy Collar Battery Level");
}

#[test]
fn adapter_rereads_after_snapshot_swap() {
    // Arrange
    let (tx, rx) = watch::channel(Some(Arc::new(sample_snapshot())));
    let battery = BatterySensor::new("pet-1", SnapshotHandle::new(rx));
    assert_eq!(battery.state(), EntityState::Integer(55));

    // Act
    let mut next = sample_snapshot();
    if let Some(device) = next.pets[0].device.as_mut() {
        device.battery_percent = Some(12);
        device.is_charging = Some(true);
    }
    tx.send_replace(Some(Arc::new(next)));

    // Assert
    assert_eq!(battery.state(), EntityState::Integer(12));
    assert_eq!(battery.icon().as_deref(), Some("mdi:battery-charging-20"));
}

#[test]
fn battery_sensor_metadata() {
    let battery = BatterySensor::new("pet-2", fixed(sample_snapshot()));

    assert_eq!(battery.name(), "Luna Collar Battery Level");
    assert_eq!(battery.device_class(), Some("battery"));
    assert_eq!(battery.unit_of_measurement(), Some("%"));
    assert_eq!(battery.icon().as_deref(), Some("mdi:battery-50"));
}

#[test]
fn battery_icon_selection() {
    assert_eq!(icon_for_battery_level(None, true), "mdi:battery-unknown");
    assert_eq!(icon_for_battery_level(Some(100), false), "mdi:battery");
    assert_eq!(icon_for_battery_level(Some(95), false), "mdi:battery");
    assert_eq!(icon_for_battery_level(Some(94), false), "mdi:battery-90");
    assert_eq!(icon_for_battery_level(Some(55), false), "mdi:battery-50");
    assert_eq!(icon_for_battery_level(Some(6), false), "mdi:battery-10");
    assert_eq!(icon_for_battery_level(Some(5), false), "mdi:battery-alert");
    assert_eq!(icon_for_battery_level(Some(10), true), "mdi:battery-outline");
    assert_eq!(icon_for_battery_level(Some(11), true), "mdi:battery-charging-20");
    assert_eq!(icon_for_battery_level(Some(100), true), "mdi:battery-charging-100");
}

#[test]
fn text_sensors_map_each_kind() {
    // Arrange
    let handle = fixed(sample_snapshot());
    let sensor = |kind| TextSensor::new("pet-1", handle.clone(), kind);

    // Act
    let activity = sensor(TextKind::ActivityType);
    let place = sensor(TextKind::CurrentPlaceName);
    let address = sensor(TextKind::CurrentPlaceAddress);
    let connected = sensor(TextKind::ConnectedTo);

    // Assert
    assert_eq!(activity.state().as_text(), Some("Rest"));
    assert_eq!(place.state().as_text(), Some("Home"));
    assert_eq!(address.state().as_text(), Some("1 Main St"));
    assert_eq!(connected.state().as_text(), Some("ConnectedToBase"));

    assert_eq!(activity.unique_id(), "pet-1-activity-type");
    assert_eq!(place.unique_id(), "pet-1-current-place-name");
    assert_eq!(address.unique_id(), "pet-1-current-place-address");
    assert_eq!(connected.unique_id(), "pet-1-connected-to");

    assert_eq!(activity.name(), "Rex Activity Type");
    assert_eq!(activity.icon().as_deref(), Some("mdi:run"));
    assert_eq!(place.icon().as_deref(), Some("mdi:earth"));
    assert_eq!(address.icon().as_deref(), Some("mdi:map-marker"));
    assert_eq!(
        connected.icon().as_deref(),
        Some("mdi:human-greeting-proximity")
    );
    assert_eq!(connected.unit_of_measurement(), None);
}

#[test]
fn connected_to_is_unknown_without_device() {
    let mut pet = Pet::new("pet-9");
    pet.name = Some("Bolt".to_string());
    let sensor = TextSensor::new(
        "pet-9",
        fixed(Snapshot::new(vec![pet], vec![])),
        TextKind::ConnectedTo,
    );

    assert!(sensor.state().is_unknown());
    assert_eq!(sensor.name(), "Bolt Connected To");
}

#[test]
fn base_status_follows_online_flag() {
    // Arrange
    let snapshot = Snapshot::new(
        vec![],
        vec![
            sample_base("base-1", "Kitchen Base", true),
            sample_base("base-2", "Garage Base", false),
        ],
    );
    let handle = fixed(snapshot);

    // Act
    let online = BaseStatusSensor::new("base-1", handle.clone());
    let offline = BaseStatusSensor::new("base-2", handle.clone());
    let missing = BaseStatusSensor::new("base-3", handle);

    // Assert
    assert_eq!(online.state().as_text(), Some("Online"));
    assert_eq!(offline.state().as_text(), Some("Offline"));
    assert_eq!(missing.state().as_text(), Some("Offline"));
    assert_eq!(online.name(), "Kitchen Base");
    assert_eq!(missing.name(), "Unknown");
    assert_eq!(online.unique_id(), "base-1");
    assert_eq!(online.icon().as_deref(), Some("mdi:wifi"));
    assert_eq!(online.device_class(), None);
    assert_eq!(online.device_info().model.as_deref(), Some("TryFi Base"));
}

#[test]
fn pet_device_info_groups_under_pet() {
    let tracker = PetTracker::new("pet-1", fixed(sample_snapshot()));

    let info = tracker.device_info();

    assert_eq!(info.identifiers, vec![("tryfi".to_string(), "pet-1".to_string())]);
    assert_eq!(info.name, "Rex");
    assert_eq!(info.manufacturer, "TryFi");
    assert_eq!(info.model.as_deref(), Some("Border Collie"));
    assert_eq!(info.sw_version.as_deref(), Some("4.12.3"));
}

#[test]
fn unknown_state_serializes_as_null() {
    let json = serde_json::to_value(EntityState::Unknown).expect("serialize");
    assert!(json.is_null());
    assert_eq!(EntityState::Unknown.to_string(), "unknown");
}
