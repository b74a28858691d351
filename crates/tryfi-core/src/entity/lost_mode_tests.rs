use std::sync::Arc;

use crate::error::EntityError;
use crate::handle::SnapshotHandle;
use crate::snapshot::Snapshot;
use crate::test_support::{sample_pet, sample_snapshot, FakeClient};

use super::*;

fn select(snapshot: Snapshot, client: Arc<FakeClient>) -> LostModeSelect {
    LostModeSelect::new("pet-1", SnapshotHandle::fixed(snapshot), client)
}

#[test]
fn current_option_defaults_to_safe_without_device() {
    // Arrange
    let mut pet = sample_pet("pet-1", "Rex");
    pet.device = None;

    // Act
    let select = select(Snapshot::new(vec![pet], vec![]), Arc::new(FakeClient::new()));

    // Assert
    assert_eq!(select.current_option(), LostModeOption::Safe);
    assert_eq!(select.state().as_text(), Some("Safe"));
}

#[test]
fn current_option_defaults_to_safe_without_flag() {
    let mut pet = sample_pet("pet-1", "Rex");
    if let Some(device) = pet.device.as_mut() {
        device.is_lost = None;
    }

    let select = select(Snapshot::new(vec![pet], vec![]), Arc::new(FakeClient::new()));

    assert_eq!(select.current_option(), LostModeOption::Safe);
}

#[test]
fn current_option_reports_lost() {
    // Arrange
    let mut pet = sample_pet("pet-1", "Rex");
    if let Some(device) = pet.device.as_mut() {
        device.is_lost = Some(true);
    }

    // Act
    let select = select(Snapshot::new(vec![pet], vec![]), Arc::new(FakeClient::new()));

    // Assert
    assert_eq!(select.current_option(), LostModeOption::Lost);
    assert_eq!(select.name(), "Rex Lost Mode");
    assert_eq!(select.unique_id(), "pet-1-lost");
    assert_eq!(select.options(), ["Safe", "Lost"]);
    assert_eq!(select.attributes()["options"], serde_json::json!(["Safe", "Lost"]));
}

#[tokio::test]
async fn selecting_lost_sends_true_and_safe_sends_false() {
    // Arrange
    let client = Arc::new(FakeClient::new());
    let select = select(sample_snapshot(), client.clone());

    // Act
    select.select_option("Lost").await.expect("lost write");
    select.select_option("Safe").await.expect("safe write");

    // Assert
    assert_eq!(
        client.writes(),
        vec![("pet-1".to_string(), true), ("pet-1".to_string(), false)]
    );
    // No optimistic update: the snapshot still says safe.
    assert_eq!(select.current_option(), LostModeOption::Safe);
}

#[tokio::test]
async fn upstream_failure_propagates() {
    // Arrange
    let client = Arc::new(FakeClient::rejecting());
    let select = select(sample_snapshot(), client);

    // Act
    let result = select.select_option("Lost").await;

    // Assert
    assert!(matches!(result, Err(EntityError::Upstream(_))));
}

#[tokio::test]
async fn invalid_option_is_rejected_before_any_write() {
    let client = Arc::new(FakeClient::new());
    let select = select(sample_snapshot(), client.clone());

    let result = select.select_option("lost").await;

    assert!(matches!(result, Err(EntityError::InvalidOption(option)) if option == "lost"));
    assert!(client.writes().is_empty());
}

#[tokio::test]
async fn write_fails_when_pet_not_in_snapshot() {
    let client = Arc::new(FakeClient::new());
    let select = select(Snapshot::new(vec![], vec![]), client.clone());

    let result = select.select_option("Lost").await;

    assert!(matches!(result, Err(EntityError::PetUnavailable(id)) if id == "pet-1"));
    assert!(client.writes().is_empty());
}
