use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::{ClientError, TryFiClient};
use crate::snapshot::{Base, Pet, PetDevice, Snapshot};

pub(crate) fn sample_pet(pet_id: &str, name: &str) -> Pet {
    Pet {
        pet_id: pet_id.to_string(),
        name: Some(name.to_string()),
        breed: Some("Border Collie".to_string()),
        photo_link: Some(format!("https://photos.example/{pet_id}.jpg")),
        curr_latitude: Some(40.7128),
        curr_longitude: Some(-74.006),
        activity_type: Some("Rest".to_string()),
        curr_place_name: Some("Home".to_string()),
        curr_place_address: Some("1 Main St".to_string()),
        daily_steps: Some(5234),
        weekly_steps: Some(40123),
        monthly_steps: Some(160000),
        daily_total_distance: Some(1234.0),
        weekly_total_distance: Some(9876.0),
        monthly_total_distance: Some(40000.0),
        daily_nap: Some(3600.0),
        weekly_nap: Some(20000.0),
        monthly_nap: Some(90000.0),
        daily_sleep: Some(125.0),
        weekly_sleep: Some(200000.0),
        monthly_sleep: Some(900000.0),
        device: Some(PetDevice {
            battery_percent: Some(55),
            is_charging: Some(false),
            build_id: Some("4.12.3".to_string()),
            is_lost: Some(false),
            connection_state_type: Some("ConnectedToBase".to_string()),
        }),
    }
}

pub(crate) fn sample_base(base_id: &str, name: &str, online: bool) -> Base {
    Base {
        base_id: base_id.to_string(),
        name: Some(name.to_string()),
        online: Some(online),
    }
}

pub(crate) fn sample_snapshot() -> Snapshot {
    Snapshot::new(
        vec![sample_pet("pet-1", "Rex"), sample_pet("pet-2", "Luna")],
        vec![sample_base("base-1", "Kitchen Base", true)],
    )
}

/// Fake session that replays queued fetch results and records writes.
#[derive(Default)]
pub(crate) struct FakeClient {
    fetches: Mutex<VecDeque<Result<Snapshot, ClientError>>>,
    writes: Mutex<Vec<(String, bool)>>,
    reject_writes: bool,
}

impl FakeClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rejecting() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }

    pub(crate) fn push_fetch(&self, result: Result<Snapshot, ClientError>) {
        self.fetches.lock().expect("fetch queue").push_back(result);
    }

    pub(crate) fn writes(&self) -> Vec<(String, bool)> {
        self.writes.lock().expect("write log").clone()
    }
}

#[async_trait]
impl TryFiClient for FakeClient {
    async fn fetch(&self) -> Result<Snapshot, ClientError> {
        self.fetches
            .lock()
            .expect("fetch queue")
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Other("no fetch queued".to_string())))
    }

    async fn set_lost_dog_mode(&self, pet_id: &str, lost: bool) -> Result<(), ClientError> {
        if self.reject_writes {
            return Err(ClientError::Rejected("collar offline".to_string()));
        }
        self.writes
            .lock()
            .expect("write log")
            .push((pet_id.to_string(), lost));
        Ok(())
    }
}

/// Shares one fake between the test body and code that wants an owned client.
#[async_trait]
impl TryFiClient for Arc<FakeClient> {
    async fn fetch(&self) -> Result<Snapshot, ClientError> {
        self.as_ref().fetch().await
    }

    async fn set_lost_dog_mode(&self, pet_id: &str, lost: bool) -> Result<(), ClientError> {
        self.as_ref().set_lost_dog_mode(pet_id, lost).await
    }
}
