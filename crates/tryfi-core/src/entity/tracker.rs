use serde_json::{Map, Value};

use crate::handle::SnapshotHandle;

use super::{DeviceInfo, Entity, EntityState, PetRef, Platform};

pub const SOURCE_TYPE_GPS: &str = "gps";

/// GPS position of a pet's collar.
#[derive(Debug, Clone)]
pub struct PetTracker {
    pet: PetRef,
}

impl PetTracker {
    pub fn new(pet_id: impl Into<String>, snapshot: SnapshotHandle) -> Self {
        Self {
            pet: PetRef::new(pet_id, snapshot),
        }
    }

    pub fn pet_id(&self) -> &str {
        self.pet.pet_id()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.pet.read(|pet| pet.curr_latitude).flatten()
    }

    pub fn longitude(&self) -> Option<f64> {
        self.pet.read(|pet| pet.curr_longitude).flatten()
    }

    pub fn source_type(&self) -> &'static str {
        SOURCE_TYPE_GPS
    }

    pub fn battery_level(&self) -> Option<u8> {
        self.pet.read_device(|device| device.battery_percent)
    }

    pub fn entity_picture(&self) -> Option<String> {
        self.pet.read(|pet| pet.photo_link.clone()).flatten()
    }
}

impl Entity for PetTracker {
    fn platform(&self) -> Platform {
        Platform::DeviceTracker
    }

    fn unique_id(&self) -> String {
        self.pet.unique_id("tracker")
    }

    fn name(&self) -> String {
        format!("{} Tracker", self.pet.pet_name())
    }

    // Zone matching belongs to the host; with no zones a located tracker is away.
    fn state(&self) -> EntityState {
        match (self.latitude(), self.longitude()) {
            (Some(_), Some(_)) => EntityState::Text("not_home".to_string()),
            _ => EntityState::Unknown,
        }
    }

    fn attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert("latitude".to_string(), serde_json::json!(self.latitude()));
        attributes.insert("longitude".to_string(), serde_json::json!(self.longitude()));
        attributes.insert("source_type".to_string(), Value::from(self.source_type()));
        attributes.insert("battery_level".to_string(), serde_json::json!(self.battery_level()));
        attributes.insert("entity_picture".to_string(), serde_json::json!(self.entity_picture()));
        attributes
    }

    fn device_info(&self) -> DeviceInfo {
        self.pet.device_info()
    }
}
