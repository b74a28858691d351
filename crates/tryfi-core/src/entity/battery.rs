use crate::handle::SnapshotHandle;

use super::{icon_for_battery_level, DeviceInfo, Entity, EntityState, PetRef, Platform};

pub const DEVICE_CLASS_BATTERY: &str = "battery";
pub const PERCENTAGE: &str = "%";

#[derive(Debug, Clone)]
pub struct BatterySensor {
    pet: PetRef,
}

impl BatterySensor {
    pub fn new(pet_id: impl Into<String>, snapshot: SnapshotHandle) -> Self {
        Self {
            pet: PetRef::new(pet_id, snapshot),
        }
    }

    pub fn battery_percent(&self) -> Option<u8> {
        self.pet.read_device(|device| device.battery_percent)
    }

    pub fn is_charging(&self) -> bool {
        self.pet
            .read_device(|device| device.is_charging)
            .unwrap_or(false)
    }
}

impl Entity for BatterySensor {
    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn unique_id(&self) -> String {
        self.pet.unique_id("battery")
    }

    fn name(&self) -> String {
        format!("{} Collar Battery Level", self.pet.pet_name())
    }

    fn state(&self) -> EntityState {
        self.battery_percent()
            .map(|percent| EntityState::Integer(i64::from(percent)))
            .unwrap_or(EntityState::Unknown)
    }

    fn icon(&self) -> Option<String> {
        Some(icon_for_battery_level(self.battery_percent(), self.is_charging()))
    }

    fn device_class(&self) -> Option<&'static str> {
        Some(DEVICE_CLASS_BATTERY)
    }

    fn unit_of_measurement(&self) -> Option<&'static str> {
        Some(PERCENTAGE)
    }

    fn device_info(&self) -> DeviceInfo {
        self.pet.device_info()
    }
}
