use crate::handle::SnapshotHandle;
use crate::snapshot::{Base, Pet, PetDevice};

use super::{DeviceInfo, UNKNOWN_NAME};

/// Captured pet id plus the way to reach the current snapshot.
///
/// A missing snapshot or a pet absent from it resolves to `None`; callers
/// turn that into an unknown state instead of an error.
#[derive(Debug, Clone)]
pub struct PetRef {
    pet_id: String,
    snapshot: SnapshotHandle,
}

impl PetRef {
    pub fn new(pet_id: impl Into<String>, snapshot: SnapshotHandle) -> Self {
        Self {
            pet_id: pet_id.into(),
            snapshot,
        }
    }

    pub fn pet_id(&self) -> &str {
        &self.pet_id
    }

    pub fn read<R>(&self, f: impl FnOnce(&Pet) -> R) -> Option<R> {
        let snapshot = self.snapshot.current()?;
        snapshot.get_pet(&self.pet_id).map(f)
    }

    pub fn read_device<R>(&self, f: impl FnOnce(&PetDevice) -> Option<R>) -> Option<R> {
        self.read(|pet| pet.device.as_ref().and_then(f)).flatten()
    }

    pub fn pet_name(&self) -> String {
        self.read(|pet| pet.name.clone())
            .flatten()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    /// Identity hangs off the captured id only, so renames and transient
    /// gaps never change it.
    pub fn unique_id(&self, suffix: &str) -> String {
        format!("{}-{suffix}", self.pet_id)
    }

    pub fn device_info(&self) -> DeviceInfo {
        let model = self.read(|pet| pet.breed.clone()).flatten();
        let sw_version = self.read_device(|device| device.build_id.clone());
        DeviceInfo::new(&self.pet_id, self.pet_name(), model, sw_version)
    }
}

#[derive(Debug, Clone)]
pub struct BaseRef {
    base_id: String,
    snapshot: SnapshotHandle,
}

impl BaseRef {
    pub fn new(base_id: impl Into<String>, snapshot: SnapshotHandle) -> Self {
        Self {
            base_id: base_id.into(),
            snapshot,
        }
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    pub fn read<R>(&self, f: impl FnOnce(&Base) -> R) -> Option<R> {
        let snapshot = self.snapshot.current()?;
        snapshot.get_base(&self.base_id).map(f)
    }

    pub fn base_name(&self) -> String {
        self.read(|base| base.name.clone())
            .flatten()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo::new(
            &self.base_id,
            self.base_name(),
            Some("TryFi Base".to_string()),
            None,
        )
    }
}
