use crate::handle::SnapshotHandle;

use super::{BaseRef, DeviceInfo, Entity, EntityState, Platform};

pub const STATE_ONLINE: &str = "Online";
pub const STATE_OFFLINE: &str = "Offline";

/// Connectivity of a base station. Missing records read as offline.
#[derive(Debug, Clone)]
pub struct BaseStatusSensor {
    base: BaseRef,
}

impl BaseStatusSensor {
    pub fn new(base_id: impl Into<String>, snapshot: SnapshotHandle) -> Self {
        Self {
            base: BaseRef::new(base_id, snapshot),
        }
    }

    pub fn base_id(&self) -> &str {
        self.base.base_id()
    }

    pub fn is_online(&self) -> bool {
        self.base.read(|base| base.online).flatten().unwrap_or(false)
    }
}

impl Entity for BaseStatusSensor {
    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn unique_id(&self) -> String {
        self.base.base_id().to_string()
    }

    fn name(&self) -> String {
        self.base.base_name()
    }

    fn state(&self) -> EntityState {
        let state = if self.is_online() {
            STATE_ONLINE
        } else {
            STATE_OFFLINE
        };
        EntityState::Text(state.to_string())
    }

    fn icon(&self) -> Option<String> {
        Some("mdi:wifi".to_string())
    }

    fn device_info(&self) -> DeviceInfo {
        self.base.device_info()
    }
}
