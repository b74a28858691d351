//! Host-facing entity adapters.
//!
//! Every adapter is a view bound to one pet or base id. None of them cache
//! records: each read goes back through [`SnapshotHandle`](crate::SnapshotHandle)
//! to whatever snapshot is current, so a refresh is visible on the next read.

mod base;
mod battery;
mod icon;
mod lost_mode;
mod resolver;
mod stats;
mod text;
mod tracker;

#[cfg(test)]
mod adapter_tests;
#[cfg(test)]
mod lost_mode_tests;

use serde::Serialize;
use serde_json::{Map, Value};

pub use base::BaseStatusSensor;
pub use battery::BatterySensor;
pub use icon::icon_for_battery_level;
pub use lost_mode::{LostModeOption, LostModeSelect};
pub use resolver::{BaseRef, PetRef};
pub use stats::{StatKind, StatWindow, StatsSensor};
pub use text::{TextKind, TextSensor};
pub use tracker::PetTracker;

pub const DOMAIN: &str = "tryfi";
pub const MANUFACTURER: &str = "TryFi";
pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    DeviceTracker,
    Sensor,
    Select,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeviceTracker => "device_tracker",
            Self::Sensor => "sensor",
            Self::Select => "select",
        }
    }
}

/// Presented state. `Unknown` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityState {
    Unknown,
    Text(String),
    Integer(i64),
    Float(f64),
}

impl EntityState {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<Option<String>> for EntityState {
    fn from(value: Option<String>) -> Self {
        value.map(Self::Text).unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

/// Device grouping metadata; entities sharing `identifiers` land on one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: Option<String>,
    pub sw_version: Option<String>,
}

impl DeviceInfo {
    pub fn new(id: &str, name: String, model: Option<String>, sw_version: Option<String>) -> Self {
        Self {
            identifiers: vec![(DOMAIN.to_string(), id.to_string())],
            name,
            manufacturer: MANUFACTURER.to_string(),
            model,
            sw_version,
        }
    }
}

pub trait Entity {
    fn platform(&self) -> Platform;
    fn unique_id(&self) -> String;
    fn name(&self) -> String;
    fn state(&self) -> EntityState;
    fn device_info(&self) -> DeviceInfo;

    fn icon(&self) -> Option<String> {
        None
    }

    fn device_class(&self) -> Option<&'static str> {
        None
    }

    fn unit_of_measurement(&self) -> Option<&'static str> {
        None
    }

    fn attributes(&self) -> Map<String, Value> {
        Map::new()
    }

    fn describe(&self) -> EntityDescription {
        EntityDescription {
            unique_id: self.unique_id(),
            platform: self.platform(),
            name: self.name(),
            state: self.state(),
            icon: self.icon(),
            device_class: self.device_class(),
            unit_of_measurement: self.unit_of_measurement(),
            attributes: self.attributes(),
            device: self.device_info(),
        }
    }
}

/// Everything the host sees about one entity at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct EntityDescription {
    pub unique_id: String,
    pub platform: Platform,
    pub name: String,
    pub state: EntityState,
    pub icon: Option<String>,
    pub device_class: Option<&'static str>,
    pub unit_of_measurement: Option<&'static str>,
    pub attributes: Map<String, Value>,
    pub device: DeviceInfo,
}
