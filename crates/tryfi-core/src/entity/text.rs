use crate::handle::SnapshotHandle;
use crate::snapshot::Pet;

use super::{DeviceInfo, Entity, EntityState, PetRef, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    ActivityType,
    CurrentPlaceName,
    CurrentPlaceAddress,
    ConnectedTo,
}

struct TextKindRow {
    title: &'static str,
    icon: &'static str,
}

// Indexed by `TextKind` discriminant.
const TEXT_KINDS: [TextKindRow; 4] = [
    TextKindRow {
        title: "Activity Type",
        icon: "mdi:run",
    },
    TextKindRow {
        title: "Current Place Name",
        icon: "mdi:earth",
    },
    TextKindRow {
        title: "Current Place Address",
        icon: "mdi:map-marker",
    },
    TextKindRow {
        title: "Connected To",
        icon: "mdi:human-greeting-proximity",
    },
];

impl TextKind {
    pub const ALL: [TextKind; 4] = [
        TextKind::ActivityType,
        TextKind::CurrentPlaceName,
        TextKind::CurrentPlaceAddress,
        TextKind::ConnectedTo,
    ];

    fn row(self) -> &'static TextKindRow {
        &TEXT_KINDS[self as usize]
    }

    pub fn title(self) -> &'static str {
        self.row().title
    }

    pub fn icon(self) -> &'static str {
        self.row().icon
    }

    /// `"Current Place Name"` -> `"current-place-name"`.
    pub fn slug(self) -> String {
        self.title().to_lowercase().replace(' ', "-")
    }

    fn read(self, pet: &Pet) -> Option<String> {
        match self {
            Self::ActivityType => pet.activity_type().map(str::to_string),
            Self::CurrentPlaceName => pet.curr_place_name().map(str::to_string),
            Self::CurrentPlaceAddress => pet.curr_place_address().map(str::to_string),
            Self::ConnectedTo => pet
                .device
                .as_ref()
                .and_then(|device| device.connection_state_type.clone()),
        }
    }
}

/// Free-text sensor for one of the fixed [`TextKind`]s.
#[derive(Debug, Clone)]
pub struct TextSensor {
    pet: PetRef,
    kind: TextKind,
}

impl TextSensor {
    pub fn new(pet_id: impl Into<String>, snapshot: SnapshotHandle, kind: TextKind) -> Self {
        Self {
            pet: PetRef::new(pet_id, snapshot),
            kind,
        }
    }

    pub fn kind(&self) -> TextKind {
        self.kind
    }
}

impl Entity for TextSensor {
    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn unique_id(&self) -> String {
        self.pet.unique_id(&self.kind.slug())
    }

    fn name(&self) -> String {
        format!("{} {}", self.pet.pet_name(), self.kind.title())
    }

    fn state(&self) -> EntityState {
        self.pet.read(|pet| self.kind.read(pet)).flatten().into()
    }

    fn icon(&self) -> Option<String> {
        Some(self.kind.icon().to_string())
    }

    fn device_info(&self) -> DeviceInfo {
        self.pet.device_info()
    }
}
