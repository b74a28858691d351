use std::sync::Arc;

use tracing::debug;

use crate::client::TryFiClient;
use crate::entity::{
    BaseStatusSensor, BatterySensor, DeviceInfo, Entity, EntityDescription, EntityState,
    LostModeSelect, PetTracker, Platform, StatKind, StatWindow, StatsSensor, TextKind, TextSensor,
};
use crate::error::EntityError;
use crate::handle::SnapshotHandle;

#[derive(Debug, Clone)]
pub enum TryFiEntity {
    Tracker(PetTracker),
    LostMode(LostModeSelect),
    Battery(BatterySensor),
    Text(TextSensor),
    Stats(StatsSensor),
    Base(BaseStatusSensor),
}

impl TryFiEntity {
    fn inner(&self) -> &dyn Entity {
        match self {
            Self::Tracker(e) => e,
            Self::LostMode(e) => e,
            Self::Battery(e) => e,
            Self::Text(e) => e,
            Self::Stats(e) => e,
            Self::Base(e) => e,
        }
    }

    pub async fn select_option(&self, option: &str) -> Result<(), EntityError> {
        match self {
            Self::LostMode(select) => select.select_option(option).await,
            other => Err(EntityError::NotSelectable(other.unique_id())),
        }
    }
}

impl Entity for TryFiEntity {
    fn platform(&self) -> Platform {
        self.inner().platform()
    }

    fn unique_id(&self) -> String {
        self.inner().unique_id()
    }

    fn name(&self) -> String {
        self.inner().name()
    }

    fn state(&self) -> EntityState {
        self.inner().state()
    }

    fn device_info(&self) -> DeviceInfo {
        self.inner().device_info()
    }

    fn icon(&self) -> Option<String> {
        self.inner().icon()
    }

    fn device_class(&self) -> Option<&'static str> {
        self.inner().device_class()
    }

    fn unit_of_measurement(&self) -> Option<&'static str> {
        self.inner().unit_of_measurement()
    }

    fn attributes(&self) -> serde_json::Map<String, serde_json::Value> {
        self.inner().attributes()
    }
}

/// Entities published for one configured account, in fan-out order.
///
/// Built once from the snapshot current at setup time. Pets or bases that
/// appear in later snapshots are not picked up until the registry is rebuilt.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<TryFiEntity>,
}

impl EntityRegistry {
    pub fn setup(snapshot: SnapshotHandle, session: Arc<dyn TryFiClient>) -> Self {
        let Some(current) = snapshot.current() else {
            debug!("no snapshot available, registering nothing");
            return Self::default();
        };

        let mut entities = Vec::new();
        for pet in &current.pets {
            let pet_name = pet.name.as_deref().unwrap_or("unknown");
            let pet_id = pet.pet_id.as_str();

            debug!(pet_name, pet_id, "adding pet tracker");
            entities.push(TryFiEntity::Tracker(PetTracker::new(pet_id, snapshot.clone())));

            debug!(pet_name, pet_id, "adding pet battery sensor");
            entities.push(TryFiEntity::Battery(BatterySensor::new(pet_id, snapshot.clone())));

            for kind in StatKind::ALL {
                for window in StatWindow::ALL {
                    debug!(pet_name, pet_id, kind = kind.title(), window = window.title(), "adding pet stat");
                    entities.push(TryFiEntity::Stats(StatsSensor::new(
                        pet_id,
                        snapshot.clone(),
                        kind,
                        window,
                    )));
                }
            }

            debug!(pet_name, pet_id, "adding pet generic sensors");
            for kind in TextKind::ALL {
                entities.push(TryFiEntity::Text(TextSensor::new(pet_id, snapshot.clone(), kind)));
            }

            debug!(pet_name, pet_id, "adding pet lost mode select");
            entities.push(TryFiEntity::LostMode(LostModeSelect::new(
                pet_id,
                snapshot.clone(),
                session.clone(),
            )));
        }

        for base in &current.bases {
            let base_name = base.name.as_deref().unwrap_or("unknown");
            debug!(base_name, base_id = %base.base_id, "adding base");
            entities.push(TryFiEntity::Base(BaseStatusSensor::new(
                base.base_id.as_str(),
                snapshot.clone(),
            )));
        }

        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TryFiEntity> {
        self.entities.iter()
    }

    pub fn get(&self, unique_id: &str) -> Option<&TryFiEntity> {
        self.entities
            .iter()
            .find(|entity| entity.unique_id() == unique_id)
    }

    pub fn describe_all(&self) -> Vec<EntityDescription> {
        self.entities.iter().map(|entity| entity.describe()).collect()
    }

    pub async fn select_option(&self, unique_id: &str, option: &str) -> Result<(), EntityError> {
        let entity = self
            .get(unique_id)
            .ok_or_else(|| EntityError::UnknownEntity(unique_id.to_string()))?;
        entity.select_option(option).await
    }
}
