use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::client::TryFiClient;
use crate::error::EntityError;
use crate::handle::SnapshotHandle;

use super::{DeviceInfo, Entity, EntityState, PetRef, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LostModeOption {
    Safe,
    Lost,
}

impl LostModeOption {
    pub const ALL: [LostModeOption; 2] = [LostModeOption::Safe, LostModeOption::Lost];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Lost => "Lost",
        }
    }

    pub fn parse(option: &str) -> Result<Self, EntityError> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == option)
            .ok_or_else(|| EntityError::InvalidOption(option.to_string()))
    }

    pub fn is_lost(self) -> bool {
        matches!(self, Self::Lost)
    }
}

/// Two-option select driving the collar's lost-dog alert.
///
/// Writes go straight upstream; the displayed option only changes once a
/// later refresh carries the new flag.
#[derive(Clone)]
pub struct LostModeSelect {
    pet: PetRef,
    session: Arc<dyn TryFiClient>,
}

impl std::fmt::Debug for LostModeSelect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LostModeSelect")
            .field("pet", &self.pet)
            .finish_non_exhaustive()
    }
}

impl LostModeSelect {
    pub fn new(
        pet_id: impl Into<String>,
        snapshot: SnapshotHandle,
        session: Arc<dyn TryFiClient>,
    ) -> Self {
        Self {
            pet: PetRef::new(pet_id, snapshot),
            session,
        }
    }

    pub fn pet_id(&self) -> &str {
        self.pet.pet_id()
    }

    pub fn options(&self) -> [&'static str; 2] {
        LostModeOption::ALL.map(LostModeOption::as_str)
    }

    pub fn current_option(&self) -> LostModeOption {
        match self.pet.read_device(|device| device.is_lost) {
            Some(true) => LostModeOption::Lost,
            _ => LostModeOption::Safe,
        }
    }

    pub async fn select_option(&self, option: &str) -> Result<(), EntityError> {
        let choice = LostModeOption::parse(option)?;
        let pet_id = self
            .pet
            .read(|pet| pet.pet_id.clone())
            .ok_or_else(|| EntityError::PetUnavailable(self.pet.pet_id().to_string()))?;

        info!(pet_id = %pet_id, option = choice.as_str(), "setting lost dog mode");
        self.session
            .set_lost_dog_mode(&pet_id, choice.is_lost())
            .await?;
        Ok(())
    }
}

impl Entity for LostModeSelect {
    fn platform(&self) -> Platform {
        Platform::Select
    }

    fn unique_id(&self) -> String {
        self.pet.unique_id("lost")
    }

    fn name(&self) -> String {
        format!("{} Lost Mode", self.pet.pet_name())
    }

    fn state(&self) -> EntityState {
        EntityState::Text(self.current_option().as_str().to_string())
    }

    fn attributes(&self) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert("options".to_string(), serde_json::json!(self.options()));
        attributes
    }

    fn device_info(&self) -> DeviceInfo {
        self.pet.device_info()
    }
}
