use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::snapshot::Snapshot;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("pet {0} not found upstream")]
    PetNotFound(String),
    #[error("timeout")]
    Timeout,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("client error: {0}")]
    Other(String),
}

/// Account session against the TryFi backend.
///
/// The client value itself is the session: lost-mode writes go through the
/// same object that produced the snapshot.
#[async_trait]
pub trait TryFiClient: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, ClientError>;
    async fn set_lost_dog_mode(&self, pet_id: &str, lost: bool) -> Result<(), ClientError>;
}

/// Client backed by a JSON document shaped like the upstream payload.
///
/// Lost-mode writes are persisted to the document, so the change shows up on
/// the next `fetch` and never earlier.
pub struct FileClient {
    path: PathBuf,
}

impl FileClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_document(&self) -> Result<Value, ClientError> {
        let raw = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[async_trait]
impl TryFiClient for FileClient {
    async fn fetch(&self) -> Result<Snapshot, ClientError> {
        let raw = tokio::fs::read(&self.path).await?;
        let mut snapshot: Snapshot = serde_json::from_slice(&raw)?;
        snapshot.fetched_at = chrono::Utc::now();
        debug!(
            path = %self.path.display(),
            pets = snapshot.pets.len(),
            bases = snapshot.bases.len(),
            "loaded snapshot document"
        );
        Ok(snapshot)
    }

    async fn set_lost_dog_mode(&self, pet_id: &str, lost: bool) -> Result<(), ClientError> {
        let mut document = self.load_document().await?;

        let pet = document
            .get_mut("pets")
            .and_then(Value::as_array_mut)
            .and_then(|pets| {
                pets.iter_mut()
                    .find(|pet| pet.get("petId").and_then(Value::as_str) == Some(pet_id))
            })
            .ok_or_else(|| ClientError::PetNotFound(pet_id.to_string()))?;

        let Some(pet) = pet.as_object_mut() else {
            return Err(ClientError::Rejected(format!("pet {pet_id} is not an object")));
        };

        let device = pet
            .entry("device")
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if device.is_null() {
            *device = Value::Object(serde_json::Map::new());
        }
        let Some(device) = device.as_object_mut() else {
            return Err(ClientError::Rejected(format!(
                "device of pet {pet_id} is not an object"
            )));
        };
        device.insert("isLost".to_string(), Value::Bool(lost));

        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&document)?).await?;
        warn!(pet_id, lost, "lost dog mode written upstream");
        Ok(())
    }
}
