pub mod client;
pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod handle;
pub mod registry;
pub mod snapshot;

#[cfg(test)]
mod test_support;

pub use client::{ClientError, FileClient, TryFiClient};
pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, CoordinatorError, CoordinatorStatus};
pub use entity::{DeviceInfo, Entity, EntityDescription, EntityState, Platform};
pub use error::EntityError;
pub use handle::SnapshotHandle;
pub use registry::{EntityRegistry, TryFiEntity};
pub use snapshot::{Base, Pet, PetDevice, Snapshot};
