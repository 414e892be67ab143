//! Entity trait - common interface for all entity types

use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::EntityId;

/// Common trait for all fitq entities
pub trait Entity: Serialize + DeserializeOwned {
    /// The entity type prefix (e.g., "CLT", "QUOT")
    const PREFIX: &'static str;

    /// Get the entity's unique ID
    fn id(&self) -> &EntityId;

    /// Get the entity's display name
    fn name(&self) -> &str;
}
