//! Client entity type - the paying customer a project belongs to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::ValidationError;

/// A Client entity - owner of zero or more projects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: EntityId,

    /// Client name
    pub name: String,

    /// Contact phone number
    pub phone: String,

    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Entity for Client {
    const PREFIX: &'static str = "CLT";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Client {
    /// Create a new client
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Clt),
            name: name.into(),
            phone: phone.into(),
            email: None,
            address: None,
            created: Utc::now(),
        }
    }

    /// Check required fields; name and phone must be non-empty
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "client",
                field: "name",
            });
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "client",
                field: "phone",
            });
        }
        Ok(())
    }
}
