//! Project entity type - one site or engagement under a client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::ValidationError;

/// A Project entity - owns areas and quotations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: EntityId,

    /// Project name
    pub name: String,

    /// Owning client (CLT-...); immutable after creation
    pub client: EntityId,

    /// Site address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_address: Option<String>,

    /// Property type (apartment, villa, office, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    /// Scope of work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Expected timeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Entity for Project {
    const PREFIX: &'static str = "PRJ";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Project {
    /// Create a new project under a client
    pub fn new(name: impl Into<String>, client: EntityId) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Prj),
            name: name.into(),
            client,
            site_address: None,
            property_type: None,
            scope: None,
            timeline: None,
            notes: None,
            created: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "project",
                field: "name",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let client_id = EntityId::new(EntityPrefix::Clt);
        let project = Project::new("3BHK Renovation", client_id.clone());
        assert!(project.id.to_string().starts_with("PRJ-"));
        assert_eq!(project.client, client_id);
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_project_requires_name() {
        let project = Project::new("", EntityId::new(EntityPrefix::Clt));
        assert!(matches!(
            project.validate().unwrap_err(),
            ValidationError::EmptyField { field: "name", .. }
        ));
    }

    #[test]
    fn test_project_roundtrip() {
        let mut project = Project::new("Villa Fitout", EntityId::new(EntityPrefix::Clt));
        project.property_type = Some("villa".to_string());

        let yaml = serde_yml::to_string(&project).unwrap();
        let parsed: Project = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(project.id, parsed.id);
        assert_eq!(parsed.property_type.as_deref(), Some("villa"));
    }
}
