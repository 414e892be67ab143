//! Area entity type - a room or zone within a project

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::ValidationError;

/// An Area entity - the unit priced products attach to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    /// Unique identifier
    pub id: EntityId,

    /// Area name (e.g. "Master Bedroom")
    pub name: String,

    /// Area type (kitchen, bedroom, living, ...)
    pub area_type: String,

    /// Owning project (PRJ-...)
    pub project: EntityId,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Room length in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,

    /// Room width in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Room height in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Entity for Area {
    const PREFIX: &'static str = "AREA";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Area {
    /// Create a new area under a project
    pub fn new(
        name: impl Into<String>,
        area_type: impl Into<String>,
        project: EntityId,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Area),
            name: name.into(),
            area_type: area_type.into(),
            project,
            notes: None,
            length: None,
            width: None,
            height: None,
            created: Utc::now(),
        }
    }

    /// Name must be non-empty; dimensions, when present, non-negative
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "area",
                field: "name",
            });
        }
        for (field, value) in [
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ] {
            if let Some(v) = value {
                if v < 0.0 {
                    return Err(ValidationError::NegativeValue {
                        entity: "area",
                        field,
                    });
                }
            }
        }
        Ok(())
    }
}
