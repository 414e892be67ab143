//! Product entity type - a priceable catalog item

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::ValidationError;

/// How a product's price is derived from its dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingModel {
    /// rate * quantity
    PerUnit,
    /// rate * height * width * quantity
    Area,
    /// rate * height * width * depth * quantity
    Volume,
    /// rate * width * quantity
    RunningFt,
}

impl PricingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModel::PerUnit => "PER_UNIT",
            PricingModel::Area => "AREA",
            PricingModel::Volume => "VOLUME",
            PricingModel::RunningFt => "RUNNING_FT",
        }
    }

    pub fn all() -> &'static [PricingModel] {
        &[
            PricingModel::PerUnit,
            PricingModel::Area,
            PricingModel::Volume,
            PricingModel::RunningFt,
        ]
    }
}

impl std::fmt::Display for PricingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PricingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "PER_UNIT" => Ok(PricingModel::PerUnit),
            "AREA" => Ok(PricingModel::Area),
            "VOLUME" => Ok(PricingModel::Volume),
            "RUNNING_FT" => Ok(PricingModel::RunningFt),
            other => Err(format!(
                "unknown pricing model '{}' (expected PER_UNIT, AREA, VOLUME or RUNNING_FT)",
                other
            )),
        }
    }
}

/// A Product entity - catalog item quote lines reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: EntityId,

    /// Product name
    pub name: String,

    /// Catalog category (e.g. "Kitchen", "Wardrobe")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Pricing model the rate applies under
    pub pricing_model: PricingModel,

    /// Rate in workspace currency, per pricing-model unit
    pub unit_rate: f64,

    /// Description shown in listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Cutlist template (TMPL-...) used when generating part lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<EntityId>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Entity for Product {
    const PREFIX: &'static str = "PROD";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Product {
    /// Create a new product
    pub fn new(name: impl Into<String>, pricing_model: PricingModel, unit_rate: f64) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Prod),
            name: name.into(),
            category: None,
            pricing_model,
            unit_rate,
            description: None,
            template: None,
            created: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "product",
                field: "name",
            });
        }
        if self.unit_rate < 0.0 {
            return Err(ValidationError::NegativeValue {
                entity: "product",
                field: "unit_rate",
            });
        }
        Ok(())
    }
}
