//! Quotation and quote item entity types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::ValidationError;

/// Quotation lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "DRAFT",
            QuoteStatus::Submitted => "SUBMITTED",
            QuoteStatus::Approved => "APPROVED",
            QuoteStatus::Rejected => "REJECTED",
        }
    }

    /// Allowed transitions: DRAFT -> SUBMITTED -> APPROVED | REJECTED
    pub fn can_transition(&self, to: QuoteStatus) -> bool {
        matches!(
            (self, to),
            (QuoteStatus::Draft, QuoteStatus::Submitted)
                | (QuoteStatus::Submitted, QuoteStatus::Approved)
                | (QuoteStatus::Submitted, QuoteStatus::Rejected)
        )
    }

    /// Only drafts accept item mutations
    pub fn is_editable(&self) -> bool {
        matches!(self, QuoteStatus::Draft)
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(QuoteStatus::Draft),
            "SUBMITTED" => Ok(QuoteStatus::Submitted),
            "APPROVED" => Ok(QuoteStatus::Approved),
            "REJECTED" => Ok(QuoteStatus::Rejected),
            other => Err(format!(
                "unknown quote status '{}' (expected DRAFT, SUBMITTED, APPROVED or REJECTED)",
                other
            )),
        }
    }
}

/// A Quotation entity - a versioned price document for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    /// Unique identifier
    pub id: EntityId,

    /// Owning project (PRJ-...)
    pub project: EntityId,

    /// Version number, 1..n per project
    pub version_no: u64,

    /// Lifecycle state
    #[serde(default)]
    pub status: QuoteStatus,

    /// ISO currency code
    pub currency: String,

    /// Sum of item computed prices, maintained by recalculation
    #[serde(default)]
    pub total_price: f64,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Entity for Quotation {
    const PREFIX: &'static str = "QUOT";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.currency
    }
}

impl Quotation {
    /// Create a new draft quotation for a project
    pub fn new(project: EntityId, version_no: u64, currency: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Quot),
            project,
            version_no,
            status: QuoteStatus::Draft,
            currency: currency.into(),
            total_price: 0.0,
            notes: None,
            created: Utc::now(),
        }
    }
}

/// A QuoteItem entity - one priced product line within a quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteItem {
    /// Unique identifier
    pub id: EntityId,

    /// Owning quotation (QUOT-...)
    pub quotation: EntityId,

    /// Area the line belongs to (AREA-...)
    pub area: EntityId,

    /// Product being priced (PROD-...)
    pub product: EntityId,

    /// Number of units; must be positive
    pub quantity: u32,

    /// Height in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Width in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Depth in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,

    /// Price computed by the pricing engine
    #[serde(default)]
    pub computed_price: f64,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Template parameter overrides keyed by param name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub template_params: BTreeMap<String, f64>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Entity for QuoteItem {
    const PREFIX: &'static str = "ITEM";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        ""
    }
}

impl QuoteItem {
    /// Create a new quote item line
    pub fn new(quotation: EntityId, area: EntityId, product: EntityId, quantity: u32) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Item),
            quotation,
            area,
            product,
            quantity,
            height: None,
            width: None,
            depth: None,
            computed_price: 0.0,
            notes: None,
            template_params: BTreeMap::new(),
            created: Utc::now(),
        }
    }

    /// Quantity must be positive; dimensions, when present, non-negative
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity == 0 {
            return Err(ValidationError::NonPositiveQuantity);
        }
        for (field, value) in [
            ("height", self.height),
            ("width", self.width),
            ("depth", self.depth),
        ] {
            if let Some(v) = value {
                if v < 0.0 {
                    return Err(ValidationError::NegativeValue {
                        entity: "quote item",
                        field,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(QuoteStatus::Draft.can_transition(QuoteStatus::Submitted));
        assert!(QuoteStatus::Submitted.can_transition(QuoteStatus::Approved));
        assert!(QuoteStatus::Submitted.can_transition(QuoteStatus::Rejected));

        assert!(!QuoteStatus::Draft.can_transition(QuoteStatus::Approved));
        assert!(!QuoteStatus::Submitted.can_transition(QuoteStatus::Draft));
        assert!(!QuoteStatus::Approved.can_transition(QuoteStatus::Rejected));
        assert!(!QuoteStatus::Rejected.can_transition(QuoteStatus::Submitted));
    }

    #[test]
    fn test_only_draft_is_editable() {
        assert!(QuoteStatus::Draft.is_editable());
        assert!(!QuoteStatus::Submitted.is_editable());
        assert!(!QuoteStatus::Approved.is_editable());
        assert!(!QuoteStatus::Rejected.is_editable());
    }

    #[test]
    fn test_status_serde_uppercase() {
        let yaml = serde_yml::to_string(&QuoteStatus::Submitted).unwrap();
        assert_eq!(yaml.trim(), "SUBMITTED");
        let parsed: QuoteStatus = serde_yml::from_str("DRAFT").unwrap();
        assert_eq!(parsed, QuoteStatus::Draft);
    }

    #[test]
    fn test_new_quote_is_draft_with_zero_total() {
        let quote = Quotation::new(EntityId::new(EntityPrefix::Prj), 1, "INR");
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(quote.total_price, 0.0);
        assert!(quote.id.to_string().starts_with("QUOT-"));
    }

    #[test]
    fn test_item_requires_positive_quantity() {
        let mut item = QuoteItem::new(
            EntityId::new(EntityPrefix::Quot),
            EntityId::new(EntityPrefix::Area),
            EntityId::new(EntityPrefix::Prod),
            0,
        );
        assert!(matches!(
            item.validate().unwrap_err(),
            ValidationError::NonPositiveQuantity
        ));

        item.quantity = 2;
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_item_template_params_roundtrip() {
        let mut item = QuoteItem::new(
            EntityId::new(EntityPrefix::Quot),
            EntityId::new(EntityPrefix::Area),
            EntityId::new(EntityPrefix::Prod),
            1,
        );
        item.template_params.insert("SHELF_COUNT".to_string(), 3.0);

        let yaml = serde_yml::to_string(&item).unwrap();
        let parsed: QuoteItem = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.template_params.get("SHELF_COUNT"), Some(&3.0));
    }
}
