//! Cutlist item and material summary types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// Panel classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartType {
    Carcass,
    Back,
    Shutter,
    Generic,
}

/// Edge banding specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeBanding {
    None,
    FrontOnly,
    All,
}

impl EdgeBanding {
    /// Wire-format name, matching the serialized spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeBanding::None => "NONE",
            EdgeBanding::FrontOnly => "FRONT_ONLY",
            EdgeBanding::All => "ALL",
        }
    }
}

impl std::fmt::Display for EdgeBanding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grain direction for grain-matched materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GrainDirection {
    Vertical,
    Horizontal,
}

/// A CutlistItem entity - one panel family to cut for a quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutlistItem {
    /// Unique identifier
    pub id: EntityId,

    /// Owning quotation (QUOT-...)
    pub quotation: EntityId,

    /// Quote item the panel expands from (ITEM-...)
    pub quote_item: EntityId,

    /// Part name (e.g. "Side Panel")
    pub part_name: String,

    /// Part classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_type: Option<PartType>,

    /// Cut height in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut_height: Option<f64>,

    /// Cut width in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut_width: Option<f64>,

    /// Panel thickness in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,

    /// Number of identical panels
    pub quantity: u32,

    /// Material description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,

    /// Edge banding spec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_banding: Option<EdgeBanding>,

    /// Grain direction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grain_direction: Option<GrainDirection>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl Entity for CutlistItem {
    const PREFIX: &'static str = "CUT";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.part_name
    }
}

impl CutlistItem {
    /// Create a new cutlist panel entry
    pub fn new(
        quotation: EntityId,
        quote_item: EntityId,
        part_name: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Cut),
            quotation,
            quote_item,
            part_name: part_name.into(),
            part_type: None,
            cut_height: None,
            cut_width: None,
            thickness: None,
            quantity,
            material_type: None,
            edge_banding: None,
            grain_direction: None,
            created: Utc::now(),
        }
    }

    /// Face area of all panels in this entry, in mm^2
    pub fn total_area_mm2(&self) -> f64 {
        let h = self.cut_height.unwrap_or(0.0);
        let w = self.cut_width.unwrap_or(0.0);
        h * w * self.quantity as f64
    }
}

/// Sheet material estimate derived from a quotation's cutlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialSummary {
    /// Quotation the estimate covers (QUOT-...)
    pub quote_id: EntityId,

    /// Sum of panel face areas in mm^2
    pub total_part_area_mm2: f64,

    /// Area of one standard sheet in mm^2
    pub sheet_area_mm2: f64,

    /// Whole sheets required
    pub sheet_count: u64,

    /// Offcut share of purchased sheets, 0 <= p < 100
    pub wastage_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutlist_item_area() {
        let mut item = CutlistItem::new(
            EntityId::new(EntityPrefix::Quot),
            EntityId::new(EntityPrefix::Item),
            "Side Panel",
            2,
        );
        item.cut_height = Some(720.0);
        item.cut_width = Some(560.0);
        assert_eq!(item.total_area_mm2(), 720.0 * 560.0 * 2.0);
    }

    #[test]
    fn test_missing_dimensions_contribute_zero_area() {
        let item = CutlistItem::new(
            EntityId::new(EntityPrefix::Quot),
            EntityId::new(EntityPrefix::Item),
            "Back Panel",
            3,
        );
        assert_eq!(item.total_area_mm2(), 0.0);
    }

    #[test]
    fn test_edge_banding_display_matches_wire_names() {
        assert_eq!(EdgeBanding::None.to_string(), "NONE");
        assert_eq!(EdgeBanding::FrontOnly.to_string(), "FRONT_ONLY");
        assert_eq!(EdgeBanding::All.to_string(), "ALL");
    }

    #[test]
    fn test_enum_serde_names() {
        assert_eq!(
            serde_yml::to_string(&EdgeBanding::FrontOnly).unwrap().trim(),
            "FRONT_ONLY"
        );
        assert_eq!(
            serde_yml::to_string(&PartType::Carcass).unwrap().trim(),
            "CARCASS"
        );
        assert_eq!(
            serde_yml::to_string(&GrainDirection::Vertical).unwrap().trim(),
            "VERTICAL"
        );
    }
}
