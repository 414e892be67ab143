//! Product template entity type - parametric cutlist definitions
//!
//! A template names the knobs a product exposes (params), the geometry
//! derived from them (derived vars), sanity checks (validation rules)
//! and the panels to emit (part rules). All expressions are evaluated
//! by the engine at cutlist generation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::ValidationError;

/// A user-settable template parameter (e.g. SHELF_COUNT)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateParam {
    /// Variable name expressions refer to
    pub name: String,

    /// Value used when the quote item supplies no override
    pub default_value: f64,

    /// Lower bound on overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,

    /// Upper bound on overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,

    /// Whether interactive flows must prompt for a value
    #[serde(default)]
    pub required: bool,

    /// Label shown when prompting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_label: Option<String>,

    /// Guidance text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// A variable computed from base dimensions and params (e.g. INTERNAL_W)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDerivedVar {
    /// Variable name expressions refer to
    pub name: String,

    /// Expression over already-defined variables
    pub expression: String,

    /// Evaluation order (lower first)
    #[serde(default)]
    pub execution_order: i32,
}

/// A check run after all variables are known
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateValidationRule {
    /// Expression that must evaluate non-zero
    pub condition: String,

    /// Message surfaced when the condition fails
    pub error_message: String,
}

/// One panel family the template emits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatePartRule {
    /// Part name (e.g. "Side Panel")
    pub part_name: String,

    /// Part classification (CARCASS, BACK, SHUTTER, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_type: Option<String>,

    /// Cut width expression in mm
    pub width_expr: String,

    /// Cut height expression in mm
    pub height_expr: String,

    /// Thickness expression in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness_expr: Option<String>,

    /// Quantity expression; results <= 0 skip the part
    pub qty_expr: String,

    /// Material description (e.g. "18mm Plywood")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,

    /// Edge banding spec (ALL, FRONT_ONLY, NONE)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_banding: Option<String>,

    /// Grain direction (VERTICAL, HORIZONTAL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grain_direction: Option<String>,

    /// Emission order (lower first)
    #[serde(default)]
    pub execution_order: i32,
}

/// A ProductTemplate entity - the full parametric definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTemplate {
    /// Unique identifier
    pub id: EntityId,

    /// Stable code, unique per workspace (e.g. KITCHEN_BASE)
    pub code: String,

    /// Display name
    pub name: String,

    /// Catalog category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Description shown in listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Template revision number
    #[serde(default = "default_version")]
    pub version: u32,

    /// Default carcass thickness in mm (base variable T)
    #[serde(default = "default_base_thickness")]
    pub base_thickness: f64,

    /// Default back panel thickness in mm (base variable BACK_T)
    #[serde(default = "default_back_thickness")]
    pub back_panel_thickness: f64,

    /// Default plinth height in mm (base variable PLINTH)
    #[serde(default = "default_plinth_height")]
    pub plinth_height: f64,

    /// User-settable parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TemplateParam>,

    /// Derived variables, evaluated in execution order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derived_vars: Vec<TemplateDerivedVar>,

    /// Validation rules, checked before part emission
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_rules: Vec<TemplateValidationRule>,

    /// Part rules, emitted in execution order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub part_rules: Vec<TemplatePartRule>,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

fn default_base_thickness() -> f64 {
    18.0
}

fn default_back_thickness() -> f64 {
    6.0
}

fn default_plinth_height() -> f64 {
    100.0
}

impl Entity for ProductTemplate {
    const PREFIX: &'static str = "TMPL";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ProductTemplate {
    /// Create a new empty template
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Tmpl),
            code: code.into(),
            name: name.into(),
            category: None,
            description: None,
            version: 1,
            base_thickness: 18.0,
            back_panel_thickness: 6.0,
            plinth_height: 100.0,
            params: Vec::new(),
            derived_vars: Vec::new(),
            validation_rules: Vec::new(),
            part_rules: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Look up a parameter by name
    pub fn param(&self, name: &str) -> Option<&TemplateParam> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Code and name must be non-empty; param names unique with
    /// defaults inside their declared bounds
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "template",
                field: "code",
            });
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                entity: "template",
                field: "name",
            });
        }
        for (i, param) in self.params.iter().enumerate() {
            if param.name.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    entity: "template param",
                    field: "name",
                });
            }
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(ValidationError::Invalid(format!(
                    "duplicate template param '{}'",
                    param.name
                )));
            }
            if let Some(min) = param.min_value {
                if param.default_value < min {
                    return Err(ValidationError::Invalid(format!(
                        "param '{}' default {} is below minimum {}",
                        param.name, param.default_value, min
                    )));
                }
            }
            if let Some(max) = param.max_value {
                if param.default_value > max {
                    return Err(ValidationError::Invalid(format!(
                        "param '{}' default {} is above maximum {}",
                        param.name, param.default_value, max
                    )));
                }
            }
        }
        for rule in &self.part_rules {
            if rule.part_name.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    entity: "part rule",
                    field: "part_name",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shelf_param() -> TemplateParam {
        TemplateParam {
            name: "SHELF_COUNT".to_string(),
            default_value: 1.0,
            min_value: Some(0.0),
            max_value: Some(5.0),
            required: false,
            display_label: Some("Number of Shelves".to_string()),
            help_text: None,
        }
    }

    #[test]
    fn test_template_creation_defaults() {
        let tmpl = ProductTemplate::new("KITCHEN_BASE", "Kitchen Base Cabinet");
        assert!(tmpl.id.to_string().starts_with("TMPL-"));
        assert_eq!(tmpl.base_thickness, 18.0);
        assert_eq!(tmpl.back_panel_thickness, 6.0);
        assert_eq!(tmpl.plinth_height, 100.0);
        assert!(tmpl.validate().is_ok());
    }

    #[test]
    fn test_template_rejects_duplicate_params() {
        let mut tmpl = ProductTemplate::new("KITCHEN_BASE", "Kitchen Base Cabinet");
        tmpl.params.push(shelf_param());
        tmpl.params.push(shelf_param());
        assert!(matches!(
            tmpl.validate().unwrap_err(),
            ValidationError::Invalid(_)
        ));
    }

    #[test]
    fn test_template_rejects_default_outside_bounds() {
        let mut tmpl = ProductTemplate::new("KITCHEN_BASE", "Kitchen Base Cabinet");
        let mut param = shelf_param();
        param.default_value = 9.0;
        tmpl.params.push(param);
        assert!(tmpl.validate().is_err());
    }

    #[test]
    fn test_template_roundtrip() {
        let mut tmpl = ProductTemplate::new("WARDROBE_2_SPLIT", "2-Split Wardrobe");
        tmpl.params.push(shelf_param());
        tmpl.derived_vars.push(TemplateDerivedVar {
            name: "INTERNAL_W".to_string(),
            expression: "W - 2*T".to_string(),
            execution_order: 0,
        });

        let yaml = serde_yml::to_string(&tmpl).unwrap();
        let parsed: ProductTemplate = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.code, "WARDROBE_2_SPLIT");
        assert_eq!(parsed.derived_vars[0].expression, "W - 2*T");
        assert_eq!(parsed.params[0].max_value, Some(5.0));
    }
}
