//! Template expansion - turns a parametric template plus one quote
//! item into concrete cutlist panels
//!
//! Expansion runs in a fixed order: base variables, parameter
//! defaults, user overrides, derived variables, validation rules, then
//! part rules. Part rules whose quantity evaluates to zero or below
//! are skipped.

use std::collections::HashMap;

use thiserror::Error;

use crate::entities::cutlist::{CutlistItem, EdgeBanding, GrainDirection, PartType};
use crate::entities::quote::QuoteItem;
use crate::entities::template::ProductTemplate;
use crate::engine::expr::{self, ExprError};

#[derive(Debug, Error)]
pub enum TemplateEngineError {
    #[error("error evaluating derived var '{name}': {source}")]
    DerivedVar {
        name: String,
        #[source]
        source: ExprError,
    },

    #[error("error in validation rule '{condition}': {source}")]
    ValidationExpr {
        condition: String,
        #[source]
        source: ExprError,
    },

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("error generating part '{part}': {source}")]
    PartRule {
        part: String,
        #[source]
        source: ExprError,
    },

    #[error("part '{part}' has negative {field}: {value}")]
    NegativeDimension {
        part: String,
        field: &'static str,
        value: f64,
    },
}

/// Build the variable context for a quote item under a template.
///
/// Exposed separately so interactive flows can show resolved values.
pub fn build_vars(
    item: &QuoteItem,
    template: &ProductTemplate,
) -> Result<HashMap<String, f64>, TemplateEngineError> {
    let mut vars = HashMap::new();

    // Base dimensions from the quote item
    vars.insert("W".to_string(), item.width.unwrap_or(0.0));
    vars.insert("H".to_string(), item.height.unwrap_or(0.0));
    vars.insert("D".to_string(), item.depth.unwrap_or(0.0));

    // Material specifications from the template
    vars.insert("T".to_string(), template.base_thickness);
    vars.insert("BACK_T".to_string(), template.back_panel_thickness);
    vars.insert("PLINTH".to_string(), template.plinth_height);

    for param in &template.params {
        vars.insert(param.name.clone(), param.default_value);
    }

    for (name, value) in &item.template_params {
        vars.insert(name.clone(), *value);
    }

    let mut derived: Vec<_> = template.derived_vars.iter().collect();
    derived.sort_by_key(|v| v.execution_order);
    for var in derived {
        let value =
            expr::eval_numeric(&var.expression, &vars).map_err(|source| {
                TemplateEngineError::DerivedVar {
                    name: var.name.clone(),
                    source,
                }
            })?;
        vars.insert(var.name.clone(), value);
    }

    Ok(vars)
}

/// Expand a template into cutlist panels for one quote item.
///
/// Emitted quantities are per single unit multiplied by the item
/// quantity, so a two-unit cabinet emits four side panels.
pub fn expand(
    item: &QuoteItem,
    template: &ProductTemplate,
) -> Result<Vec<CutlistItem>, TemplateEngineError> {
    let vars = build_vars(item, template)?;

    for rule in &template.validation_rules {
        let valid = expr::eval_bool(&rule.condition, &vars).map_err(|source| {
            TemplateEngineError::ValidationExpr {
                condition: rule.condition.clone(),
                source,
            }
        })?;
        if !valid {
            return Err(TemplateEngineError::ValidationFailed(
                rule.error_message.clone(),
            ));
        }
    }

    let mut rules: Vec<_> = template.part_rules.iter().collect();
    rules.sort_by_key(|r| r.execution_order);

    let mut panels = Vec::new();
    for rule in rules {
        let eval = |e: &str| {
            expr::eval_numeric(e, &vars).map_err(|source| TemplateEngineError::PartRule {
                part: rule.part_name.clone(),
                source,
            })
        };

        let width = eval(&rule.width_expr)?;
        let height = eval(&rule.height_expr)?;
        let thickness = match &rule.thickness_expr {
            Some(e) => eval(e)?,
            None => template.base_thickness,
        };
        let qty = eval(&rule.qty_expr)? as i64;
        if qty <= 0 {
            continue;
        }

        // Validation rules only see the inputs; a derived expression can
        // still go negative on small carcasses
        let dims = [
            ("cut width", width),
            ("cut height", height),
            ("thickness", thickness),
        ];
        for (field, value) in dims {
            if value < 0.0 {
                return Err(TemplateEngineError::NegativeDimension {
                    part: rule.part_name.clone(),
                    field,
                    value,
                });
            }
        }

        let mut panel = CutlistItem::new(
            item.quotation.clone(),
            item.id.clone(),
            rule.part_name.clone(),
            qty as u32 * item.quantity,
        );
        panel.part_type = rule.part_type.as_deref().map(parse_part_type);
        panel.cut_width = Some(width);
        panel.cut_height = Some(height);
        panel.thickness = Some(thickness);
        panel.material_type = rule.material_type.clone();
        panel.edge_banding = rule.edge_banding.as_deref().and_then(parse_edge_banding);
        panel.grain_direction = rule.grain_direction.as_deref().and_then(parse_grain);
        panels.push(panel);
    }

    Ok(panels)
}

fn parse_part_type(s: &str) -> PartType {
    match s.to_uppercase().as_str() {
        "CARCASS" => PartType::Carcass,
        "BACK" => PartType::Back,
        "SHUTTER" => PartType::Shutter,
        _ => PartType::Generic,
    }
}

fn parse_edge_banding(s: &str) -> Option<EdgeBanding> {
    match s.to_uppercase().as_str() {
        "NONE" => Some(EdgeBanding::None),
        "FRONT_ONLY" => Some(EdgeBanding::FrontOnly),
        "ALL" => Some(EdgeBanding::All),
        _ => None,
    }
}

fn parse_grain(s: &str) -> Option<GrainDirection> {
    match s.to_uppercase().as_str() {
        "VERTICAL" => Some(GrainDirection::Vertical),
        "HORIZONTAL" => Some(GrainDirection::Horizontal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::{EntityId, EntityPrefix};
    use crate::entities::catalog;

    fn kitchen_item(quantity: u32) -> QuoteItem {
        let mut item = QuoteItem::new(
            EntityId::new(EntityPrefix::Quot),
            EntityId::new(EntityPrefix::Area),
            EntityId::new(EntityPrefix::Prod),
            quantity,
        );
        item.width = Some(600.0);
        item.height = Some(850.0);
        item.depth = Some(560.0);
        item
    }

    #[test]
    fn test_kitchen_base_expansion() {
        let template = catalog::kitchen_base();
        let item = kitchen_item(1);
        let panels = expand(&item, &template).unwrap();

        // SHELF_COUNT=1, DOOR_COUNT=1 defaults: all six rules emit
        assert_eq!(panels.len(), 6);

        let side = &panels[0];
        assert_eq!(side.part_name, "Side Panel");
        assert_eq!(side.quantity, 2);
        assert_eq!(side.cut_width, Some(560.0)); // D
        assert_eq!(side.cut_height, Some(850.0)); // H
        assert_eq!(side.thickness, Some(18.0));
        assert_eq!(side.part_type, Some(PartType::Carcass));
        assert_eq!(side.edge_banding, Some(EdgeBanding::FrontOnly));
        assert_eq!(side.grain_direction, Some(GrainDirection::Vertical));

        let bottom = &panels[1];
        assert_eq!(bottom.cut_width, Some(600.0 - 2.0 * 18.0)); // INTERNAL_W
        assert_eq!(bottom.cut_height, Some(560.0 - 18.0)); // INTERNAL_D

        let back = &panels[4];
        assert_eq!(back.part_type, Some(PartType::Back));
        assert_eq!(back.thickness, Some(6.0)); // BACK_T
        assert_eq!(back.edge_banding, Some(EdgeBanding::None));

        let shutter = &panels[5];
        assert_eq!(shutter.cut_width, Some(600.0)); // W/DOOR_COUNT, 1 door
        assert_eq!(shutter.cut_height, Some(850.0 - 100.0 - 18.0)); // OPEN_H
    }

    #[test]
    fn test_zero_quantity_parts_are_skipped() {
        let template = catalog::kitchen_base();
        let mut item = kitchen_item(1);
        item.template_params.insert("SHELF_COUNT".to_string(), 0.0);

        let panels = expand(&item, &template).unwrap();
        assert_eq!(panels.len(), 5);
        assert!(panels.iter().all(|p| p.part_name != "Shelf"));
    }

    #[test]
    fn test_item_quantity_multiplies_panel_quantity() {
        let template = catalog::kitchen_base();
        let item = kitchen_item(3);
        let panels = expand(&item, &template).unwrap();

        let side = panels.iter().find(|p| p.part_name == "Side Panel").unwrap();
        assert_eq!(side.quantity, 6);
    }

    #[test]
    fn test_user_override_changes_geometry() {
        let template = catalog::kitchen_base();
        let mut item = kitchen_item(1);
        item.template_params.insert("DOOR_COUNT".to_string(), 2.0);

        let panels = expand(&item, &template).unwrap();
        let shutters = panels.iter().find(|p| p.part_name == "Shutter").unwrap();
        assert_eq!(shutters.quantity, 2);
        assert_eq!(shutters.cut_width, Some(300.0)); // W/2
    }

    #[test]
    fn test_validation_rule_rejects_bad_params() {
        let template = catalog::kitchen_base();
        let mut item = kitchen_item(1);
        item.template_params.insert("DOOR_COUNT".to_string(), 3.0);

        let err = expand(&item, &template).unwrap_err();
        assert!(matches!(err, TemplateEngineError::ValidationFailed(msg)
            if msg == "Door count must be 1 or 2"));
    }

    #[test]
    fn test_negative_derived_dimension_is_rejected() {
        let template = catalog::kitchen_base();
        let mut item = kitchen_item(1);
        // Positive, so the validation rules pass, but INTERNAL_W
        // comes out at 20 - 2*18 = -16
        item.width = Some(20.0);

        let err = expand(&item, &template).unwrap_err();
        assert!(matches!(err, TemplateEngineError::NegativeDimension { ref part, field: "cut width", value }
            if part == "Bottom Panel" && value == -16.0));
    }

    #[test]
    fn test_missing_dimensions_fail_validation() {
        let template = catalog::kitchen_base();
        let mut item = kitchen_item(1);
        item.width = None; // W defaults to 0, tripping "W > 0"

        let err = expand(&item, &template).unwrap_err();
        assert!(matches!(err, TemplateEngineError::ValidationFailed(_)));
    }

    #[test]
    fn test_wardrobe_bay_width() {
        let template = catalog::wardrobe_2_split();
        let mut item = kitchen_item(1);
        item.width = Some(1200.0);
        item.height = Some(2100.0);
        item.depth = Some(600.0);

        let vars = build_vars(&item, &template).unwrap();
        // INTERNAL_W = 1200 - 36 = 1164; PARTITION_COUNT = 1
        // BAY_W = (1164 - 18) / 2 = 573
        assert_eq!(vars["BAY_W"], 573.0);

        let panels = expand(&item, &template).unwrap();
        let shelf = panels.iter().find(|p| p.part_name == "Shelf").unwrap();
        assert_eq!(shelf.quantity, 8); // SHELF_COUNT(4) * SPLIT_COUNT(2)
        assert_eq!(shelf.cut_width, Some(573.0));
    }
}
