//! Built-in catalog seeded into new workspaces with `fitq init --seed`

use crate::entities::product::{PricingModel, Product};
use crate::entities::template::{
    ProductTemplate, TemplateDerivedVar, TemplateParam, TemplatePartRule, TemplateValidationRule,
};

fn param(
    name: &str,
    default_value: f64,
    min: f64,
    max: f64,
    required: bool,
    label: &str,
    help: &str,
) -> TemplateParam {
    TemplateParam {
        name: name.to_string(),
        default_value,
        min_value: Some(min),
        max_value: Some(max),
        required,
        display_label: Some(label.to_string()),
        help_text: Some(help.to_string()),
    }
}

fn derived(name: &str, expression: &str, order: i32) -> TemplateDerivedVar {
    TemplateDerivedVar {
        name: name.to_string(),
        expression: expression.to_string(),
        execution_order: order,
    }
}

fn validation(condition: &str, message: &str) -> TemplateValidationRule {
    TemplateValidationRule {
        condition: condition.to_string(),
        error_message: message.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn part(
    part_name: &str,
    part_type: &str,
    width_expr: &str,
    height_expr: &str,
    thickness_expr: &str,
    qty_expr: &str,
    material: &str,
    edge_banding: &str,
    grain: &str,
    order: i32,
) -> TemplatePartRule {
    TemplatePartRule {
        part_name: part_name.to_string(),
        part_type: Some(part_type.to_string()),
        width_expr: width_expr.to_string(),
        height_expr: height_expr.to_string(),
        thickness_expr: Some(thickness_expr.to_string()),
        qty_expr: qty_expr.to_string(),
        material_type: Some(material.to_string()),
        edge_banding: Some(edge_banding.to_string()),
        grain_direction: Some(grain.to_string()),
        execution_order: order,
    }
}

/// Standard kitchen base cabinet with configurable shelves and doors
pub fn kitchen_base() -> ProductTemplate {
    let mut t = ProductTemplate::new("KITCHEN_BASE", "Kitchen Base Cabinet");
    t.category = Some("Kitchen".to_string());
    t.description =
        Some("Standard kitchen base cabinet with configurable shelves and doors".to_string());

    t.params = vec![
        param("SHELF_COUNT", 1.0, 0.0, 5.0, false, "Number of Shelves", "Internal shelves (0-5)"),
        param("DOOR_COUNT", 1.0, 1.0, 2.0, true, "Number of Doors", "1 or 2 doors"),
    ];

    t.derived_vars = vec![
        derived("INTERNAL_W", "W - 2*T", 1),
        derived("INTERNAL_D", "D - T", 2),
        derived("OPEN_H", "H - PLINTH - T", 3),
    ];

    t.validation_rules = vec![
        validation("DOOR_COUNT >= 1 && DOOR_COUNT <= 2", "Door count must be 1 or 2"),
        validation("W > 0 && H > 0 && D > 0", "Dimensions must be positive"),
    ];

    t.part_rules = vec![
        part("Side Panel", "CARCASS", "D", "H", "T", "2", "18mm Plywood", "FRONT_ONLY", "VERTICAL", 1),
        part("Bottom Panel", "CARCASS", "INTERNAL_W", "INTERNAL_D", "T", "1", "18mm Plywood", "FRONT_ONLY", "HORIZONTAL", 2),
        part("Top Panel", "CARCASS", "INTERNAL_W", "INTERNAL_D", "T", "1", "18mm Plywood", "FRONT_ONLY", "HORIZONTAL", 3),
        part("Shelf", "CARCASS", "INTERNAL_W", "INTERNAL_D", "T", "SHELF_COUNT", "18mm Plywood", "FRONT_ONLY", "HORIZONTAL", 4),
        part("Back Panel", "BACK", "W", "H", "BACK_T", "1", "6mm Back Panel", "NONE", "VERTICAL", 5),
        part("Shutter", "SHUTTER", "W/DOOR_COUNT", "OPEN_H", "T", "DOOR_COUNT", "18mm Plywood", "ALL", "VERTICAL", 6),
    ];

    t
}

/// Wardrobe with 2 vertical splits and configurable shelves
pub fn wardrobe_2_split() -> ProductTemplate {
    let mut t = ProductTemplate::new("WARDROBE_2_SPLIT", "2-Split Wardrobe");
    t.category = Some("Wardrobe".to_string());
    t.description = Some("Wardrobe with 2 vertical splits, configurable shelves".to_string());

    t.params = vec![
        param("SPLIT_COUNT", 2.0, 2.0, 2.0, true, "Number of Splits", "Vertical splits"),
        param("SHELF_COUNT", 4.0, 0.0, 10.0, false, "Shelves per Split", "Number of shelves"),
        param("DRAWER_COUNT", 0.0, 0.0, 5.0, false, "Number of Drawers", "Drawers in bottom"),
    ];

    t.derived_vars = vec![
        derived("INTERNAL_W", "W - 2*T", 1),
        derived("INTERNAL_D", "D - T", 2),
        derived("INTERNAL_H", "H - 2*T", 3),
        derived("PARTITION_COUNT", "SPLIT_COUNT - 1", 4),
        derived("BAY_W", "(INTERNAL_W - PARTITION_COUNT*T) / SPLIT_COUNT", 5),
    ];

    t.validation_rules = vec![
        validation("SPLIT_COUNT == 2", "This template supports 2 splits only"),
        validation("W > 0 && H > 0 && D > 0", "Dimensions must be positive"),
    ];

    t.part_rules = vec![
        part("Side Panel", "CARCASS", "D", "H", "T", "2", "18mm Plywood", "FRONT_ONLY", "VERTICAL", 1),
        part("Top Panel", "CARCASS", "INTERNAL_W", "INTERNAL_D", "T", "1", "18mm Plywood", "FRONT_ONLY", "HORIZONTAL", 2),
        part("Bottom Panel", "CARCASS", "INTERNAL_W", "INTERNAL_D", "T", "1", "18mm Plywood", "FRONT_ONLY", "HORIZONTAL", 3),
        part("Partition", "CARCASS", "INTERNAL_D", "INTERNAL_H", "T", "PARTITION_COUNT", "18mm Plywood", "FRONT_ONLY", "VERTICAL", 4),
        part("Shelf", "CARCASS", "BAY_W", "INTERNAL_D", "T", "SHELF_COUNT*SPLIT_COUNT", "18mm Plywood", "FRONT_ONLY", "HORIZONTAL", 5),
        part("Back Panel", "BACK", "W", "H", "BACK_T", "1", "6mm Back Panel", "NONE", "VERTICAL", 6),
        part("Shutter", "SHUTTER", "W/SPLIT_COUNT", "INTERNAL_H", "T", "SPLIT_COUNT", "18mm Plywood", "ALL", "VERTICAL", 7),
    ];

    t
}

fn sample_product(name: &str, category: &str, model: PricingModel, rate: f64) -> Product {
    let mut p = Product::new(name, model, rate);
    p.category = Some(category.to_string());
    p.description = Some("Seeded product".to_string());
    p
}

/// Full starter catalog: templates plus the products referencing them
pub fn seed_catalog() -> (Vec<ProductTemplate>, Vec<Product>) {
    let kitchen = kitchen_base();
    let wardrobe = wardrobe_2_split();

    let mut base_cabinet =
        sample_product("Kitchen Base Cabinet", "Kitchen", PricingModel::RunningFt, 50.0);
    base_cabinet.template = Some(kitchen.id.clone());

    let mut wardrobe_2door =
        sample_product("2-Door Wardrobe", "Wardrobe", PricingModel::Area, 0.002);
    wardrobe_2door.template = Some(wardrobe.id.clone());

    let products = vec![
        base_cabinet,
        wardrobe_2door,
        sample_product("Kitchen Wall Cabinet", "Kitchen", PricingModel::RunningFt, 40.0),
        sample_product("TV Unit Base", "Living", PricingModel::PerUnit, 15000.0),
        sample_product("Vanity", "Bathroom", PricingModel::PerUnit, 8000.0),
    ];

    (vec![kitchen, wardrobe], products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_templates_validate() {
        assert!(kitchen_base().validate().is_ok());
        assert!(wardrobe_2_split().validate().is_ok());
    }

    #[test]
    fn test_seed_catalog_links_templates() {
        let (templates, products) = seed_catalog();
        assert_eq!(templates.len(), 2);
        assert_eq!(products.len(), 5);

        let kitchen = &templates[0];
        assert_eq!(kitchen.code, "KITCHEN_BASE");
        assert_eq!(products[0].template.as_ref(), Some(&kitchen.id));

        let wardrobe = &templates[1];
        assert_eq!(wardrobe.code, "WARDROBE_2_SPLIT");
        assert_eq!(products[1].template.as_ref(), Some(&wardrobe.id));

        assert!(products[2..].iter().all(|p| p.template.is_none()));
    }

    #[test]
    fn test_kitchen_base_part_rules_ordered() {
        let t = kitchen_base();
        assert_eq!(t.part_rules.len(), 6);
        let orders: Vec<i32> = t.part_rules.iter().map(|r| r.execution_order).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
    }
}
