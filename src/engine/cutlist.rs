//! Cutlist generation - expands every item in a quotation into panels
//!
//! Generation replaces the quotation's cutlist wholesale. Items whose
//! product carries a template go through the template engine; items
//! without one fall back to a single generic panel.

use thiserror::Error;

use crate::core::identity::EntityId;
use crate::entities::cutlist::{CutlistItem, PartType};
use crate::entities::product::Product;
use crate::entities::quote::{Quotation, QuoteItem};
use crate::entities::template::ProductTemplate;
use crate::engine::template::{self, TemplateEngineError};

#[derive(Debug, Error)]
pub enum CutlistError {
    #[error("product {0} not found for quote item")]
    ProductNotFound(EntityId),

    #[error("template {0} not found for product")]
    TemplateNotFound(EntityId),

    #[error("template evaluation error for product '{product}': {source}")]
    Template {
        product: String,
        #[source]
        source: TemplateEngineError,
    },
}

/// Generate the full cutlist for a quotation.
///
/// The result is the complete new cutlist; the caller persists it in
/// place of whatever existed before.
pub fn generate(
    quote: &Quotation,
    items: &[QuoteItem],
    products: &[Product],
    templates: &[ProductTemplate],
) -> Result<Vec<CutlistItem>, CutlistError> {
    let mut out = Vec::new();

    for item in items {
        let product = products
            .iter()
            .find(|p| p.id == item.product)
            .ok_or_else(|| CutlistError::ProductNotFound(item.product.clone()))?;

        match &product.template {
            Some(template_id) => {
                let tmpl = templates
                    .iter()
                    .find(|t| &t.id == template_id)
                    .ok_or_else(|| CutlistError::TemplateNotFound(template_id.clone()))?;
                let panels =
                    template::expand(item, tmpl).map_err(|source| CutlistError::Template {
                        product: product.name.clone(),
                        source,
                    })?;
                out.extend(panels);
            }
            None => out.push(generic_panel(quote, item, product)),
        }
    }

    Ok(out)
}

/// Single-panel fallback for products without a template. Depth stands
/// in for thickness until templates cover the whole catalog.
fn generic_panel(quote: &Quotation, item: &QuoteItem, product: &Product) -> CutlistItem {
    let mut panel = CutlistItem::new(
        quote.id.clone(),
        item.id.clone(),
        product.name.clone(),
        item.quantity,
    );
    panel.part_type = Some(PartType::Generic);
    panel.cut_height = item.height;
    panel.cut_width = item.width;
    panel.thickness = item.depth;
    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;
    use crate::entities::catalog;
    use crate::entities::product::PricingModel;

    fn draft() -> Quotation {
        Quotation::new(EntityId::new(EntityPrefix::Prj), 1, "INR")
    }

    fn item_for(quote: &Quotation, product: &Product, quantity: u32) -> QuoteItem {
        let mut item = QuoteItem::new(
            quote.id.clone(),
            EntityId::new(EntityPrefix::Area),
            product.id.clone(),
            quantity,
        );
        item.width = Some(600.0);
        item.height = Some(850.0);
        item.depth = Some(560.0);
        item
    }

    #[test]
    fn test_generic_fallback_for_untemplated_product() {
        let quote = draft();
        let product = Product::new("TV Unit Base", PricingModel::PerUnit, 15000.0);
        let item = item_for(&quote, &product, 2);

        let panels = generate(&quote, &[item.clone()], &[product], &[]).unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].part_name, "TV Unit Base");
        assert_eq!(panels[0].part_type, Some(PartType::Generic));
        assert_eq!(panels[0].quantity, 2);
        assert_eq!(panels[0].cut_height, Some(850.0));
        assert_eq!(panels[0].thickness, Some(560.0));
        assert_eq!(panels[0].quote_item, item.id);
    }

    #[test]
    fn test_templated_product_expands() {
        let quote = draft();
        let template = catalog::kitchen_base();
        let mut product = Product::new("Kitchen Base Cabinet", PricingModel::RunningFt, 50.0);
        product.template = Some(template.id.clone());
        let item = item_for(&quote, &product, 1);

        let panels = generate(&quote, &[item], &[product], &[template]).unwrap();
        assert_eq!(panels.len(), 6);
        assert!(panels.iter().all(|p| p.quotation == quote.id));
    }

    #[test]
    fn test_generation_is_value_idempotent() {
        let quote = draft();
        let template = catalog::kitchen_base();
        let mut product = Product::new("Kitchen Base Cabinet", PricingModel::RunningFt, 50.0);
        product.template = Some(template.id.clone());
        let item = item_for(&quote, &product, 1);

        let first = generate(&quote, &[item.clone()], &[product.clone()], &[template.clone()])
            .unwrap();
        let second = generate(&quote, &[item], &[product], &[template]).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.part_name, b.part_name);
            assert_eq!(a.cut_width, b.cut_width);
            assert_eq!(a.cut_height, b.cut_height);
            assert_eq!(a.thickness, b.thickness);
            assert_eq!(a.quantity, b.quantity);
        }
    }

    #[test]
    fn test_missing_product_is_an_error() {
        let quote = draft();
        let product = Product::new("Vanity", PricingModel::PerUnit, 8000.0);
        let item = item_for(&quote, &product, 1);

        let err = generate(&quote, &[item], &[], &[]).unwrap_err();
        assert!(matches!(err, CutlistError::ProductNotFound(_)));
    }
}
