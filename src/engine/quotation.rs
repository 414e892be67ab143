//! Quotation workflow - draft lifecycle, item mutation and totals
//!
//! Mutations guard the draft state, validate their payload, persist
//! the item, then recalculate the quotation total as the sum of stored
//! item prices. A failed recalculation of one item leaves that item's
//! stored price untouched and is reported, not fatal.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::workspace::{Workspace, WorkspaceError};
use crate::entities::product::Product;
use crate::entities::quote::{QuoteItem, QuoteStatus, Quotation};
use crate::entities::template::ProductTemplate;
use crate::entities::ValidationError;
use crate::engine::pricing::{self, PricingError};

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("cannot modify a {status} quotation; only drafts are editable")]
    NotEditable { status: QuoteStatus },

    #[error("cannot move quotation from {from} to {to}")]
    InvalidTransition { from: QuoteStatus, to: QuoteStatus },

    #[error("quote item {item} does not belong to quotation {quote}")]
    ForeignItem { item: EntityId, quote: EntityId },

    #[error("product has no template; parameter '{0}' is meaningless here")]
    NoTemplateForParams(String),

    #[error("unknown template parameter '{0}'")]
    UnknownTemplateParam(String),

    #[error("parameter '{name}' value {value} is outside [{min}, {max}]")]
    ParamOutOfBounds {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

/// Payload for adding or updating a quote item
#[derive(Debug, Default, Clone)]
pub struct ItemSpec {
    pub quantity: Option<u32>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub depth: Option<f64>,
    pub notes: Option<String>,
    pub template_params: Option<BTreeMap<String, f64>>,
}

/// Per-item failures collected during a recalculation pass
#[derive(Debug)]
pub struct RecalcReport {
    pub total_price: f64,
    pub errors: Vec<(EntityId, String)>,
}

/// Return the project's open draft, or create the next version.
///
/// At most one draft exists per project; calling this twice without a
/// submit in between returns the same quotation.
pub fn load_or_create_draft(
    ws: &Workspace,
    project: &EntityId,
    currency: &str,
) -> Result<Quotation, QuoteError> {
    let quotes: Vec<Quotation> = ws.load_all(EntityPrefix::Quot)?;
    let for_project: Vec<&Quotation> = quotes.iter().filter(|q| &q.project == project).collect();

    if let Some(draft) = for_project
        .iter()
        .find(|q| q.status == QuoteStatus::Draft)
    {
        return Ok((*draft).clone());
    }

    let next_version = for_project
        .iter()
        .map(|q| q.version_no)
        .max()
        .unwrap_or(0)
        + 1;
    let quote = Quotation::new(project.clone(), next_version, currency);
    ws.save(&quote)?;
    Ok(quote)
}

/// All quotations for a project, newest version first
pub fn list_by_project(
    ws: &Workspace,
    project: &EntityId,
) -> Result<Vec<Quotation>, QuoteError> {
    let mut quotes: Vec<Quotation> = ws
        .load_all(EntityPrefix::Quot)?
        .into_iter()
        .filter(|q: &Quotation| &q.project == project)
        .collect();
    quotes.sort_by(|a, b| b.version_no.cmp(&a.version_no));
    Ok(quotes)
}

/// All items belonging to a quotation
pub fn list_items(ws: &Workspace, quote_id: &EntityId) -> Result<Vec<QuoteItem>, QuoteError> {
    let items: Vec<QuoteItem> = ws.load_all(EntityPrefix::Item)?;
    Ok(items
        .into_iter()
        .filter(|i| &i.quotation == quote_id)
        .collect())
}

/// Items grouped by area, areas in first-seen order
pub fn group_by_area(items: &[QuoteItem]) -> Vec<(EntityId, Vec<&QuoteItem>)> {
    let mut groups: Vec<(EntityId, Vec<&QuoteItem>)> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|(area, _)| area == &item.area) {
            Some((_, bucket)) => bucket.push(item),
            None => groups.push((item.area.clone(), vec![item])),
        }
    }
    groups
}

fn ensure_editable(quote: &Quotation) -> Result<(), QuoteError> {
    if !quote.status.is_editable() {
        return Err(QuoteError::NotEditable {
            status: quote.status,
        });
    }
    Ok(())
}

fn check_template_params(
    params: &BTreeMap<String, f64>,
    template: Option<&ProductTemplate>,
) -> Result<(), QuoteError> {
    if params.is_empty() {
        return Ok(());
    }
    let template = match template {
        Some(t) => t,
        None => {
            let first = params.keys().next().cloned().unwrap_or_default();
            return Err(QuoteError::NoTemplateForParams(first));
        }
    };
    for (name, value) in params {
        let param = template
            .param(name)
            .ok_or_else(|| QuoteError::UnknownTemplateParam(name.clone()))?;
        let min = param.min_value.unwrap_or(f64::NEG_INFINITY);
        let max = param.max_value.unwrap_or(f64::INFINITY);
        if *value < min || *value > max {
            return Err(QuoteError::ParamOutOfBounds {
                name: name.clone(),
                value: *value,
                min,
                max,
            });
        }
    }
    Ok(())
}

fn load_template_for(
    ws: &Workspace,
    product: &Product,
) -> Result<Option<ProductTemplate>, QuoteError> {
    match &product.template {
        Some(id) => Ok(Some(ws.load(id)?)),
        None => Ok(None),
    }
}

/// Add an item to a draft quotation and refresh the total
pub fn add_item(
    ws: &Workspace,
    quote: &Quotation,
    area: &EntityId,
    product: &Product,
    spec: ItemSpec,
) -> Result<QuoteItem, QuoteError> {
    ensure_editable(quote)?;

    let mut item = QuoteItem::new(
        quote.id.clone(),
        area.clone(),
        product.id.clone(),
        spec.quantity.unwrap_or(1),
    );
    item.height = spec.height;
    item.width = spec.width;
    item.depth = spec.depth;
    item.notes = spec.notes;
    if let Some(params) = spec.template_params {
        item.template_params = params;
    }
    item.validate()?;

    let template = load_template_for(ws, product)?;
    check_template_params(&item.template_params, template.as_ref())?;

    item.computed_price =
        pricing::compute(product, item.quantity, item.height, item.width, item.depth)?;

    ws.save(&item)?;
    recalc_total(ws, &quote.id)?;
    Ok(item)
}

/// Update an existing item in place and refresh the total.
///
/// Absent spec fields keep their current values; dimensions given as
/// `Some` replace, so clearing a dimension means re-adding the item.
pub fn update_item(
    ws: &Workspace,
    quote: &Quotation,
    item_id: &EntityId,
    spec: ItemSpec,
) -> Result<QuoteItem, QuoteError> {
    ensure_editable(quote)?;

    let mut item: QuoteItem = ws.load(item_id)?;
    if item.quotation != quote.id {
        return Err(QuoteError::ForeignItem {
            item: item_id.clone(),
            quote: quote.id.clone(),
        });
    }

    if let Some(q) = spec.quantity {
        item.quantity = q;
    }
    if spec.height.is_some() {
        item.height = spec.height;
    }
    if spec.width.is_some() {
        item.width = spec.width;
    }
    if spec.depth.is_some() {
        item.depth = spec.depth;
    }
    if spec.notes.is_some() {
        item.notes = spec.notes;
    }
    if let Some(params) = spec.template_params {
        item.template_params = params;
    }
    item.validate()?;

    let product: Product = ws.load(&item.product)?;
    let template = load_template_for(ws, &product)?;
    check_template_params(&item.template_params, template.as_ref())?;

    item.computed_price =
        pricing::compute(&product, item.quantity, item.height, item.width, item.depth)?;

    ws.save(&item)?;
    recalc_total(ws, &quote.id)?;
    Ok(item)
}

/// Remove an item from a draft quotation and refresh the total
pub fn delete_item(
    ws: &Workspace,
    quote: &Quotation,
    item_id: &EntityId,
) -> Result<(), QuoteError> {
    ensure_editable(quote)?;

    let item: QuoteItem = ws.load(item_id)?;
    if item.quotation != quote.id {
        return Err(QuoteError::ForeignItem {
            item: item_id.clone(),
            quote: quote.id.clone(),
        });
    }

    ws.delete(item_id)?;
    recalc_total(ws, &quote.id)?;
    Ok(())
}

/// Recompute the quotation total as the sum of stored item prices
pub fn recalc_total(ws: &Workspace, quote_id: &EntityId) -> Result<f64, QuoteError> {
    let items = list_items(ws, quote_id)?;
    // an empty sum is -0.0; normalize the sign
    let total: f64 = items.iter().map(|i| i.computed_price).sum::<f64>() + 0.0;

    let mut quote: Quotation = ws.load(quote_id)?;
    quote.total_price = total;
    ws.save(&quote)?;
    Ok(total)
}

/// Reprice every item from the current catalog, then refresh the
/// total. Items whose repricing fails keep their stored price and are
/// reported in the result.
pub fn recalc(ws: &Workspace, quote_id: &EntityId) -> Result<RecalcReport, QuoteError> {
    let items = list_items(ws, quote_id)?;
    let mut errors = Vec::new();

    for mut item in items {
        let product: Product = match ws.load(&item.product) {
            Ok(p) => p,
            Err(e) => {
                errors.push((item.id.clone(), e.to_string()));
                continue;
            }
        };
        match pricing::compute(&product, item.quantity, item.height, item.width, item.depth) {
            Ok(price) => {
                item.computed_price = price;
                ws.save(&item)?;
            }
            Err(e) => errors.push((item.id.clone(), e.to_string())),
        }
    }

    let total_price = recalc_total(ws, quote_id)?;
    Ok(RecalcReport {
        total_price,
        errors,
    })
}

/// Move a draft to SUBMITTED; any other starting state is an error
pub fn submit(ws: &Workspace, quote_id: &EntityId) -> Result<Quotation, QuoteError> {
    let mut quote: Quotation = ws.load(quote_id)?;
    transition(ws, &mut quote, QuoteStatus::Submitted)?;
    Ok(quote)
}

/// Apply a guarded status transition and persist it
pub fn transition(
    ws: &Workspace,
    quote: &mut Quotation,
    to: QuoteStatus,
) -> Result<(), QuoteError> {
    if !quote.status.can_transition(to) {
        return Err(QuoteError::InvalidTransition {
            from: quote.status,
            to,
        });
    }
    quote.status = to;
    ws.save(quote)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::area::Area;
    use crate::entities::catalog;
    use crate::entities::client::Client;
    use crate::entities::product::PricingModel;
    use crate::entities::project::Project;
    use tempfile::tempdir;

    struct Fixture {
        _tmp: tempfile::TempDir,
        ws: Workspace,
        project: Project,
        area: Area,
        product: Product,
    }

    fn fixture() -> Fixture {
        let tmp = tempdir().unwrap();
        let ws = Workspace::init(tmp.path()).unwrap();

        let client = Client::new("Asha Rao", "9876543210");
        ws.save(&client).unwrap();
        let project = Project::new("3BHK Renovation", client.id.clone());
        ws.save(&project).unwrap();
        let area = Area::new("Kitchen", "kitchen", project.id.clone());
        ws.save(&area).unwrap();
        let product = Product::new("TV Unit Base", PricingModel::PerUnit, 15000.0);
        ws.save(&product).unwrap();

        Fixture {
            _tmp: tmp,
            ws,
            project,
            area,
            product,
        }
    }

    #[test]
    fn test_draft_is_reused_not_duplicated() {
        let f = fixture();
        let first = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        let second = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.version_no, 1);
    }

    #[test]
    fn test_submit_then_new_draft_bumps_version() {
        let f = fixture();
        let first = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        submit(&f.ws, &first.id).unwrap();

        let second = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.version_no, 2);
    }

    #[test]
    fn test_add_item_updates_total() {
        let f = fixture();
        let quote = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();

        let spec = ItemSpec {
            quantity: Some(2),
            ..Default::default()
        };
        let item = add_item(&f.ws, &quote, &f.area.id, &f.product, spec).unwrap();
        assert_eq!(item.computed_price, 30000.0);

        let stored: Quotation = f.ws.load(&quote.id).unwrap();
        assert_eq!(stored.total_price, 30000.0);
    }

    #[test]
    fn test_delete_item_updates_total() {
        let f = fixture();
        let quote = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        let item = add_item(&f.ws, &quote, &f.area.id, &f.product, ItemSpec::default()).unwrap();

        delete_item(&f.ws, &quote, &item.id).unwrap();
        let stored: Quotation = f.ws.load(&quote.id).unwrap();
        assert_eq!(stored.total_price, 0.0);
        assert!(list_items(&f.ws, &quote.id).unwrap().is_empty());
    }

    #[test]
    fn test_non_draft_rejects_mutation() {
        let f = fixture();
        let quote = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        let submitted = submit(&f.ws, &quote.id).unwrap();

        let err =
            add_item(&f.ws, &submitted, &f.area.id, &f.product, ItemSpec::default()).unwrap_err();
        assert!(matches!(
            err,
            QuoteError::NotEditable {
                status: QuoteStatus::Submitted
            }
        ));
    }

    #[test]
    fn test_submit_twice_fails() {
        let f = fixture();
        let quote = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        submit(&f.ws, &quote.id).unwrap();

        let err = submit(&f.ws, &quote.id).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidTransition { .. }));
    }

    #[test]
    fn test_recalc_is_idempotent_and_sums_items() {
        let f = fixture();
        let quote = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        add_item(&f.ws, &quote, &f.area.id, &f.product, ItemSpec::default()).unwrap();
        let spec = ItemSpec {
            quantity: Some(3),
            ..Default::default()
        };
        add_item(&f.ws, &quote, &f.area.id, &f.product, spec).unwrap();

        let first = recalc(&f.ws, &quote.id).unwrap();
        let second = recalc(&f.ws, &quote.id).unwrap();
        assert_eq!(first.total_price, 60000.0);
        assert_eq!(second.total_price, 60000.0);
        assert!(first.errors.is_empty());
    }

    #[test]
    fn test_recalc_empty_quote_totals_zero() {
        let f = fixture();
        let quote = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        let report = recalc(&f.ws, &quote.id).unwrap();
        assert_eq!(report.total_price, 0.0);
        assert!(report.errors.is_empty());
        // Must not be the -0.0 summation identity, which prints "-0.00"
        assert!(report.total_price.is_sign_positive());
        assert_eq!(format!("{:.2}", report.total_price), "0.00");
    }

    #[test]
    fn test_recalc_picks_up_rate_changes() {
        let f = fixture();
        let quote = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        add_item(&f.ws, &quote, &f.area.id, &f.product, ItemSpec::default()).unwrap();

        let mut updated = f.product.clone();
        updated.unit_rate = 20000.0;
        f.ws.save(&updated).unwrap();

        let report = recalc(&f.ws, &quote.id).unwrap();
        assert_eq!(report.total_price, 20000.0);
    }

    #[test]
    fn test_template_param_bounds_checked_on_add() {
        let f = fixture();
        let quote = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();

        let template = catalog::kitchen_base();
        f.ws.save(&template).unwrap();
        let mut product = Product::new("Kitchen Base Cabinet", PricingModel::RunningFt, 50.0);
        product.template = Some(template.id.clone());
        f.ws.save(&product).unwrap();

        let mut params = BTreeMap::new();
        params.insert("SHELF_COUNT".to_string(), 9.0);
        let spec = ItemSpec {
            width: Some(600.0),
            template_params: Some(params),
            ..Default::default()
        };
        let err = add_item(&f.ws, &quote, &f.area.id, &product, spec).unwrap_err();
        assert!(matches!(err, QuoteError::ParamOutOfBounds { .. }));

        let mut params = BTreeMap::new();
        params.insert("NO_SUCH".to_string(), 1.0);
        let spec = ItemSpec {
            width: Some(600.0),
            template_params: Some(params),
            ..Default::default()
        };
        let err = add_item(&f.ws, &quote, &f.area.id, &product, spec).unwrap_err();
        assert!(matches!(err, QuoteError::UnknownTemplateParam(_)));
    }

    #[test]
    fn test_update_item_preserves_unset_fields() {
        let f = fixture();
        let quote = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        let spec = ItemSpec {
            quantity: Some(2),
            notes: Some("wall side".to_string()),
            ..Default::default()
        };
        let item = add_item(&f.ws, &quote, &f.area.id, &f.product, spec).unwrap();

        let update = ItemSpec {
            quantity: Some(4),
            ..Default::default()
        };
        let updated = update_item(&f.ws, &quote, &item.id, update).unwrap();
        assert_eq!(updated.quantity, 4);
        assert_eq!(updated.notes.as_deref(), Some("wall side"));
        assert_eq!(updated.computed_price, 60000.0);
    }

    #[test]
    fn test_group_by_area_first_seen_order() {
        let f = fixture();
        let quote = load_or_create_draft(&f.ws, &f.project.id, "INR").unwrap();
        let area_b = Area::new("Bedroom", "bedroom", f.project.id.clone());
        f.ws.save(&area_b).unwrap();

        let mk = |area: &EntityId| {
            let mut i = QuoteItem::new(quote.id.clone(), area.clone(), f.product.id.clone(), 1);
            i.computed_price = 1.0;
            i
        };
        let items = vec![mk(&f.area.id), mk(&area_b.id), mk(&f.area.id)];

        let groups = group_by_area(&items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, f.area.id);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, area_b.id);
    }
}
