//! Material estimation - whole-sheet count and offcut wastage
//!
//! Works from panel face areas against a standard 8x4 ft sheet
//! (2440 x 1220 mm). Thickness and material grouping are ignored for
//! now; the estimate is a purchasing ballpark, not a nesting plan.

use crate::core::identity::EntityId;
use crate::entities::cutlist::{CutlistItem, MaterialSummary};

/// Standard sheet height in mm (8 ft)
pub const SHEET_HEIGHT_MM: f64 = 2440.0;

/// Standard sheet width in mm (4 ft)
pub const SHEET_WIDTH_MM: f64 = 1220.0;

/// Estimate sheet usage for a quotation's cutlist.
///
/// An empty cutlist yields zero sheets and zero wastage. Wastage is
/// the offcut share of purchased sheet area and always lands in
/// `[0, 100)`.
pub fn summarize(quote_id: EntityId, items: &[CutlistItem]) -> MaterialSummary {
    let sheet_area = SHEET_HEIGHT_MM * SHEET_WIDTH_MM;

    // an empty sum is -0.0; normalize the sign
    let total: f64 = items.iter().map(|i| i.total_area_mm2()).sum::<f64>() + 0.0;

    let sheet_count = (total / sheet_area).ceil() as u64;
    let wastage_percent = if sheet_count > 0 {
        let purchased = sheet_count as f64 * sheet_area;
        // next_down, not EPSILON: the ULP gap at 100.0 is wider than EPSILON
        (((purchased - total) / purchased) * 100.0).clamp(0.0, 100.0_f64.next_down())
    } else {
        0.0
    };

    MaterialSummary {
        quote_id,
        total_part_area_mm2: total,
        sheet_area_mm2: sheet_area,
        sheet_count,
        wastage_percent,
    }
}
