//! Pricing engine - maps product pricing models onto item dimensions
//!
//! Dimensions are in mm. A model that needs a dimension the item does
//! not carry is an error, not a silent zero.

use thiserror::Error;

use crate::entities::product::{PricingModel, Product};

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("pricing model {model} requires {field}")]
    MissingDimension {
        model: &'static str,
        field: &'static str,
    },
}

/// Compute the price for `quantity` units of `product` at the given
/// dimensions
pub fn compute(
    product: &Product,
    quantity: u32,
    height: Option<f64>,
    width: Option<f64>,
    depth: Option<f64>,
) -> Result<f64, PricingError> {
    let rate = product.unit_rate;
    let qty = quantity as f64;

    let require = |field: &'static str, value: Option<f64>| {
        value.ok_or(PricingError::MissingDimension {
            model: product.pricing_model.as_str(),
            field,
        })
    };

    match product.pricing_model {
        PricingModel::PerUnit => Ok(rate * qty),
        PricingModel::RunningFt => {
            let w = require("width", width)?;
            Ok(rate * w * qty)
        }
        PricingModel::Area => {
            let h = require("height", height)?;
            let w = require("width", width)?;
            Ok(rate * h * w * qty)
        }
        PricingModel::Volume => {
            let h = require("height", height)?;
            let w = require("width", width)?;
            let d = require("depth", depth)?;
            Ok(rate * h * w * d * qty)
        }
    }
}
