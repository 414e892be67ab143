//! Entity type definitions

pub mod area;
pub mod catalog;
pub mod client;
pub mod cutlist;
pub mod product;
pub mod project;
pub mod quote;
pub mod template;

use thiserror::Error;

/// Validation errors raised before any store or workspace mutation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{entity} {field} must not be empty")]
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity} {field} must not be negative")]
    NegativeValue {
        entity: &'static str,
        field: &'static str,
    },

    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,

    #[error("{0}")]
    Invalid(String),
}
