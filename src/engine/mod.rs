//! Derivation engines - expressions, pricing, templates, cutlists and
//! material estimates

pub mod cutlist;
pub mod expr;
pub mod material;
pub mod pricing;
pub mod quotation;
pub mod template;

pub use cutlist::CutlistError;
pub use expr::ExprError;
pub use pricing::PricingError;
pub use quotation::{ItemSpec, QuoteError, RecalcReport};
pub use template::TemplateEngineError;
