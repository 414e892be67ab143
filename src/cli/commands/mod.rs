//! Command implementations

pub mod area;
pub mod client;
pub mod completions;
pub mod cutlist;
pub mod init;
pub mod item;
pub mod material;
pub mod product;
pub mod project;
pub mod quote;
pub mod template;
pub mod wizard;
