//! fitq: Fitout Quote Toolkit
//!
//! A Unix-style toolkit for walking an interior fit-out project from client
//! intake to quotation, cutlist and sheet-material estimate, with every
//! entity stored as a plain text file under version control.

pub mod cli;
pub mod core;
pub mod engine;
pub mod entities;
