//! # palaver-shared
//!
//! Data model, identifiers and display helpers shared by every Palaver crate.

pub mod constants;
pub mod models;
pub mod time;
pub mod types;

pub use models::*;
pub use types::*;
