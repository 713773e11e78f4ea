//! Cross-location inventory count analysis: which parts have inconsistent
//! counts across branches, and how inconsistent.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
