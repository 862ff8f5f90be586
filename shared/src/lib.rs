// Plain data models and formatting helpers used by the engine and its
// presentation layer.
pub mod models;
pub mod utils;
