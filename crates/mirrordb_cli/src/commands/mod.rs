//! CLI command implementations.

pub mod compile;
pub mod query;

use mirrordb_core::Criteria;

/// Parses a criteria from its JSON form.
pub fn parse_criteria(json: &str) -> Result<Criteria, Box<dyn std::error::Error>> {
    serde_json::from_str(json).map_err(|e| format!("invalid criteria: {e}").into())
}
