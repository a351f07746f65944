//! Compile command implementation.

use super::parse_criteria;
use mirrordb_document::{Document, DocumentCompiler};
use serde_json::Value as Json;

/// Compiles `criteria` for schemaless documents and returns the filter.
pub fn compile(criteria: &str) -> Result<Json, Box<dyn std::error::Error>> {
    let criteria = parse_criteria(criteria)?;
    let filter = DocumentCompiler.compile::<Document>(&criteria)?;
    Ok(filter.to_json())
}

/// Runs the compile command.
pub fn run(criteria: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = compile(criteria)?;
    println!("{}", serde_json::to_string_pretty(&filter)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compiles_capitalized_names_to_keys() {
        let filter = compile(
            r#"{"and": [
                {"attr": {"name": "Age", "value": 18, "comparison": "gte"}},
                {"not": {"attr": {"name": "Status", "value": "banned"}}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            filter,
            json!({"$and": [
                {"age": {"$gte": 18}},
                {"$not": {"status": {"$eq": "banned"}}}
            ]})
        );
    }

    #[test]
    fn id_maps_to_id_key() {
        let filter = compile(r#"{"attr": {"name": "Id", "value": "x1"}}"#).unwrap();
        assert_eq!(filter, json!({"_id": {"$eq": "x1"}}));
    }

    #[test]
    fn rejects_malformed_criteria() {
        let err = compile(r#"{"xor": []}"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid criteria"));
    }

    #[test]
    fn rejects_lowercase_names() {
        assert!(compile(r#"{"attr": {"name": "age", "value": 1}}"#).is_err());
    }
}
