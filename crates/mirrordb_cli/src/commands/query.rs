//! Query command implementation.

use super::parse_criteria;
use mirrordb_core::{Context, Entity, EvictionConfig, ProxyStore, Repository, StoreConfig};
use mirrordb_document::{Doc, Document, DocumentCollection, DocumentCompiler, DocumentRepository};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Loads the documents in `path` behind a proxy store and returns those
/// matching `criteria`, served from the local mirror.
pub fn execute(
    path: &Path,
    criteria: &str,
    capacity: Option<usize>,
) -> Result<Vec<Document>, Box<dyn std::error::Error>> {
    let criteria = parse_criteria(criteria)?;
    // reject names no document field can carry before evaluating
    DocumentCompiler.compile::<Document>(&criteria)?;

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let documents: Vec<Doc> = serde_json::from_str(&contents)
        .map_err(|e| format!("{} is not a JSON array of objects: {e}", path.display()))?;

    let collection = DocumentCollection::with_documents("documents", documents)?;
    debug!(documents = collection.len(), "collection ready");

    let eviction = capacity.map_or(EvictionConfig::Unbounded, EvictionConfig::Mru);
    let mut store: ProxyStore<Document> =
        ProxyStore::with_config(StoreConfig::new().cache_eviction(eviction));
    let ctx = Context::new();
    store.load(&ctx, Arc::new(DocumentRepository::<Document>::new(collection)))?;

    Ok(store.match_all(&ctx, &criteria)?)
}

/// Runs the query command.
pub fn run(
    path: &Path,
    criteria: &str,
    capacity: Option<usize>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let matches = execute(path, criteria, capacity)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&matches)?),
        _ => {
            for document in &matches {
                println!(
                    "{}\t{}",
                    document.id(),
                    serde_json::to_string(document.fields())?
                );
            }
            println!("{} matching document(s)", matches.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn documents() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"_id": "a", "name": "ann", "age": 30}},
                {{"_id": "b", "name": "bob", "age": 12}},
                {{"name": "cyd", "age": 41}}
            ]"#
        )
        .unwrap();
        file
    }

    fn ids(found: &[Document]) -> Vec<String> {
        found.iter().map(|d| d.id().to_string()).collect()
    }

    #[test]
    fn matches_loaded_documents() {
        let file = documents();
        let found = execute(
            file.path(),
            r#"{"attr": {"name": "Age", "value": 18, "comparison": "gte"}}"#,
            None,
        )
        .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id().as_str(), "a");
        // the third document got a backend id
        assert!(!found[1].id().is_empty());
        assert_eq!(found[1].get("name"), Some(&serde_json::json!("cyd")));
    }

    #[test]
    fn capacity_bounds_the_mirror() {
        let file = documents();
        let found = execute(file.path(), r#"{"and": []}"#, Some(2)).unwrap();
        assert_eq!(found.len(), 2);
        assert!(!ids(&found).contains(&"a".to_string()));
    }

    #[test]
    fn rejects_unusable_input() {
        let file = documents();
        assert!(execute(file.path(), r#"{"attr": {"name": "age", "value": 1}}"#, None).is_err());

        let mut bad = NamedTempFile::new().unwrap();
        write!(bad, r#"{{"not": "an array"}}"#).unwrap();
        let err = execute(bad.path(), r#"{"and": []}"#, None).unwrap_err();
        assert!(err.to_string().contains("is not a JSON array"));

        let missing = file.path().with_extension("missing");
        assert!(execute(&missing, r#"{"and": []}"#, None).is_err());
    }
}
