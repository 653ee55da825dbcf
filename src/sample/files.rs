use std::path::{Path, PathBuf};
use bson::{Bson, Document};
use indexmap::IndexMap;
use serde_json::Value;
use crate::error::SampleError;
use super::Sampler;

/// Offline source: JSON / NDJSON files of MongoDB Extended JSON documents.
///
/// Each file stem names a collection; files sharing a stem are concatenated.
/// A file holds one document, an array of documents, or (NDJSON) one
/// document per line.
#[derive(Debug, Default)]
pub struct FileSampler {
    collections: IndexMap<String, Vec<Document>>,
}

#[derive(Debug, Clone, Default)]
pub struct FileOptions {
    /// Treat every file as newline-delimited JSON.
    pub ndjson: bool,
    /// jq filter applied to each parsed JSON value.
    pub jq_expr: Option<String>,
}

impl FileSampler {
    /// Load every file matched by `patterns` (literal paths or globs).
    pub fn load<I>(patterns: I, options: &FileOptions) -> Result<Self, SampleError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut sampler = Self::default();
        for path in resolve_file_path_patterns(patterns)? {
            sampler.load_file(&path, options)?;
        }
        Ok(sampler)
    }

    pub fn insert(&mut self, collection: &str, docs: Vec<Document>) {
        self.collections.entry(collection.to_owned()).or_default().extend(docs);
    }

    fn load_file(&mut self, path: &Path, options: &FileOptions) -> Result<(), SampleError> {
        let source = std::fs::read_to_string(path)
            .map_err(|source| SampleError::Read { path: path.to_owned(), source })?;
        let parse_err = |message: String| SampleError::Parse { path: path.to_owned(), message };

        let ndjson = options.ndjson
            || matches!(path.extension().and_then(|e| e.to_str()), Some("ndjson" | "jsonl"));
        let values = if ndjson {
            source.lines()
                .filter(|line| !line.trim().is_empty())
                .map(serde_json::from_str::<Value>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| parse_err(e.to_string()))?
        } else {
            vec![serde_json::from_str::<Value>(&source).map_err(|e| parse_err(e.to_string()))?]
        };

        let values = match options.jq_expr.as_deref() {
            None => values,
            Some(expr) => {
                let mut out = Vec::new();
                for value in &values {
                    out.extend(crate::jq_exec::filter_documents(expr, value)?);
                }
                out
            }
        };

        let mut docs = Vec::new();
        for value in values {
            match value {
                // a top-level array is a list of documents
                Value::Array(items) => {
                    for item in items {
                        docs.push(to_document(item).map_err(&parse_err)?);
                    }
                }
                other => docs.push(to_document(other).map_err(&parse_err)?),
            }
        }

        let collection = collection_name(path);
        tracing::debug!(path = %path.display(), %collection, documents = docs.len(), "loaded documents");
        self.insert(&collection, docs);
        Ok(())
    }
}

impl Sampler for FileSampler {
    fn list_collections(&self) -> Result<Vec<String>, SampleError> {
        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn sample(&self, collection: &str, sample_size: usize) -> Result<Vec<Document>, SampleError> {
        let docs = self.collections
            .get(collection)
            .ok_or_else(|| SampleError::UnknownCollection(collection.to_owned()))?;
        Ok(docs.iter().take(sample_size).cloned().collect())
    }
}

fn collection_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extended JSON (`{"$oid": …}`, `{"$date": …}`, …) → BSON document.
fn to_document(value: Value) -> Result<Document, String> {
    match Bson::try_from(value).map_err(|e| e.to_string())? {
        Bson::Document(doc) => Ok(doc),
        other => Err(format!("expected a document, found {:?}", other.element_type())),
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, SampleError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let entries = glob::glob(pattern).map_err(|e| SampleError::Pattern(e.to_string()))?;
        let before = out.len();
        for entry in entries {
            out.push(entry.map_err(|e| SampleError::Pattern(e.to_string()))?);
        }
        if out.len() == before {
            return Err(SampleError::Pattern(format!("glob pattern matched no files: {pattern}")));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::TypeTag;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_arrays_ndjson_and_extended_json() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "users.json", r#"[
            {"_id": {"$oid": "507f1f77bcf86cd799439011"}, "name": "a"},
            {"_id": {"$oid": "507f1f77bcf86cd799439012"}, "name": "b"}
        ]"#);
        write(dir.path(), "events.ndjson", "{\"n\": 1}\n\n{\"n\": 2.5}\n");

        let pattern = format!("{}/*", dir.path().display());
        let sampler = FileSampler::load([pattern], &FileOptions::default()).unwrap();
        assert_eq!(sampler.list_collections().unwrap(), ["events", "users"]);

        let users = sampler.sample("users", 100).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(crate::inference::classify(users[0].get("_id").unwrap()), TypeTag::ObjectId);

        assert_eq!(sampler.sample("events", 1).unwrap().len(), 1);
        assert!(matches!(sampler.sample("nope", 1), Err(SampleError::UnknownCollection(_))));
    }

    #[test]
    fn jq_filter_selects_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "orders.json", r#"{"data": {"items": [{"a": 1}, {"a": 2}, {"a": 3}]}}"#);
        let options = FileOptions { jq_expr: Some(".data.items[]".into()), ..FileOptions::default() };
        let sampler = FileSampler::load([path.to_string_lossy()], &options).unwrap();
        assert_eq!(sampler.sample("orders", 10).unwrap().len(), 3);
    }

    #[test]
    fn scalars_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", "[1, 2]");
        let err = FileSampler::load([path.to_string_lossy()], &FileOptions::default()).unwrap_err();
        assert!(matches!(err, SampleError::Parse { .. }));
    }

    #[test]
    fn unmatched_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        let err = FileSampler::load([pattern], &FileOptions::default()).unwrap_err();
        assert!(matches!(err, SampleError::Pattern(_)));
    }
}
