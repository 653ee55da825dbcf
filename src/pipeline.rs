//! sample → infer → name → render, for one or many collections.
use rayon::prelude::*;
use crate::error::SampleError;
use crate::inference::{SchemaBuilder, SchemaNode};
use crate::ir::GeneratedType;
use crate::sample::Sampler;

/// The inferred root schema of one collection.
#[derive(Debug, Clone)]
pub struct CollectionSchema {
    pub collection: String,
    pub root: SchemaNode,
}

impl CollectionSchema {
    pub fn documents(&self) -> u64 { self.root.observed }
}

/// Sample one collection and fold it into a schema. Zero documents is not an
/// error: the result is an empty node.
pub fn infer_collection<S>(sampler: &S, collection: &str, sample_size: usize) -> Result<CollectionSchema, SampleError>
where
    S: Sampler + ?Sized,
{
    let docs = sampler.sample(collection, sample_size)?;
    let mut builder = SchemaBuilder::new();
    for doc in &docs {
        builder.observe(doc);
    }
    if builder.documents() == 0 {
        tracing::warn!(collection, "no documents sampled; emitting an empty type");
    }
    Ok(CollectionSchema { collection: collection.to_owned(), root: builder.finish() })
}

/// Infer several collections in parallel, each with its own accumulator.
/// Results keep the order of `collections`.
pub fn infer_collections<S>(sampler: &S, collections: &[String], sample_size: usize) -> Vec<Result<CollectionSchema, SampleError>>
where
    S: Sampler + ?Sized,
{
    collections
        .par_iter()
        .map(|name| infer_collection(sampler, name, sample_size))
        .collect()
}

/// Name and lower a run's schemas into declarations, nested-before-parent.
pub fn generate(schemas: &[CollectionSchema]) -> Vec<GeneratedType> {
    crate::lower::lower_collections(
        schemas.iter().map(|s| (s.collection.as_str(), &s.root))
    )
}

pub fn render(schemas: &[CollectionSchema]) -> String {
    crate::codegen::render_module(&generate(schemas))
}
