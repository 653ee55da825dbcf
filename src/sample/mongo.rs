use bson::{doc, Document};
use mongodb::sync::{Client, Database};
use crate::error::SampleError;
use super::Sampler;

/// Samples a live database with the `$sample` aggregation stage.
pub struct MongoSampler {
    db: Database,
}

impl MongoSampler {
    /// Connect and `ping` so a bad URI fails here rather than mid-run.
    pub fn connect(uri: &str, db_name: &str) -> Result<Self, SampleError> {
        let connect_err = |source| SampleError::Connect { uri: uri.to_owned(), source };
        let client = Client::with_uri_str(uri).map_err(connect_err)?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }, None).map_err(connect_err)?;
        tracing::info!(uri, db = db_name, "connected to MongoDB");
        Ok(Self { db })
    }
}

impl Sampler for MongoSampler {
    fn list_collections(&self) -> Result<Vec<String>, SampleError> {
        let mut names = self.db
            .list_collection_names(None)
            .map_err(SampleError::ListCollections)?;
        names.retain(|name| !name.starts_with("system."));
        names.sort();
        Ok(names)
    }

    fn sample(&self, collection: &str, sample_size: usize) -> Result<Vec<Document>, SampleError> {
        let query_err = |source| SampleError::Query { collection: collection.to_owned(), source };
        let size = i64::try_from(sample_size).unwrap_or(i64::MAX);
        let pipeline = [doc! { "$sample": { "size": size } }];
        let cursor = self.db
            .collection::<Document>(collection)
            .aggregate(pipeline, None)
            .map_err(query_err)?;
        let docs = cursor.collect::<Result<Vec<_>, _>>().map_err(query_err)?;
        tracing::debug!(collection, sampled = docs.len(), "sampled documents");
        Ok(docs)
    }
}
