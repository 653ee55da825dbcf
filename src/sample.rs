//! Document sources. The inference core only sees `bson::Document`s.
pub mod files;
pub mod mongo;

use bson::Document;
use crate::error::SampleError;

pub use files::FileSampler;
pub use mongo::MongoSampler;

/// Yields a bounded sample of documents per collection.
///
/// Implementations are `Sync` so several collections can be sampled at once.
pub trait Sampler: Sync {
    /// Collection names, sorted.
    fn list_collections(&self) -> Result<Vec<String>, SampleError>;

    /// At most `sample_size` documents of `collection`, in any order.
    fn sample(&self, collection: &str, sample_size: usize) -> Result<Vec<Document>, SampleError>;
}
