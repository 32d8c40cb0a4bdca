pub(crate) mod chunking;
pub(crate) mod index_file_chunks;
pub(crate) mod retrieve_similar_chunks;

pub use chunking::split_into_chunks;
pub use index_file_chunks::IndexFileChunksInterface;
pub use retrieve_similar_chunks::RetrieveSimilarChunksInterface;

#[cfg(any(test, feature = "testkit"))]
pub use self::{
    index_file_chunks::MockIndexFileChunksInterface,
    retrieve_similar_chunks::MockRetrieveSimilarChunksInterface,
};
