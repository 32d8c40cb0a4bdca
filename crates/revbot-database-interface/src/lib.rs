mod errors;
mod interface;

pub use errors::{DatabaseError, Result};
pub use interface::{DbService, SimilarChunk};
