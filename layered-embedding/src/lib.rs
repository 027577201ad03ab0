#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Word embedding store for layered-centering.
//!
//! - [`EmbeddingStore`] - lookup seam used by the bridging resolver
//! - [`VectorTable`] - in-memory word2vec table with nearest-neighbour search
//! - [`cosine_distance`] - `1 - cos`, undefined for degenerate vectors

mod errors;
mod store;
mod table;

pub use errors::{EmbeddingError, EmbeddingResult};
pub use store::{cosine_distance, EmbeddingStore};
pub use table::VectorTable;
