//! Text preparation: whitespace canonicalization and word-window chunking.

pub mod chunker;
pub mod normalize;

pub use chunker::{chunk_text, ChunkWindow};
pub use normalize::normalize;
