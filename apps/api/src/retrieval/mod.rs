//! Nearest-neighbour retrieval over per-invocation chunk embeddings.

pub mod index;

pub use index::{FlatIndex, IndexError};
