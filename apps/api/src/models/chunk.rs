use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    JobDescription,
}

/// A word window of one document, identified by its document and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub source: DocumentKind,
    pub index: usize,
    pub text: String,
}

impl Chunk {
    pub fn from_windows(source: DocumentKind, windows: Vec<String>) -> Vec<Chunk> {
        windows
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk { source, index, text })
            .collect()
    }
}

/// One nearest resume chunk for one job-description chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalHit {
    pub jd_chunk: usize,
    pub resume_chunk: usize,
    pub distance: f32,
}

/// A retrieved pair after cross-encoder scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub jd_chunk: usize,
    pub resume_chunk: usize,
    pub score: f32,
}
