use serde::{Deserialize, Serialize};

/// Word-window geometry for one side of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkWindow {
    pub max_words: usize,
    pub overlap: usize,
}

impl ChunkWindow {
    pub const fn new(max_words: usize, overlap: usize) -> Self {
        Self { max_words, overlap }
    }

    /// Resume side: 90-word windows overlapping by 20.
    pub const fn resume() -> Self {
        Self::new(90, 20)
    }

    /// Job-description side: 60-word windows overlapping by 10.
    pub const fn job_description() -> Self {
        Self::new(60, 10)
    }

    /// Requires `0 <= overlap < max_words`.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_words == 0 {
            return Err("chunk max_words must be at least 1".to_string());
        }
        if self.overlap >= self.max_words {
            return Err(format!(
                "chunk overlap ({}) must be smaller than max_words ({})",
                self.overlap, self.max_words
            ));
        }
        Ok(())
    }

    fn step(&self) -> usize {
        // Forced forward progress when the window was never validated.
        self.max_words.saturating_sub(self.overlap).max(1)
    }
}

/// Splits `text` on whitespace into windows of `max_words` words, advancing
/// by `max_words - overlap` each time until the window start passes the end.
///
/// Blank input yields no chunks; any other input yields at least one, and
/// never more than `ceil(word_count / step)`.
pub fn chunk_text(text: &str, window: ChunkWindow) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let width = window.max_words.max(1);
    let step = window.step();

    let mut chunks = Vec::with_capacity(words.len().div_ceil(step));
    let mut start = 0;
    while start < words.len() {
        let end = (start + width).min(words.len());
        chunks.push(words[start..end].join(" "));
        start += step;
    }
    chunks
}
