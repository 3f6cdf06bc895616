//! Document-to-text collaborator. Scoring only ever sees the plain text this
//! produces; OCR of scanned documents is not attempted.

use std::path::Path;

use thiserror::Error;

/// Upload size ceiling for a single resume file.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("No extractable text in {0}")]
    Empty(String),
}

/// Turns an uploaded file into plain text. Blocking; run off the async runtime.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Handles PDF (embedded text layer) and plain-text uploads. Word documents
/// are rejected as unsupported.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
        if bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(ExtractionError::TooLarge {
                size: bytes.len(),
                limit: MAX_DOCUMENT_BYTES,
            });
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let text = match extension.as_str() {
            "pdf" => pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?,
            "txt" | "md" => String::from_utf8_lossy(bytes).into_owned(),
            other => return Err(ExtractionError::UnsupportedFormat(format!(".{other}"))),
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::Empty(file_name.to_string()));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_plain_text_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "Jane Doe\nRust engineer, 6 years").unwrap();
        let bytes = std::fs::read(file.path()).unwrap();
        let name = file.path().file_name().unwrap().to_str().unwrap().to_string();

        let text = DocumentExtractor.extract(&name, &bytes).unwrap();
        assert!(text.contains("Rust engineer"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(DocumentExtractor.extract("CV.TXT", b"hello world").is_ok());
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let text = DocumentExtractor.extract("cv.txt", b"Rust \xff engineer").unwrap();
        assert!(text.starts_with("Rust "));
    }

    #[test]
    fn test_docx_is_not_extracted() {
        let err = DocumentExtractor.extract("cv.docx", b"PK..").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ext) if ext == ".docx"));
    }

    #[test]
    fn test_blank_text_is_empty_error() {
        assert!(matches!(
            DocumentExtractor.extract("cv.txt", b"  \n "),
            Err(ExtractionError::Empty(_))
        ));
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let big = vec![b'a'; MAX_DOCUMENT_BYTES + 1];
        assert!(matches!(
            DocumentExtractor.extract("cv.txt", &big),
            Err(ExtractionError::TooLarge { .. })
        ));
    }
}
