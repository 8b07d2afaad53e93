//! Upload checks run at the boundary, before any verification work.

use humansign_core::DEFAULT_MAX_TOKEN_BYTES;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME type for PDF documents.
pub const PDF: &str = "application/pdf";
/// MIME type for plain text.
pub const PLAIN_TEXT: &str = "text/plain";
/// MIME type for Markdown.
pub const MARKDOWN: &str = "text/markdown";
/// MIME type for Word documents.
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Rejected upload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// Document content type is not accepted.
    #[error("unsupported document type")]
    UnsupportedDocumentType,
    /// Proof file does not carry the expected extension.
    #[error("invalid humansign file")]
    InvalidHumansignFile,
    /// File exceeds the size limit.
    #[error("file size {size} exceeds limit of {limit} bytes")]
    FileTooLarge {
        /// Submitted size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },
}

/// Which uploads are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakePolicy {
    /// Largest accepted file, in bytes, for either upload.
    pub max_file_size: u64,
    /// Accepted document MIME types.
    pub allowed_doc_types: Vec<String>,
    /// Required suffix of the proof file name.
    pub humansign_extension: String,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_TOKEN_BYTES as u64,
            allowed_doc_types: [PDF, PLAIN_TEXT, MARKDOWN, DOCX]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            humansign_extension: ".humansign".to_string(),
        }
    }
}

impl IntakePolicy {
    /// Guesses a MIME type from a file name's extension.
    pub fn content_type_for(name: &str) -> Option<&'static str> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(PDF),
            "txt" | "text" => Some(PLAIN_TEXT),
            "md" | "markdown" => Some(MARKDOWN),
            "docx" => Some(DOCX),
            _ => None,
        }
    }

    /// Checks a document upload. Without `content_type` it is guessed from `name`.
    pub fn check_document(
        &self,
        name: &str,
        content_type: Option<&str>,
        size: u64,
    ) -> Result<(), IntakeError> {
        let content_type = content_type
            .or_else(|| Self::content_type_for(name))
            .ok_or(IntakeError::UnsupportedDocumentType)?;
        if !self
            .allowed_doc_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(content_type))
        {
            return Err(IntakeError::UnsupportedDocumentType);
        }
        self.check_size(size)
    }

    /// Checks a proof file upload.
    pub fn check_humansign(&self, name: &str, size: u64) -> Result<(), IntakeError> {
        if !name.ends_with(&self.humansign_extension) {
            return Err(IntakeError::InvalidHumansignFile);
        }
        self.check_size(size)
    }

    fn check_size(&self, size: u64) -> Result<(), IntakeError> {
        if size > self.max_file_size {
            return Err(IntakeError::FileTooLarge {
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_default_document_types() {
        let policy = IntakePolicy::default();
        for name in ["essay.pdf", "notes.TXT", "draft.md", "paper.docx"] {
            assert_eq!(policy.check_document(name, None, 10), Ok(()), "{name}");
        }
    }

    #[test]
    fn explicit_content_type_wins_over_name() {
        let policy = IntakePolicy::default();
        assert_eq!(policy.check_document("blob.bin", Some("text/plain"), 1), Ok(()));
        assert_eq!(
            policy.check_document("essay.pdf", Some("image/png"), 1),
            Err(IntakeError::UnsupportedDocumentType)
        );
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        assert_eq!(
            IntakePolicy::default().check_document("photo.png", None, 1),
            Err(IntakeError::UnsupportedDocumentType)
        );
        assert_eq!(
            IntakePolicy::default().check_document("README", None, 1),
            Err(IntakeError::UnsupportedDocumentType)
        );
    }

    #[test]
    fn humansign_extension_is_required() {
        let policy = IntakePolicy::default();
        assert_eq!(policy.check_humansign("essay.humansign", 5), Ok(()));
        assert_eq!(
            policy.check_humansign("essay.json", 5),
            Err(IntakeError::InvalidHumansignFile)
        );
    }

    #[test]
    fn size_limit_is_inclusive() {
        let policy = IntakePolicy {
            max_file_size: 100,
            ..IntakePolicy::default()
        };
        assert_eq!(policy.check_humansign("a.humansign", 100), Ok(()));
        assert_eq!(
            policy.check_document("a.txt", None, 101),
            Err(IntakeError::FileTooLarge {
                size: 101,
                limit: 100
            })
        );
    }
}
