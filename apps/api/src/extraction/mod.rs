//! Text Extractor: turns uploaded document bytes into plain text.
//!
//! Parsing internals belong to the libraries (`pdf-extract`, `zip`); this
//! module only routes by format and maps their failures into `ExtractionError`.

pub mod docx;

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Text,
    Pdf,
    Docx,
    /// A declared format this service cannot read (extension or content type).
    Unknown(String),
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "txt" | "text" => DocumentFormat::Text,
            "pdf" => DocumentFormat::Pdf,
            "docx" => DocumentFormat::Docx,
            other => DocumentFormat::Unknown(format!(".{other}")),
        }
    }

    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type.split(';').next().unwrap_or("").trim();
        match essence {
            "text/plain" => DocumentFormat::Text,
            "application/pdf" => DocumentFormat::Pdf,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                DocumentFormat::Docx
            }
            other => DocumentFormat::Unknown(other.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, DocumentFormat::Unknown(_))
    }

    /// Resolves the declared format of an upload: file extension first, then
    /// content type. Unrecognised declarations come back as `Unknown`.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Self {
        let by_extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| Self::from_extension(ext));
        if let Some(format) = by_extension.as_ref().filter(|f| f.is_supported()) {
            return format.clone();
        }

        let by_content_type = content_type.map(Self::from_content_type);
        if let Some(format) = by_content_type.as_ref().filter(|f| f.is_supported()) {
            return format.clone();
        }

        by_extension
            .or(by_content_type)
            .unwrap_or_else(|| DocumentFormat::Unknown("unspecified".to_string()))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Text => write!(f, "text"),
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Docx => write!(f, "docx"),
            DocumentFormat::Unknown(tag) => write!(f, "unknown ({tag})"),
        }
    }
}

/// An uploaded document. Lives for a single analysis request.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub format: DocumentFormat,
    pub content: Bytes,
}

impl Document {
    pub fn new(name: impl Into<String>, format: DocumentFormat, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            format,
            content: content.into(),
        }
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, DocumentFormat::Text, Bytes::from(text.into()))
    }

    /// Builds a document from an upload, detecting its declared format.
    pub fn from_upload(
        file_name: Option<&str>,
        content_type: Option<&str>,
        content: impl Into<Bytes>,
    ) -> Self {
        let format = DocumentFormat::detect(file_name, content_type);
        Self::new(file_name.unwrap_or("upload"), format, content)
    }
}

/// Blocking text extraction. Callers run it off the async runtime.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, content: &[u8], format: &DocumentFormat) -> Result<String, ExtractionError>;
}

/// Default extractor: UTF-8 text, `pdf-extract` for PDF, zipped WordprocessingML for DOCX.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTextExtractor;

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, content: &[u8], format: &DocumentFormat) -> Result<String, ExtractionError> {
        match format {
            DocumentFormat::Text => Ok(String::from_utf8_lossy(content).into_owned()),
            DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(content)
                .map_err(|e| ExtractionError::ExtractionFailed(format!("PDF: {e}"))),
            DocumentFormat::Docx => docx::extract_text(content),
            DocumentFormat::Unknown(tag) => Err(ExtractionError::UnsupportedFormat(format!(
                "'{tag}' (expected .txt, .pdf or .docx)"
            ))),
        }
    }
}
