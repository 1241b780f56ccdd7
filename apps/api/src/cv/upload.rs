//! Uploaded document → plain text. PDFs go through `pdf-extract`; anything
//! else must already be UTF-8 text.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    PlainText,
    Unsupported,
}

fn classify(file_name: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> DocumentKind {
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    let content_type = content_type.map(|ct| ct.to_ascii_lowercase());

    if bytes.starts_with(PDF_MAGIC)
        || extension.as_deref() == Some("pdf")
        || content_type.as_deref() == Some("application/pdf")
    {
        return DocumentKind::Pdf;
    }

    match extension.as_deref() {
        Some("txt") | Some("text") | Some("md") | None => {}
        Some(_) => return DocumentKind::Unsupported,
    }
    match content_type.as_deref() {
        None | Some("application/octet-stream") => DocumentKind::PlainText,
        Some(ct) if ct.starts_with("text/") => DocumentKind::PlainText,
        Some(_) => DocumentKind::Unsupported,
    }
}

/// Pulls the text out of an uploaded CV.
///
/// Errors with `UnsupportedDocument` for formats other than PDF and text, for
/// PDFs with no extractable text layer, and for non-UTF-8 "text".
pub async fn extract_document_text(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: Bytes,
) -> Result<String, AppError> {
    match classify(file_name, content_type, &bytes) {
        DocumentKind::Pdf => extract_pdf_text(bytes).await,
        DocumentKind::PlainText => String::from_utf8(bytes.to_vec()).map_err(|_| {
            AppError::UnsupportedDocument("Text uploads must be UTF-8 encoded".to_string())
        }),
        DocumentKind::Unsupported => Err(AppError::UnsupportedDocument(format!(
            "Only PDF and plain-text CVs are supported (got {})",
            file_name.or(content_type).unwrap_or("an unknown format")
        ))),
    }
}

async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    // pdf-extract is synchronous and can be slow on large files.
    // It also panics on some malformed inputs; a panicked task is an unreadable PDF.
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| {
            if e.is_panic() {
                warn!("PDF extraction panicked");
                AppError::UnsupportedDocument("The PDF could not be read".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}"))
            }
        })?;

    match extracted {
        Ok(text) if !text.trim().is_empty() => {
            debug!("Extracted {} characters from PDF", text.len());
            Ok(text)
        }
        Ok(_) => Err(AppError::UnsupportedDocument(
            "The PDF has no text layer (scanned documents are not supported)".to_string(),
        )),
        Err(e) => {
            warn!("PDF extraction failed: {e}");
            Err(AppError::UnsupportedDocument(
                "The PDF could not be read".to_string(),
            ))
        }
    }
}
