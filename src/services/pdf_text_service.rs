use std::error::Error;
use std::fmt;

use futures::future::BoxFuture;
use futures::FutureExt;

#[derive(Debug)]
pub enum PdfTextError {
    Decode(String),
    Worker(String),
}

impl fmt::Display for PdfTextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfTextError::Decode(msg) => write!(f, "Failed to read PDF: {}", msg),
            PdfTextError::Worker(msg) => write!(f, "PDF extraction worker failed: {}", msg),
        }
    }
}

impl Error for PdfTextError {}

/// Turns an uploaded document into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract_text<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, Result<String, PdfTextError>>;
}

/// Concatenates the text of every page, in page order. Layout is not preserved.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, PdfTextError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| PdfTextError::Decode(e.to_string()))?;

    Ok(pages.concat())
}

#[derive(Clone, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, Result<String, PdfTextError>> {
        let owned = bytes.to_vec();
        async move {
            // pdf decoding is CPU bound, keep it off the request thread
            tokio::task::spawn_blocking(move || extract_pdf_text(&owned))
                .await
                .map_err(|e| PdfTextError::Worker(e.to_string()))?
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_a_decode_error() {
        let result = extract_pdf_text(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfTextError::Decode(_))));
    }
}
