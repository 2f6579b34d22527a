use std::io::Read;

use log::info;
use quick_xml::events::Event;
use thiserror::Error;

/// Declared format of an uploaded resume, derived from the file extension.
/// Anything that is not PDF or DOCX is treated as raw UTF-8 text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    pub fn from_extension(extension: &str) -> Self {
        if extension.eq_ignore_ascii_case("pdf") {
            DocumentFormat::Pdf
        } else if extension.eq_ignore_ascii_case("docx") {
            DocumentFormat::Docx
        } else {
            DocumentFormat::PlainText
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to parse PDF content: {0}")]
    Pdf(String),
    #[error("Failed to parse DOCX content: {0}")]
    Docx(String),
    #[error("Failed to decode document as UTF-8 text: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// Decodes an uploaded document into plain text. Decode failure is terminal
/// for the request; the pipeline is never invoked on undecodable input.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, DecodeError> {
    let text = match format {
        DocumentFormat::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| DecodeError::Pdf(e.to_string()))?
        }
        DocumentFormat::Docx => extract_docx(bytes)?,
        DocumentFormat::PlainText => std::str::from_utf8(bytes)?.to_string(),
    };
    info!("Decoded {:?} document: {} chars of text", format, text.len());
    Ok(text)
}

// A .docx file is a zip container; the body text lives in word/document.xml.
// Collect the text runs and break at paragraph ends.
fn extract_docx(bytes: &[u8]) -> Result<String, DecodeError> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor).map_err(|e| DecodeError::Docx(e.to_string()))?;
    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|e| DecodeError::Docx(e.to_string()))?;
    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(|e| DecodeError::Docx(e.to_string()))?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut text = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(run)) => {
                let piece = run.unescape().map_err(|e| DecodeError::Docx(e.to_string()))?;
                text.push_str(&piece);
            }
            Ok(Event::End(tag)) if tag.name().as_ref() == b"w:p" => text.push('\n'),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DecodeError::Docx(e.to_string())),
        }
    }
    Ok(text)
}
