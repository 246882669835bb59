//! DOCX → plain text. A .docx file is a zip archive; the body lives in
//! `word/document.xml` as WordprocessingML.

use std::io::{Cursor, Read};
use std::sync::OnceLock;

use regex::Regex;

use super::ExtractionError;

const DOCUMENT_XML: &str = "word/document.xml";

fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").expect("valid regex"))
}

fn tab() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<w:tab\s*/>").expect("valid regex"))
}

fn any_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

pub fn extract_text(content: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(content))
        .map_err(|e| ExtractionError::ExtractionFailed(format!("DOCX is not a zip archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| ExtractionError::ExtractionFailed(format!("DOCX missing {DOCUMENT_XML}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::ExtractionFailed(format!("DOCX read error: {e}")))?;

    Ok(xml_to_text(&xml))
}

fn xml_to_text(xml: &str) -> String {
    let text = paragraph_break().replace_all(xml, "\n");
    let text = tab().replace_all(&text, " ");
    let text = any_tag().replace_all(&text, "");
    let text = decode_entities(&text);

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
