//! Document classification and encoding for upload.

use std::path::Path;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::multipart::{Form, Part};

use crate::error::{DocumentError, Result};

/// Mime type assumed for base64 payloads that do not declare one.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Name of the multipart field carrying the document.
pub const DOCUMENT_FIELD: &str = "document";

lazy_static! {
    // data:[<mime>][;param]*,<payload>
    static ref DATA_URL: Regex = Regex::new(
        r"(?s)^data:([^;,]*)((?:;[^;,]*)*),(.*)$"
    ).unwrap();
}

/// Tolerates missing padding, like browser `atob`.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Document submitted for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// Already-binary payload (file contents).
    RawBytes(Vec<u8>),
    /// Base64 text, either bare or wrapped in a `data:` URL.
    Base64String(String),
    /// Remote document reference, passed to the provider as-is.
    RemoteUrl(String),
}

/// Document in the form attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedDocument {
    Binary { bytes: Vec<u8>, mime_type: String },
    Url(String),
}

impl Document {
    /// Classify a string input.
    ///
    /// Strings starting with `http` are remote references; everything else,
    /// `data:` URLs included, is base64 content.
    pub fn classify(input: &str) -> Self {
        if input.starts_with("http") {
            Document::RemoteUrl(input.to_string())
        } else {
            Document::Base64String(input.to_string())
        }
    }

    /// Read a file into a binary document.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Document::RawBytes(std::fs::read(path)?))
    }

    /// Short description for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Document::RawBytes(_) => "raw bytes",
            Document::Base64String(s) if s.starts_with("data:") => "data URL",
            Document::Base64String(_) => "base64",
            Document::RemoteUrl(_) => "remote URL",
        }
    }

    /// Turn the document into what gets attached to the request.
    pub fn encode(&self) -> std::result::Result<EncodedDocument, DocumentError> {
        match self {
            Document::RawBytes(bytes) => {
                if bytes.is_empty() {
                    return Err(DocumentError::Empty);
                }
                Ok(EncodedDocument::Binary {
                    mime_type: sniff_mime(bytes).to_string(),
                    bytes: bytes.clone(),
                })
            }
            Document::Base64String(s) if s.starts_with("data:") => decode_data_url(s),
            Document::Base64String(s) => Ok(EncodedDocument::Binary {
                bytes: decode_base64(s)?,
                mime_type: DEFAULT_IMAGE_MIME.to_string(),
            }),
            Document::RemoteUrl(url) => Ok(EncodedDocument::Url(url.clone())),
        }
    }
}

impl EncodedDocument {
    /// Build the single-part multipart form for this document.
    pub fn to_form(&self, file_name: &str) -> Result<Form> {
        let form = match self {
            EncodedDocument::Url(url) => Form::new().text(DOCUMENT_FIELD, url.clone()),
            EncodedDocument::Binary { bytes, mime_type } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.to_string())
                    .mime_str(mime_type)?;
                Form::new().part(DOCUMENT_FIELD, part)
            }
        };
        Ok(form)
    }

    /// Payload size in bytes, or URL length.
    pub fn len(&self) -> usize {
        match self {
            EncodedDocument::Binary { bytes, .. } => bytes.len(),
            EncodedDocument::Url(url) => url.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn decode_base64(s: &str) -> std::result::Result<Vec<u8>, DocumentError> {
    let cleaned: String = s.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(DocumentError::Empty);
    }
    LENIENT_BASE64
        .decode(cleaned.as_bytes())
        .map_err(|e| DocumentError::InvalidBase64(e.to_string()))
}

fn decode_data_url(s: &str) -> std::result::Result<EncodedDocument, DocumentError> {
    let caps = DATA_URL
        .captures(s)
        .ok_or_else(|| DocumentError::InvalidDataUrl("missing ',' separator".to_string()))?;

    let mime_type = match caps[1].trim() {
        "" => DEFAULT_IMAGE_MIME.to_string(),
        mime => mime.to_string(),
    };
    let is_base64 = caps[2]
        .split(';')
        .any(|param| param.trim().eq_ignore_ascii_case("base64"));
    let payload = &caps[3];

    let bytes = if is_base64 {
        decode_base64(payload)?
    } else {
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };
    if bytes.is_empty() {
        return Err(DocumentError::Empty);
    }

    Ok(EncodedDocument::Binary { bytes, mime_type })
}

/// Guess a mime type from magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'%', b'P', b'D', b'F', ..] => "application/pdf",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => "image/tiff",
        [_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c', ..] => "image/heic",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_classify_strings() {
        assert_eq!(
            Document::classify("https://example.com/card.jpg"),
            Document::RemoteUrl("https://example.com/card.jpg".to_string())
        );
        assert_eq!(
            Document::classify("http://example.com/a"),
            Document::RemoteUrl("http://example.com/a".to_string())
        );
        assert!(matches!(
            Document::classify("data:image/png;base64,AAAA"),
            Document::Base64String(_)
        ));
        assert!(matches!(Document::classify("aGVsbG8="), Document::Base64String(_)));
    }

    #[test]
    fn test_url_passes_through_unmodified() {
        let doc = Document::classify("https://example.com/card.jpg?x=1");
        assert_eq!(
            doc.encode().unwrap(),
            EncodedDocument::Url("https://example.com/card.jpg?x=1".to_string())
        );
    }

    #[test]
    fn test_data_url_decodes_to_binary() {
        let doc = Document::classify("data:image/png;base64,aGVsbG8=");
        assert_eq!(
            doc.encode().unwrap(),
            EncodedDocument::Binary {
                bytes: b"hello".to_vec(),
                mime_type: "image/png".to_string(),
            }
        );
    }

    #[test]
    fn test_data_url_without_mime() {
        let doc = Document::classify("data:;base64,aGk=");
        match doc.encode().unwrap() {
            EncodedDocument::Binary { bytes, mime_type } => {
                assert_eq!(bytes, b"hi".to_vec());
                assert_eq!(mime_type, DEFAULT_IMAGE_MIME);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_plain_data_url_is_percent_decoded() {
        let doc = Document::classify("data:text/plain,hello%20world");
        assert_eq!(
            doc.encode().unwrap(),
            EncodedDocument::Binary {
                bytes: b"hello world".to_vec(),
                mime_type: "text/plain".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_data_url() {
        let doc = Document::Base64String("data:image/png;base64".to_string());
        assert!(matches!(doc.encode(), Err(DocumentError::InvalidDataUrl(_))));
    }

    #[test]
    fn test_bare_base64() {
        let doc = Document::classify("aGVs\nbG8");
        assert_eq!(
            doc.encode().unwrap(),
            EncodedDocument::Binary {
                bytes: b"hello".to_vec(),
                mime_type: DEFAULT_IMAGE_MIME.to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_base64() {
        let doc = Document::classify("not base64 at all!");
        assert!(matches!(doc.encode(), Err(DocumentError::InvalidBase64(_))));
    }

    #[test]
    fn test_raw_bytes_attached_directly() {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.extend_from_slice(b"rest");
        let doc = Document::RawBytes(bytes.clone());
        assert_eq!(
            doc.encode().unwrap(),
            EncodedDocument::Binary {
                bytes,
                mime_type: "image/png".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(Document::RawBytes(Vec::new()).encode(), Err(DocumentError::Empty));
        assert_eq!(Document::classify("").encode(), Err(DocumentError::Empty));
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime(b"%PDF-1.7"), "application/pdf");
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"plain"), "application/octet-stream");
    }

    #[test]
    fn test_form_builds_for_both_shapes() {
        let url = EncodedDocument::Url("https://example.com".to_string());
        assert!(url.to_form("card.jpg").is_ok());

        let binary = EncodedDocument::Binary {
            bytes: vec![1, 2, 3],
            mime_type: "image/png".to_string(),
        };
        assert!(binary.to_form("card.jpg").is_ok());
    }
}
