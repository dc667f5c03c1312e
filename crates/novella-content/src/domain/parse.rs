//! Parsing raw chapter documents into validated chapters.

use novella_core::error::DomainError;
use novella_core::ids::ChapterId;
use novella_core::repository::{ContentFormat, RawChapter};
use sha2::{Digest, Sha256};

use super::chapter::{Chapter, ChapterDocument};

/// Hex-encoded SHA-256 of a raw document.
#[must_use]
pub fn content_hash(body: &str) -> String {
    format!("{:x}", Sha256::digest(body.as_bytes()))
}

/// Parses and validates a raw chapter document.
///
/// # Errors
///
/// Returns `DomainError::MalformedContent` if the document does not match the
/// chapter schema or fails structural validation.
pub fn parse_chapter(chapter_id: ChapterId, raw: &RawChapter) -> Result<Chapter, DomainError> {
    let document: ChapterDocument = match raw.format {
        ContentFormat::Json => serde_json::from_str(&raw.body).map_err(|e| e.to_string()),
        ContentFormat::Yaml => serde_yaml::from_str(&raw.body).map_err(|e| e.to_string()),
    }
    .map_err(|reason| DomainError::MalformedContent { chapter_id, reason })?;

    Chapter::from_document(chapter_id, content_hash(&raw.body), document)
}
