//! Uploaded document types and their upload constraints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::application::UnknownVariant;

const MIB: u64 = 1024 * 1024;

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];
const IMAGE_OR_PDF_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// Kind of document attached to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    PassportPicture,
    ProofOfEducation,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PassportPicture => "PASSPORT_PICTURE",
            Self::ProofOfEducation => "PROOF_OF_EDUCATION",
        }
    }

    /// Maximum accepted file size in bytes.
    pub fn max_bytes(self) -> u64 {
        match self {
            Self::PassportPicture => 2 * MIB,
            Self::ProofOfEducation => 5 * MIB,
        }
    }

    /// Content types accepted for this document type.
    pub fn allowed_mime_types(self) -> &'static [&'static str] {
        match self {
            Self::PassportPicture => IMAGE_TYPES,
            Self::ProofOfEducation => IMAGE_OR_PDF_TYPES,
        }
    }

    pub fn accepts_mime_type(self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        self.allowed_mime_types().contains(&mime.as_str())
    }

    /// Prefix for stored file names, e.g. `passport_picture`.
    pub fn file_prefix(self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "PASSPORT_PICTURE" => Ok(Self::PassportPicture),
            "PROOF_OF_EDUCATION" => Ok(Self::ProofOfEducation),
            other => Err(UnknownVariant {
                field: "documentType",
                value: other.to_owned(),
            }),
        }
    }
}

/// Extension for a stored upload, derived from its accepted content type.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match mime.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}
