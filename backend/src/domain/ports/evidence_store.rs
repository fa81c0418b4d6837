//! Port abstraction for evidence file storage.
//!
//! Evidence is written synchronously and best-effort during report
//! creation. The lifecycle engine stores files *before* inserting the
//! report row, so a storage failure aborts creation rather than leaving a
//! row without its evidence.

use std::fmt;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by evidence store adapters.
    pub enum EvidenceStoreError {
        /// The backing store could not be reached.
        Unavailable { message: String } => "evidence store unavailable: {message}",
        /// The write itself failed.
        Write { message: String } => "evidence write failed: {message}",
        /// The payload could not be accepted (bad extension, empty body).
        InvalidPayload { message: String } => "invalid evidence payload: {message}",
    }
}

/// Evidence medium, selecting the storage subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceKind {
    /// Photo evidence.
    Image,
    /// Video evidence.
    Video,
    /// Audio evidence.
    Audio,
}

impl EvidenceKind {
    /// Storage subdirectory for this medium.
    pub const fn subdir(self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "videos",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subdir())
    }
}

/// Decoded evidence payload ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceUpload {
    /// Medium of the attachment.
    pub kind: EvidenceKind,
    /// File extension without the dot, e.g. `png`.
    pub extension: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

impl EvidenceUpload {
    /// Validate an upload before it reaches the store.
    pub fn try_new(
        kind: EvidenceKind,
        extension: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, EvidenceStoreError> {
        let extension = extension.trim().trim_start_matches('.').to_lowercase();
        if extension.is_empty() || extension.len() > 8 {
            return Err(EvidenceStoreError::invalid_payload(
                "file extension must be 1-8 characters",
            ));
        }
        if !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(EvidenceStoreError::invalid_payload(
                "file extension must be alphanumeric",
            ));
        }
        if bytes.is_empty() {
            return Err(EvidenceStoreError::invalid_payload(
                "evidence payload must not be empty",
            ));
        }
        Ok(Self {
            kind,
            extension,
            bytes,
        })
    }
}

/// Port for writing evidence attachments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Write the payload and return its path relative to the media root,
    /// date-partitioned by upload day:
    /// `evidence/<medium>/YYYY/MM/DD/<uuid>.<ext>`.
    async fn store(&self, upload: &EvidenceUpload) -> Result<String, EvidenceStoreError>;
}
