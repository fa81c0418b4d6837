//! Filesystem evidence store.
//!
//! Writes uploads beneath a capability-sandboxed media root so a corrupted
//! path can never escape the directory. Layout is date-partitioned per
//! upload day: `evidence/<medium>/YYYY/MM/DD/<uuid>.<ext>`.
//!
//! Writes are synchronous and best-effort by design; the lifecycle engine
//! orders them before the database insert.

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::ports::{EvidenceStore, EvidenceStoreError, EvidenceUpload};

/// Evidence store rooted at a sandboxed media directory.
#[derive(Clone)]
pub struct FsEvidenceStore {
    root: Arc<Dir>,
}

impl FsEvidenceStore {
    /// Open (creating if necessary) the media root and sandbox it.
    pub fn open(media_root: &Path) -> Result<Self, EvidenceStoreError> {
        std::fs::create_dir_all(media_root)
            .map_err(|err| EvidenceStoreError::unavailable(err.to_string()))?;
        let root = Dir::open_ambient_dir(media_root, ambient_authority())
            .map_err(|err| EvidenceStoreError::unavailable(err.to_string()))?;
        Ok(Self {
            root: Arc::new(root),
        })
    }
}

#[async_trait]
impl EvidenceStore for FsEvidenceStore {
    async fn store(&self, upload: &EvidenceUpload) -> Result<String, EvidenceStoreError> {
        let day = chrono::Utc::now().format("%Y/%m/%d");
        let directory = format!("evidence/{}/{day}", upload.kind.subdir());
        self.root
            .create_dir_all(&directory)
            .map_err(|err| EvidenceStoreError::write(err.to_string()))?;

        let filename = format!("{}.{}", Uuid::new_v4().simple(), upload.extension);
        let relative_path = format!("{directory}/{filename}");
        self.root
            .write(&relative_path, &upload.bytes)
            .map_err(|err| EvidenceStoreError::write(err.to_string()))?;
        Ok(relative_path)
    }
}
