use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::BelgeError;

/// Where the bytes of an upload live while it is processed.
#[derive(Debug)]
pub enum UploadSource {
    /// Bytes received over a transport, staged in a temp file that is
    /// removed when the upload is dropped.
    Staged(NamedTempFile),
    /// A file already on disk, left untouched.
    OnDisk(PathBuf),
}

/// One uploaded file together with the path it was uploaded under.
///
/// `relative_path` may carry folder segments when a whole folder was
/// uploaded (`Kalite/FR.01-Form_2.pdf`), or be a bare file name.
#[derive(Debug)]
pub struct Upload {
    pub relative_path: String,
    pub source: UploadSource,
}

impl Upload {
    /// Stage raw upload bytes in a temp file.
    pub fn stage(relative_path: impl Into<String>, bytes: &[u8]) -> Result<Upload, BelgeError> {
        let mut tmpfile = NamedTempFile::new()?;
        tmpfile.write_all(bytes)?;
        tmpfile.flush()?;
        Ok(Upload {
            relative_path: relative_path.into(),
            source: UploadSource::Staged(tmpfile),
        })
    }

    pub fn on_disk(relative_path: impl Into<String>, path: impl Into<PathBuf>) -> Upload {
        Upload {
            relative_path: relative_path.into(),
            source: UploadSource::OnDisk(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        match &self.source {
            UploadSource::Staged(tmp) => tmp.path(),
            UploadSource::OnDisk(path) => path,
        }
    }
}
