//! Clip ingestion — format allow-list and scoped local staging.
//!
//! [`TempClip`] stages the uploaded bytes in a uniquely named temporary file
//! so concurrent runs can never collide, and deletes it on drop so every
//! exit path (success, remote failure, or panic unwind) cleans up the local
//! copy.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// ClipKind
// ---------------------------------------------------------------------------

/// Allowed clip container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipKind {
    Mp4,
    Mov,
    Avi,
}

impl ClipKind {
    /// Map a file extension (without the dot, any case) to a clip kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp4" => Some(ClipKind::Mp4),
            "mov" => Some(ClipKind::Mov),
            "avi" => Some(ClipKind::Avi),
            _ => None,
        }
    }

    /// Map a path's extension to a clip kind.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// MIME type declared to the upload surface.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ClipKind::Mp4 => "video/mp4",
            ClipKind::Mov => "video/quicktime",
            ClipKind::Avi => "video/x-msvideo",
        }
    }

    /// Canonical extension, used for the temp-file suffix.
    pub fn extension(&self) -> &'static str {
        match self {
            ClipKind::Mp4 => "mp4",
            ClipKind::Mov => "mov",
            ClipKind::Avi => "avi",
        }
    }
}

// ---------------------------------------------------------------------------
// UploadedClip
// ---------------------------------------------------------------------------

/// A clip as received from the user: raw bytes plus the declared format.
///
/// Owned exclusively by the pipeline for the duration of one run.
#[derive(Debug, Clone)]
pub struct UploadedClip {
    pub data: Vec<u8>,
    pub kind: ClipKind,
}

impl UploadedClip {
    pub fn new(data: Vec<u8>, kind: ClipKind) -> Self {
        Self { data, kind }
    }
}

// ---------------------------------------------------------------------------
// TempClip
// ---------------------------------------------------------------------------

/// Scoped local staging of clip bytes.
///
/// The backing file has a unique per-run name and is removed when the value
/// is dropped; [`discard`](Self::discard) removes it eagerly once the remote
/// upload has succeeded.
pub struct TempClip {
    file: NamedTempFile,
}

impl TempClip {
    /// Write the clip bytes to a fresh temporary file.
    pub fn persist(clip: &UploadedClip) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("pitch-vision-clip-")
            .suffix(&format!(".{}", clip.kind.extension()))
            .tempfile()?;

        file.write_all(&clip.data)?;
        file.flush()?;

        log::debug!(
            "staged clip locally: {} ({} bytes)",
            file.path().display(),
            clip.data.len()
        );

        Ok(Self { file })
    }

    /// Path of the staged file, valid until the value is dropped.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the staged file now instead of waiting for drop.
    pub fn discard(self) -> std::io::Result<()> {
        self.file.close()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
