//! Uploaded documents with lazily parsed frames.

use std::path::{Path, PathBuf};

use buf_model::FileType;

use crate::delimited::parse_delimited;
use crate::encoding::{decode, detect_encoding};
use crate::error::{DocumentError, Result};
use crate::frame::{Frame, WorkingFrame};

#[derive(Debug, Clone)]
struct Frames {
    base: Frame,
    working: WorkingFrame,
}

/// One uploaded file: raw bytes plus the frames parsed from them.
///
/// Frames are parsed on first access. The base frame keeps the data as
/// read (save for the one-time canonical rename); the working frame is a
/// copy that checks annotate with derived columns.
#[derive(Debug, Clone)]
pub struct TabularDocument {
    path: PathBuf,
    bytes: Vec<u8>,
    expected_type: FileType,
    frames: Option<Frames>,
    renamed: bool,
}

impl TabularDocument {
    pub fn new(path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
            expected_type: FileType::default(),
            frames: None,
            renamed: false,
        }
    }

    /// Read a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DocumentError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "read document");
        Ok(Self::new(path, bytes))
    }

    /// Set the file type under which parse errors are surfaced.
    #[must_use]
    pub fn with_expected_type(mut self, expected: FileType) -> Self {
        self.expected_type = expected;
        self
    }

    pub fn set_expected_type(&mut self, expected: FileType) {
        self.expected_type = expected;
    }

    pub fn expected_type(&self) -> &FileType {
        &self.expected_type
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path as shown in reports and logs.
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }

    /// Final path component (the upload's file name).
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Extension (with leading dot, empty when absent or when the name ends
    /// in a dot) and detected encoding.
    pub fn file_type(&self) -> FileType {
        let extension = self
            .path
            .extension()
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        FileType {
            extension,
            encoding: detect_encoding(&self.bytes).map(str::to_string),
        }
    }

    /// Decode and parse the bytes into a base frame.
    ///
    /// A parse error is returned when the document has the expected file
    /// type; for any other type it is logged and an empty frame is used, so
    /// that the file-stage checks can report the wrong type instead.
    pub fn parse(&self) -> Result<Frame> {
        let decoded = decode(&self.bytes);
        if decoded.used_fallback {
            tracing::info!(
                path = %self.path.display(),
                encoding = decoded.encoding.name(),
                "decoded with fallback encoding"
            );
        }

        match parse_delimited(&decoded.text) {
            Ok(table) => Frame::from_table(table),
            Err(error) => {
                let file_type = self.file_type();
                if file_type == self.expected_type {
                    return Err(DocumentError::CsvParse {
                        path: self.display_name(),
                        source: Box::new(error),
                    });
                }
                tracing::warn!(
                    path = %self.path.display(),
                    file_type = %file_type,
                    error = %error,
                    "could not parse upload, using an empty frame"
                );
                Ok(Frame::empty())
            }
        }
    }

    /// True once frames have been parsed.
    pub fn is_loaded(&self) -> bool {
        self.frames.is_some()
    }

    fn frames(&mut self) -> Result<&mut Frames> {
        let frames = match self.frames.take() {
            Some(frames) => frames,
            None => {
                let base = self.parse()?;
                Frames {
                    working: WorkingFrame::new(base.clone()),
                    base,
                }
            }
        };
        Ok(self.frames.insert(frames))
    }

    /// The base frame, parsing it on first access.
    pub fn base(&mut self) -> Result<&Frame> {
        Ok(&self.frames()?.base)
    }

    /// The working frame, parsing it on first access.
    pub fn working(&mut self) -> Result<&WorkingFrame> {
        Ok(&self.frames()?.working)
    }

    pub fn working_mut(&mut self) -> Result<&mut WorkingFrame> {
        Ok(&mut self.frames()?.working)
    }

    /// Both frames at once.
    pub fn frames_mut(&mut self) -> Result<(&Frame, &mut WorkingFrame)> {
        let frames = self.frames()?;
        Ok((&frames.base, &mut frames.working))
    }

    pub fn is_renamed(&self) -> bool {
        self.renamed
    }

    /// Relabel the columns with canonical names. Allowed once.
    ///
    /// The base frame must have exactly `names.len()` columns; the first
    /// `names.len()` working columns are relabelled positionally.
    pub fn rename_columns(&mut self, names: &[String]) -> Result<()> {
        if self.renamed {
            return Err(DocumentError::AlreadyRenamed {
                path: self.display_name(),
            });
        }
        let frames = self.frames()?;
        frames.base.set_column_names(names)?;
        frames.working.rename_leading(names)?;
        self.renamed = true;
        tracing::debug!(path = %self.path.display(), columns = names.len(), "renamed columns");
        Ok(())
    }

    /// Parse a working column into the derived date column `<column>_dt`.
    pub fn materialize_date_column(&mut self, column: &str, format: &str) -> Result<String> {
        self.working_mut()?.materialize_dates(column, format)
    }
}
