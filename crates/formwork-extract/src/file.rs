//! Uploaded files.
//!
//! An [`UploadedFile`] is the file half of a multipart form field. Small
//! uploads stay in memory; uploads that arrive after the parser's memory
//! threshold is used up are spilled to a temporary file which is removed when
//! the last handle to it is dropped.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tempfile::NamedTempFile;

use crate::FormError;

#[derive(Debug, Clone)]
enum FileContent {
    Memory(Bytes),
    Disk(Arc<NamedTempFile>),
}

/// A file that has been uploaded via a multipart form.
///
/// Cloning is cheap: in-memory content is reference counted and spilled
/// content shares the same temporary file.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    file_name: String,
    content_type: Option<String>,
    size: u64,
    content: FileContent,
}

impl UploadedFile {
    /// Create an in-memory uploaded file.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            file_name: file_name.into(),
            content_type,
            size: data.len() as u64,
            content: FileContent::Memory(data),
        }
    }

    pub(crate) fn spilled(
        name: String,
        file_name: String,
        content_type: Option<String>,
        size: u64,
        file: NamedTempFile,
    ) -> Self {
        Self {
            name,
            file_name,
            content_type,
            size,
            content: FileContent::Disk(Arc::new(file)),
        }
    }

    /// Get the form field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the original file name sent by the client.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Get the MIME type declared for the part.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the file size in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.size
    }

    /// Check if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns true if the content is held in memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        matches!(self.content, FileContent::Memory(_))
    }

    /// Path of the temporary file backing a spilled upload.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.content {
            FileContent::Memory(_) => None,
            FileContent::Disk(file) => Some(file.path()),
        }
    }

    /// Get the file extension from the file name, without the leading dot.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let base = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_name);
        base.rsplit_once('.').map(|(_, ext)| ext)
    }

    /// Read the whole file content.
    ///
    /// # Errors
    ///
    /// Returns a file-read error if a spilled upload can no longer be read.
    pub fn bytes(&self) -> Result<Bytes, FormError> {
        match &self.content {
            FileContent::Memory(data) => Ok(data.clone()),
            FileContent::Disk(file) => std::fs::read(file.path())
                .map(Bytes::from)
                .map_err(|e| FormError::file_read(&self.name, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_in_memory_file() {
        let file = UploadedFile::new(
            "avatar",
            "me.png",
            Some("image/png".to_string()),
            Bytes::from_static(b"PNG_DATA"),
        );

        assert_eq!(file.name(), "avatar");
        assert_eq!(file.file_name(), "me.png");
        assert_eq!(file.content_type(), Some("image/png"));
        assert_eq!(file.len(), 8);
        assert!(file.is_in_memory());
        assert!(file.path().is_none());
        assert_eq!(file.bytes().unwrap().as_ref(), b"PNG_DATA");
    }

    #[test]
    fn test_extension() {
        let pdf = UploadedFile::new("f", "document.pdf", None, Bytes::new());
        let archive = UploadedFile::new("f", "backup.tar.gz", None, Bytes::new());
        let readme = UploadedFile::new("f", "README", None, Bytes::new());
        let nested = UploadedFile::new("f", "dir.v2/notes", None, Bytes::new());

        assert_eq!(pdf.extension(), Some("pdf"));
        assert_eq!(archive.extension(), Some("gz"));
        assert_eq!(readme.extension(), None);
        assert_eq!(nested.extension(), None);
    }

    #[test]
    fn test_is_empty() {
        let empty = UploadedFile::new("f", "a.txt", None, Bytes::new());
        let non_empty = UploadedFile::new("f", "a.txt", None, Bytes::from_static(b"data"));

        assert!(empty.is_empty());
        assert!(!non_empty.is_empty());
    }

    #[test]
    fn test_spilled_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"Hello!").unwrap();

        let file = UploadedFile::spilled(
            "file".to_string(),
            "test_file.txt".to_string(),
            None,
            6,
            tmp,
        );

        assert!(!file.is_in_memory());
        assert!(file.path().unwrap().exists());
        assert_eq!(file.bytes().unwrap().as_ref(), b"Hello!");
    }

    #[test]
    fn test_spilled_file_unreadable() {
        let tmp = NamedTempFile::new().unwrap();
        let file = UploadedFile::spilled(
            "file".to_string(),
            "gone.txt".to_string(),
            None,
            4,
            tmp,
        );
        std::fs::remove_file(file.path().unwrap()).unwrap();

        let err = file.bytes().unwrap_err();
        assert_eq!(err.kind(), crate::FormErrorKind::FileRead);
        assert_eq!(err.field(), Some("file"));
    }
}
