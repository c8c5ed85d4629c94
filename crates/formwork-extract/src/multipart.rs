//! Multipart form bodies.
//!
//! `multipart/form-data` bodies are streamed part by part with `multer`.
//! Text parts become values; parts carrying a filename become
//! [`UploadedFile`]s. File content is buffered in memory until the parser's
//! memory budget is spent, after which each further upload is written to a
//! temporary file.

use std::io::{self, Write};

use bytes::{Bytes, BytesMut};
use tempfile::NamedTempFile;

use crate::{ExtractionSource, FormError, ParseConfig, UploadedFile, ValueStore};

/// Streaming reader for one multipart body.
pub(crate) struct MultipartReader<'c> {
    inner: multer::Multipart<'static>,
    config: &'c ParseConfig,
    field_count: usize,
    memory_used: usize,
}

impl<'c> MultipartReader<'c> {
    /// Creates a reader for `body` using the boundary in `content_type`.
    pub(crate) fn new(
        content_type: &str,
        body: Bytes,
        config: &'c ParseConfig,
    ) -> Result<Self, FormError> {
        let boundary = multer::parse_boundary(content_type).map_err(|_| {
            FormError::decode(
                ExtractionSource::Body,
                "missing or invalid boundary in multipart Content-Type",
            )
        })?;

        let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });

        Ok(Self {
            inner: multer::Multipart::new(stream, boundary),
            config,
            field_count: 0,
            memory_used: 0,
        })
    }

    /// Reads every part into `store`.
    ///
    /// All values of a repeated text field are kept. Only the first file per
    /// field name is kept; later ones are skipped.
    pub(crate) async fn read_into(mut self, store: &mut ValueStore) -> Result<(), FormError> {
        while let Some(mut field) = self.inner.next_field().await.map_err(multipart_error)? {
            self.field_count += 1;
            if self.field_count > self.config.max_fields {
                return Err(FormError::too_many_fields(self.config.max_fields));
            }

            let Some(name) = field.name().filter(|n| !n.is_empty()).map(String::from) else {
                tracing::debug!("skipping multipart part without a field name");
                continue;
            };

            let file_name = field
                .file_name()
                .filter(|f| !f.is_empty())
                .map(String::from);

            match file_name {
                None => {
                    let value = self.read_text(&name, &mut field).await?;
                    store.add(name, value);
                }
                Some(_) if store.file_exists(&name) => {
                    tracing::debug!(field = %name, "dropping additional file for field");
                }
                Some(file_name) => {
                    let content_type = field.content_type().map(ToString::to_string);
                    let file = self
                        .read_file(name.clone(), file_name, content_type, &mut field)
                        .await?;
                    store.add_file(name, file);
                }
            }
        }

        Ok(())
    }

    async fn read_text(
        &self,
        name: &str,
        field: &mut multer::Field<'static>,
    ) -> Result<String, FormError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if buf.len() + chunk.len() > self.config.max_field_size {
                return Err(FormError::field_too_large(name, self.config.max_field_size));
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    async fn read_file(
        &mut self,
        name: String,
        file_name: String,
        content_type: Option<String>,
        field: &mut multer::Field<'static>,
    ) -> Result<UploadedFile, FormError> {
        let mut buf = BytesMut::new();
        let mut spill: Option<NamedTempFile> = None;
        let mut size: u64 = 0;

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            size += chunk.len() as u64;

            if let Some(tmp) = spill.as_mut() {
                tmp.write_all(&chunk)
                    .map_err(|e| FormError::file_read(&name, e))?;
                continue;
            }

            if self.memory_used + buf.len() + chunk.len() > self.config.max_memory {
                let mut tmp = NamedTempFile::new().map_err(|e| FormError::file_read(&name, e))?;
                tmp.write_all(&buf)
                    .and_then(|()| tmp.write_all(&chunk))
                    .map_err(|e| FormError::file_read(&name, e))?;
                tracing::debug!(
                    field = %name,
                    path = %tmp.path().display(),
                    "multipart upload spilled to disk"
                );
                buf.clear();
                spill = Some(tmp);
            } else {
                buf.extend_from_slice(&chunk);
            }
        }

        match spill {
            Some(mut tmp) => {
                tmp.flush().map_err(|e| FormError::file_read(&name, e))?;
                Ok(UploadedFile::spilled(name, file_name, content_type, size, tmp))
            }
            None => {
                self.memory_used += buf.len();
                Ok(UploadedFile::new(name, file_name, content_type, buf.freeze()))
            }
        }
    }
}

impl std::fmt::Debug for MultipartReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipartReader")
            .field("config", &self.config)
            .field("field_count", &self.field_count)
            .field("memory_used", &self.memory_used)
            .finish_non_exhaustive()
    }
}

fn multipart_error(e: multer::Error) -> FormError {
    FormError::decode(ExtractionSource::Body, format!("multipart parse error: {e}"))
}
