//! Image publishing
//!
//! [`PngPublisher`] never lets a reader observe a half-written file: the PNG
//! is written to a temp file in the output directory and renamed over the
//! target. A stale image stays in place when publishing fails.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::render::RasterImage;

/// Publishing errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// Image encoding failed
    #[error("Encoding error: {0}")]
    Encode(#[from] image::ImageError),

    /// Output location not writable
    #[error("IO error writing {path}: {source}")]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Destination for rendered images
pub trait ImageSink {
    /// Publish `image`, replacing whatever was published before
    fn publish(&mut self, image: &RasterImage) -> Result<(), PublishError>;
}

impl<T: ImageSink + ?Sized> ImageSink for Box<T> {
    fn publish(&mut self, image: &RasterImage) -> Result<(), PublishError> {
        (**self).publish(image)
    }
}

/// Writes PNG files to a fixed path by atomic rename
#[derive(Debug, Clone)]
pub struct PngPublisher {
    path: PathBuf,
}

impl PngPublisher {
    /// Publish to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> PublishError {
        PublishError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ImageSink for PngPublisher {
    fn publish(&mut self, image: &RasterImage) -> Result<(), PublishError> {
        let png = image.encode_png()?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = tempfile::Builder::new()
            .prefix(".publish-")
            .suffix(".png")
            .tempfile_in(dir)
            .map_err(|e| self.io_error(e))?;
        staged.write_all(&png).map_err(|e| self.io_error(e))?;
        staged.as_file().sync_all().map_err(|e| self.io_error(e))?;
        staged.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        log::debug!("Published {} bytes to {}", png.len(), self.path.display());
        Ok(())
    }
}
