//! Capture service contract: turn the on-screen card into an image artifact.

use std::fmt;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::scorecard::ScoreCard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Jpg,
    Png,
}

impl ImageFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(ImageFormat::Jpg),
            "image/png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureOptions {
    pub format: ImageFormat,
    /// Encoder quality in `[0, 1]`; ignored for PNG.
    pub quality: f32,
}

impl CaptureOptions {
    /// JPEG quality on the encoder's 1..=100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        let q = if self.quality.is_finite() {
            self.quality.clamp(0.0, 1.0)
        } else {
            1.0
        };
        ((q * 100.0).round() as u8).max(1)
    }
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Jpg,
            quality: 0.9,
        }
    }
}

/// What the screen is showing at the moment of capture.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRegion {
    pub card: ScoreCard,
    /// Encoded background raster (any format `image` decodes). `None` uses
    /// the built-in fairway gradient.
    pub background: Option<Arc<[u8]>>,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// The 375x500 card at 2x density.
    pub const DEFAULT_WIDTH: u32 = 750;
    pub const DEFAULT_HEIGHT: u32 = 1000;

    pub fn for_card(card: ScoreCard) -> Self {
        Self {
            card,
            background: None,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }

    pub fn with_background(mut self, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.background = Some(bytes.into());
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Opaque reference to a captured image (file URI or object URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactLocator(String);

impl ArtifactLocator {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `file:` URI for an absolute local path, percent-encoded.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file_path(path: &Path) -> Option<Self> {
        url::Url::from_file_path(path)
            .ok()
            .map(|uri| Self(uri.into()))
    }

    /// Local path for `file:` locators.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn file_path(&self) -> Option<PathBuf> {
        let uri = url::Url::parse(&self.0).ok()?;
        if uri.scheme() != "file" {
            return None;
        }
        uri.to_file_path().ok()
    }
}

impl fmt::Display for ArtifactLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactLocator {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("region {width}x{height} cannot be rendered")]
    InvalidRegion { width: u32, height: u32 },
    #[error("background image could not be decoded: {0}")]
    Background(String),
    #[error("encoding {format:?} failed: {reason}")]
    Encode { format: ImageFormat, reason: String },
    #[error("writing capture failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture unavailable: {0}")]
    Unavailable(String),
}

#[async_trait(?Send)]
pub trait CaptureService {
    async fn capture(
        &self,
        region: &CaptureRegion,
        options: &CaptureOptions,
    ) -> Result<ArtifactLocator, CaptureError>;
}
