//! Banner: an advertising image attached to a refreshment point.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CasebookError, ValidationError};
use crate::id::{BannerId, RefreshmentPointId};
use crate::time::{Timestamp, now};
use crate::validation::Checks;

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
pub const MIN_WIDTH: u32 = 300;
pub const MIN_HEIGHT: u32 = 150;
pub const MAX_WIDTH: u32 = 1920;
pub const MAX_HEIGHT: u32 = 1080;

/// Supported image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Infer the format from the extension of `path`, ignoring case.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, extension) = path.rsplit_once('.')?;
        extension.parse().ok()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            "webp" => Ok(Self::Webp),
            _ => Err(ValidationError::UnsupportedImageFormat),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image metadata as submitted by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageUpload {
    pub path: String,
    pub size_bytes: u64,
    pub width: u32,
    pub height: u32,
}

/// A validated banner image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerImage {
    pub path: String,
    pub format: ImageFormat,
    pub size_bytes: u64,
    pub width: u32,
    pub height: u32,
}

impl TryFrom<ImageUpload> for BannerImage {
    type Error = ValidationError;

    fn try_from(upload: ImageUpload) -> Result<Self, Self::Error> {
        let path = upload.path.trim().to_string();
        let mut checks = Checks::new();
        let format = if checks.required("path", &path) {
            let format = ImageFormat::from_path(&path);
            checks.ensure(format.is_some(), ValidationError::UnsupportedImageFormat);
            format
        } else {
            None
        };
        checks.ensure(
            (1..=MAX_IMAGE_BYTES).contains(&upload.size_bytes),
            ValidationError::Range {
                field: "size_bytes",
                min: 1,
                max: MAX_IMAGE_BYTES.cast_signed(),
            },
        );
        checks.range(
            "width",
            upload.width.into(),
            MIN_WIDTH.into(),
            MAX_WIDTH.into(),
        );
        checks.range(
            "height",
            upload.height.into(),
            MIN_HEIGHT.into(),
            MAX_HEIGHT.into(),
        );
        checks.finish()?;

        match format {
            Some(format) => Ok(Self {
                path,
                format,
                size_bytes: upload.size_bytes,
                width: upload.width,
                height: upload.height,
            }),
            None => Err(ValidationError::UnsupportedImageFormat),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub point_id: RefreshmentPointId,
    pub image: BannerImage,
    pub created_at: Timestamp,
}

impl Banner {
    /// Validate `upload` and create a banner for `point_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] when the image breaks a rule.
    pub fn new(point_id: RefreshmentPointId, upload: ImageUpload) -> Result<Self, CasebookError> {
        Ok(Self {
            id: BannerId::new(),
            point_id,
            image: upload.try_into()?,
            created_at: now(),
        })
    }
}
