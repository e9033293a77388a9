// ABOUTME: Content parts sent to the model in a single user turn
// ABOUTME: Text parts and JPEG/PNG image attachments sniffed from file content
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Raster formats accepted for photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// JPEG (`.jpg`, `.jpeg`)
    Jpeg,
    /// PNG (`.png`)
    Png,
}

impl ImageFormat {
    /// MIME type sent alongside the image bytes
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Detect the format from the leading bytes
    ///
    /// # Errors
    ///
    /// Returns an invalid-format error for anything other than JPEG or PNG.
    pub fn sniff(bytes: &[u8]) -> AppResult<Self> {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Jpeg) => Ok(Self::Jpeg),
            Ok(image::ImageFormat::Png) => Ok(Self::Png),
            Ok(other) => Err(AppError::invalid_format(format!(
                "unsupported image format {other:?}; use a JPEG or PNG photo"
            ))),
            Err(_) => Err(AppError::invalid_format(
                "file is not a recognizable image; use a JPEG or PNG photo",
            )),
        }
    }
}

/// A photo attached to a submission
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Wrap raw bytes after checking their format
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are empty or not a JPEG/PNG image.
    pub fn from_bytes(bytes: Vec<u8>) -> AppResult<Self> {
        if bytes.is_empty() {
            return Err(AppError::invalid_input("image file is empty"));
        }
        let format = ImageFormat::sniff(&bytes)?;
        Ok(Self { format, bytes })
    }

    /// Read and check an image file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JPEG/PNG image.
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::invalid_input(format!("cannot read image {}: {e}", path.display()))
                .with_source(e)
        })?;
        let attachment = Self::from_bytes(bytes)?;
        debug!(
            path = %path.display(),
            mime = attachment.format.mime_type(),
            size = attachment.bytes.len(),
            "Loaded image attachment"
        );
        Ok(attachment)
    }

    /// Detected format
    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    /// Raw image bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64 payload for inline transport
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl Debug for ImageAttachment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ImageAttachment")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One part of the user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Plain text
    Text(String),
    /// Inline image
    Image(ImageAttachment),
}

impl ContentPart {
    /// Create a text part
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Text content, if this is a text part
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }

    /// Whether this is an image part
    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_SIGNATURE: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn test_sniff_accepts_png_and_jpeg() {
        assert_eq!(ImageFormat::sniff(&PNG_SIGNATURE).unwrap(), ImageFormat::Png);
        assert_eq!(ImageFormat::sniff(&JPEG_SIGNATURE).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_sniff_rejects_other_content() {
        let gif = b"GIF89a\x01\x00\x01\x00";
        assert_eq!(
            ImageFormat::sniff(gif).unwrap_err().code,
            ErrorCode::InvalidFormat
        );
        assert_eq!(
            ImageFormat::sniff(b"just some text").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
    }

    #[test]
    fn test_attachment_encodes_base64() {
        let attachment = ImageAttachment::from_bytes(PNG_SIGNATURE.to_vec()).unwrap();
        assert_eq!(attachment.format().mime_type(), "image/png");
        assert_eq!(attachment.to_base64(), "iVBORw0KGgo=");
    }

    #[test]
    fn test_empty_attachment_is_rejected() {
        let err = ImageAttachment::from_bytes(Vec::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
