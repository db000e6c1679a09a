use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Largest accepted upload: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Image formats accepted by the media endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageType {
    /// Resolve a declared MIME type against the allow-list.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageType::Jpeg),
            "image/png" => Some(ImageType::Png),
            "image/gif" => Some(ImageType::Gif),
            "image/webp" => Some(ImageType::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageType::Jpeg => "jpg",
            ImageType::Png => "png",
            ImageType::Gif => "gif",
            ImageType::Webp => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::Gif => "image/gif",
            ImageType::Webp => "image/webp",
        }
    }
}

/// A file received from the editor, not yet validated.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: Option<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check type and size, returning the image format the file will be stored as.
    pub fn validate(&self, max_bytes: u64) -> Result<ImageType, DomainError> {
        let image_type = ImageType::from_mime(&self.content_type).ok_or_else(|| {
            DomainError::UnsupportedType(
                "Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed.".to_string(),
            )
        })?;

        if self.size() > max_bytes {
            return Err(DomainError::UnsupportedType(format!(
                "File size too large. Maximum size is {}.",
                format_size(max_bytes)
            )));
        }

        if self.bytes.is_empty() {
            return Err(DomainError::Validation("Uploaded file is empty".to_string()));
        }

        Ok(image_type)
    }
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= MIB {
        format!("{:.1}MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{bytes} bytes")
    }
}

/// A stored upload and the public URL it is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMedia {
    pub filename: String,
    pub url: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list() {
        assert_eq!(ImageType::from_mime("image/jpg"), Some(ImageType::Jpeg));
        assert_eq!(ImageType::from_mime("IMAGE/PNG"), Some(ImageType::Png));
        assert_eq!(ImageType::from_mime("image/webp; q=1"), Some(ImageType::Webp));
        assert_eq!(ImageType::from_mime("application/pdf"), None);
        assert_eq!(ImageType::from_mime("image/svg+xml"), None);
    }

    #[test]
    fn test_size_limit_message() {
        let upload = Upload::new(None, "image/png", vec![0; 5]);
        let message = |max| upload.validate(max).unwrap_err().to_string();

        assert!(message(4).ends_with("Maximum size is 4 bytes."));
        assert!(message(2).ends_with("Maximum size is 2 bytes."));
        assert_eq!(format_size(512 * 1024), "512KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5MB");
        assert_eq!(format_size(1536 * 1024), "1.5MB");
        assert_eq!(format_size(1500), "1500 bytes");
    }

    #[test]
    fn test_validate_rejects_type_and_size() {
        let pdf = Upload::new(None, "application/pdf", vec![1, 2, 3]);
        assert!(matches!(pdf.validate(DEFAULT_MAX_UPLOAD_BYTES), Err(DomainError::UnsupportedType(_))));

        let big = Upload::new(None, "image/png", vec![0; 11]);
        assert!(matches!(big.validate(10), Err(DomainError::UnsupportedType(_))));

        let ok = Upload::new(Some("a.png".into()), "image/png", vec![0; 10]);
        assert_eq!(ok.validate(10).unwrap(), ImageType::Png);
    }
}
