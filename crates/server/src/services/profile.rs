//! Profile picture validation.
//!
//! A picture is accepted as either a web URL or an inline base64 image:
//!
//! ```text
//! https://cdn.example.com/me.jpg
//! data:image/jpeg;base64,/9j/4AAQSkZJRg...
//! ```

use base64::{Engine, engine::general_purpose::STANDARD};
use url::Url;

/// Largest decoded inline image accepted.
pub const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;

/// Request body limit for picture uploads: a maximal image in base64 plus
/// the surrounding JSON.
pub const MAX_PICTURE_REQUEST_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PictureError {
    #[error("profile picture is required")]
    Empty,
    #[error("profile picture must be an http(s) URL or a base64 image")]
    UnsupportedFormat,
    #[error("profile picture is not valid base64")]
    InvalidBase64,
    #[error("profile picture exceeds 5 MiB")]
    TooLarge,
}

/// Check a submitted picture and return it trimmed.
///
/// # Errors
///
/// Returns a [`PictureError`] describing why the picture was rejected.
pub fn validate_picture(picture: &str) -> Result<String, PictureError> {
    let picture = picture.trim();
    if picture.is_empty() {
        return Err(PictureError::Empty);
    }

    if let Some(rest) = picture.strip_prefix("data:") {
        let (media_type, payload) = rest
            .split_once(',')
            .ok_or(PictureError::UnsupportedFormat)?;
        let is_base64_image = media_type.starts_with("image/") && media_type.ends_with(";base64");
        if !is_base64_image {
            return Err(PictureError::UnsupportedFormat);
        }
        // Each 4 base64 chars decode to at most 3 bytes.
        if payload.len() / 4 * 3 > MAX_PICTURE_BYTES + 3 {
            return Err(PictureError::TooLarge);
        }
        let decoded = STANDARD
            .decode(payload)
            .map_err(|_| PictureError::InvalidBase64)?;
        if decoded.len() > MAX_PICTURE_BYTES {
            return Err(PictureError::TooLarge);
        }
        return Ok(picture.to_owned());
    }

    match Url::parse(picture) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(picture.to_owned())
        }
        _ => Err(PictureError::UnsupportedFormat),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_url() {
        assert_eq!(
            validate_picture(" https://cdn.example.com/me.jpg ").unwrap(),
            "https://cdn.example.com/me.jpg"
        );
    }

    #[test]
    fn test_accepts_inline_image() {
        let payload = STANDARD.encode(b"\x89PNG\r\n\x1a\nfake");
        let picture = format!("data:image/png;base64,{payload}");
        assert_eq!(validate_picture(&picture).unwrap(), picture);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(validate_picture(""), Err(PictureError::Empty));
        assert_eq!(
            validate_picture("ftp://example.com/me.jpg"),
            Err(PictureError::UnsupportedFormat)
        );
        assert_eq!(
            validate_picture("data:text/plain;base64,aGk="),
            Err(PictureError::UnsupportedFormat)
        );
        assert_eq!(
            validate_picture("data:image/png;base64,@@@"),
            Err(PictureError::InvalidBase64)
        );
    }

    #[test]
    fn test_rejects_oversized_image() {
        let payload = STANDARD.encode(vec![0_u8; MAX_PICTURE_BYTES + 1]);
        let picture = format!("data:image/jpeg;base64,{payload}");
        assert_eq!(validate_picture(&picture), Err(PictureError::TooLarge));
    }
}
