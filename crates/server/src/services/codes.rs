//! Redemption code generation.
//!
//! Codes use uppercase letters and digits only:
//!
//! - full: `XXXX-XXXX`
//! - short: six characters
//! - custom: an upper-cased prefix followed by N characters (default 6)

use rand::Rng;
use serde::{Deserialize, Serialize};

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a short code and the default random tail of a custom code.
pub const SHORT_CODE_LENGTH: usize = 6;

/// Longest random tail a custom code may ask for.
pub const MAX_CUSTOM_LENGTH: usize = 32;

/// Shape of a generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    #[default]
    Full,
    Short,
    Custom,
}

impl std::str::FromStr for CodeKind {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "short" => Ok(Self::Short),
            "custom" => Ok(Self::Custom),
            other => Err(CodeError::UnknownKind(other.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("unknown code kind: {0}")]
    UnknownKind(String),
    #[error("custom codes need a prefix")]
    MissingPrefix,
    #[error("code length must be between 1 and 32")]
    InvalidLength,
}

fn random_chars(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET.get(idx).map_or('0', |&b| char::from(b))
        })
        .collect()
}

/// A code like `K7QX-2M9A`.
#[must_use]
pub fn full_code() -> String {
    format!("{}-{}", random_chars(4), random_chars(4))
}

/// A six-character code like `K7QX2M`.
#[must_use]
pub fn short_code() -> String {
    random_chars(SHORT_CODE_LENGTH)
}

/// `prefix` upper-cased followed by `length` random characters.
///
/// # Errors
///
/// Returns [`CodeError`] for a blank prefix or an out-of-range length.
pub fn custom_code(prefix: &str, length: usize) -> Result<String, CodeError> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(CodeError::MissingPrefix);
    }
    if length == 0 || length > MAX_CUSTOM_LENGTH {
        return Err(CodeError::InvalidLength);
    }
    Ok(format!("{}{}", prefix.to_uppercase(), random_chars(length)))
}

/// Generate a code of the requested kind. `prefix` and `length` only apply
/// to custom codes.
///
/// # Errors
///
/// Returns [`CodeError`] when a custom code's parameters are invalid.
pub fn generate(kind: CodeKind, prefix: Option<&str>, length: Option<usize>) -> Result<String, CodeError> {
    match kind {
        CodeKind::Full => Ok(full_code()),
        CodeKind::Short => Ok(short_code()),
        CodeKind::Custom => custom_code(
            prefix.ok_or(CodeError::MissingPrefix)?,
            length.unwrap_or(SHORT_CODE_LENGTH),
        ),
    }
}
