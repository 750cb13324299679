//! Redemption code generation.

use perkpass_server::services::codes::{self, CodeKind};
use tracing::info;

/// Generate `count` codes of `kind` and log each one.
///
/// # Errors
///
/// Returns an error for an unknown kind or invalid custom-code parameters.
pub fn generate(
    kind: &str,
    prefix: Option<&str>,
    length: Option<usize>,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: CodeKind = kind.parse()?;
    for _ in 0..count {
        let code = codes::generate(kind, prefix, length)?;
        info!("{code}");
    }
    Ok(())
}
