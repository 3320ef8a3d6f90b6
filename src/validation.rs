//! Input validation for ids used in file path construction.
//!
//! Record ids and watch names become file and directory names under the
//! snapshot root, so they are validated before any path is built from
//! them, preventing path traversal and unportable names.

use anyhow::{bail, Result};

/// Maximum allowed length for record ids and watch names.
pub const MAX_ID_LENGTH: usize = 128;

/// Reserved names that cannot be used as ids (case-insensitive).
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
    "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validates that an id is safe for use as a file name.
///
/// An id is valid if it is non-empty, at most [`MAX_ID_LENGTH`] characters,
/// does not start with a dot, contains only alphanumeric characters, dots,
/// dashes, and underscores, and does not use a reserved system name.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("id cannot be empty");
    }

    if id.len() > MAX_ID_LENGTH {
        bail!("id too long: {} characters (max {})", id.len(), MAX_ID_LENGTH);
    }

    if id.starts_with('.') {
        bail!("id '{id}' cannot start with a dot");
    }

    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if !valid_chars {
        bail!(
            "id '{id}' contains invalid characters. Use only alphanumeric characters, \
             dots (.), dashes (-), and underscores (_)"
        );
    }

    let id_lower = id.to_lowercase();
    if RESERVED_NAMES.contains(&id_lower.as_str()) {
        bail!("id '{id}' uses a reserved name");
    }

    Ok(())
}
