//! Short code generation and alias validation.
//!
//! Generated codes are random and URL-safe; user-supplied aliases are
//! checked against a character set and the reserved routes.

use crate::error::AppError;
use base64::Engine as _;
use serde_json::json;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 9;

const ALIAS_MIN_LEN: usize = 3;
const ALIAS_MAX_LEN: usize = 50;

/// Path segments served by the application itself.
pub const RESERVED_CODES: &[&str] = &[
    "login",
    "logout",
    "signup",
    "dashboard",
    "api",
    "health",
    "static",
];

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 12-character code.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}

/// Returns the alias verbatim when present and non-empty, else a fresh code.
///
/// Does not check uniqueness; callers rely on the store for that.
pub fn generate_short_code(alias: Option<&str>) -> String {
    match alias {
        Some(alias) if !alias.is_empty() => alias.to_string(),
        _ => generate_code(),
    }
}

/// Validates a user-provided alias.
///
/// # Rules
///
/// - Length: 3-50 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.len() < ALIAS_MIN_LEN || alias.len() > ALIAS_MAX_LEN {
        return Err(AppError::bad_request(
            "Custom alias must be 3-50 characters",
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters, digits, hyphens and underscores",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
