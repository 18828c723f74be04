//! Destination URL validation.
//!
//! Destinations are stored exactly as submitted so that a redirect forwards
//! to the very string the owner entered; this module only decides whether
//! the string is acceptable.

use url::Url;

/// Errors that can occur while checking a destination URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DestinationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL contains control characters")]
    ControlCharacter,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Checks that `input` is a non-empty absolute HTTP(S) URL.
///
/// Rejects `javascript:`, `data:`, `file:` and other schemes. Control
/// characters are refused before parsing; the parser would strip tabs and
/// newlines and accept a string that cannot be sent as `Location`.
///
/// # Errors
///
/// See [`DestinationError`].
pub fn validate_destination(input: &str) -> Result<(), DestinationError> {
    if input.trim().is_empty() {
        return Err(DestinationError::Empty);
    }

    if input.chars().any(char::is_control) {
        return Err(DestinationError::ControlCharacter);
    }

    let url = Url::parse(input).map_err(|e| DestinationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(DestinationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(DestinationError::MissingHost);
    }

    Ok(())
}

/// Returns the string to send as `Location` for a stored destination.
///
/// ASCII destinations are returned verbatim; anything else is
/// re-serialized by the URL parser, which percent-encodes non-ASCII
/// characters. `None` means the destination cannot be sent as a header
/// value at all.
pub fn redirect_location(original_url: &str) -> Option<String> {
    if original_url.chars().any(char::is_control) {
        return None;
    }

    if original_url.is_ascii() {
        return Some(original_url.to_string());
    }

    Url::parse(original_url).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_destination("https://example.com/a").is_ok());
        assert!(validate_destination("http://example.com").is_ok());
        assert!(validate_destination("https://EXAMPLE.com:8443/p?q=1#frag").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_destination(""), Err(DestinationError::Empty));
        assert_eq!(validate_destination("   "), Err(DestinationError::Empty));
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_destination("example.com/path"),
            Err(DestinationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            validate_destination("javascript:alert(1)"),
            Err(DestinationError::UnsupportedProtocol)
        );
        assert_eq!(
            validate_destination("ftp://example.com/file"),
            Err(DestinationError::UnsupportedProtocol)
        );
        assert_eq!(
            validate_destination("file:///etc/passwd"),
            Err(DestinationError::UnsupportedProtocol)
        );
    }

    #[test]
    fn test_rejects_control_characters() {
        assert_eq!(
            validate_destination("https://example.com/a\nb"),
            Err(DestinationError::ControlCharacter)
        );
        assert_eq!(
            validate_destination("https://exam\tple.com/"),
            Err(DestinationError::ControlCharacter)
        );
        assert_eq!(
            validate_destination("https://example.com/\u{7f}"),
            Err(DestinationError::ControlCharacter)
        );
    }

    #[test]
    fn test_redirect_location() {
        assert_eq!(
            redirect_location("https://Example.com/a?b=1").as_deref(),
            Some("https://Example.com/a?b=1")
        );
        assert_eq!(
            redirect_location("https://example.com/caf\u{e9}").as_deref(),
            Some("https://example.com/caf%C3%A9")
        );
        assert_eq!(redirect_location("https://example.com/a\r\nSet-Cookie: x=1"), None);
        assert_eq!(redirect_location("https://example.com/\tb"), None);
    }
}
