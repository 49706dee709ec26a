//! `Authorization: <scheme> <token>` parsing.
//!
//! Only the shape of the header is checked here. The token itself is handed
//! back verbatim and validated by [`super::validator::JwtValidator`].

use crate::error::AuthError;

/// Returns the token part of an `Authorization` header value.
///
/// - `None` → `MissingHeader`
/// - anything other than exactly two whitespace-separated parts → `MalformedHeader`
/// - a scheme that is not `prefix` (ASCII case-insensitive) → `UnsupportedScheme`
pub fn token_from_header<'a>(value: Option<&'a str>, prefix: &str) -> Result<&'a str, AuthError> {
    let value = value.ok_or(AuthError::MissingHeader)?;

    let mut parts = value.split_whitespace();
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthError::MalformedHeader),
    };

    if !scheme.eq_ignore_ascii_case(prefix) {
        return Err(AuthError::UnsupportedScheme {
            scheme: scheme.to_string(),
        });
    }

    Ok(token)
}
