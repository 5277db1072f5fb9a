//! Bearer credential formatting
//!
//! The session token is opaque to the client. It is attached to upload and
//! recommendation calls as `Authorization: Bearer <token>` and never
//! inspected, refreshed or validated locally.

/// Authorization scheme used for the session token
pub const BEARER_SCHEME: &str = "Bearer";

/// Build the `Authorization` header value for a session token
///
/// # Examples
///
/// ```
/// use bsx_common::api::auth::bearer_header_value;
///
/// assert_eq!(bearer_header_value("abc.def"), "Bearer abc.def");
/// ```
pub fn bearer_header_value(token: &str) -> String {
    format!("{} {}", BEARER_SCHEME, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_uses_bearer_scheme() {
        let header = bearer_header_value("jwt-token-123");
        assert_eq!(header, "Bearer jwt-token-123");
        assert!(header.starts_with(BEARER_SCHEME));
    }
}
