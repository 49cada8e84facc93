//! HTTP names a DPoP proof and a bound access token travel with, see [RFC 9449 Section 7.1][1]
//!
//! [1]: https://www.rfc-editor.org/rfc/rfc9449.html#section-7.1

/// Request header carrying the proof
pub const DPOP_HEADER: &str = "DPoP";

/// Response header carrying a server provided nonce
pub const DPOP_NONCE_HEADER: &str = "DPoP-Nonce";

/// `Authorization` scheme of a DPoP bound access token
pub const AUTHORIZATION_SCHEME: &str = "DPoP";

/// Extracts the access token from an `Authorization: DPoP <token>` header value. The scheme is
/// case-insensitive, `Bearer` tokens are not DPoP bound hence ignored.
pub fn bound_access_token(authorization: &str) -> Option<&str> {
    let (scheme, token) = authorization.trim().split_once(' ')?;
    let token = token.trim_start();
    (scheme.eq_ignore_ascii_case(AUTHORIZATION_SCHEME) && !token.is_empty() && !token.contains(' ')).then_some(token)
}
