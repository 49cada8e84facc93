use std::fmt::Formatter;

/// UTF-8 String in the PEM (Privacy-Enhanced Mail) format holding a private key
///
/// Specified in [RFC 7468: Textual Encodings of PKIX, PKCS, and CMS Structures][1]
///
/// [1]: https://tools.ietf.org/html/rfc7468
#[derive(Clone, Eq, PartialEq, derive_more::Deref)]
pub struct Pem(String);

impl From<String> for Pem {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Pem {
    fn from(s: &str) -> Self {
        s.to_string().into()
    }
}

impl std::fmt::Debug for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Pem(..)")
    }
}
