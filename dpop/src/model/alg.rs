use std::fmt::{Display, Formatter};

use crate::prelude::*;

/// Signature algorithms a DPoP proof may be signed with
///
/// Specified in [RFC 7518 Section 3.1][1] and [RFC 8037 Section 3.1][2]. Symmetric algorithms and
/// `none` are never accepted as mandated by [RFC 9449 Section 4.2][3].
///
/// [1]: https://tools.ietf.org/html/rfc7518#section-3.1
/// [2]: https://tools.ietf.org/html/rfc8037#section-3.1
/// [3]: https://www.rfc-editor.org/rfc/rfc9449.html#section-4.2
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum JwsAlgorithm {
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
    /// ECDSA using P-521 and SHA-512
    ES512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    PS256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    PS384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    PS512,
    /// EdDSA using Ed25519
    EdDSA,
}

impl JwsAlgorithm {
    /// Every supported algorithm
    pub const ALL: [Self; 10] = [
        Self::ES256,
        Self::ES384,
        Self::ES512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::PS256,
        Self::PS384,
        Self::PS512,
        Self::EdDSA,
    ];

    /// Name of the algorithm in the 'alg' header
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::EdDSA => "EdDSA",
        }
    }

    /// Whether the algorithm signs with an RSA key
    pub fn is_rsa(&self) -> bool {
        matches!(
            self,
            Self::RS256 | Self::RS384 | Self::RS512 | Self::PS256 | Self::PS384 | Self::PS512
        )
    }
}

impl Display for JwsAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JwsAlgorithm {
    type Error = RustyDpopError;

    fn try_from(alg: &str) -> RustyDpopResult<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == alg)
            .ok_or_else(|| DpopCause::UnsupportedAlgorithm(alg.to_string()).into())
    }
}

#[cfg(test)]
impl JwsAlgorithm {
    /// Utility for listing JWA signature schemes rejected for DPoP
    pub const UNSUPPORTED: [&'static str; 5] = ["HS256", "HS384", "HS512", "none", "ES256K"];
}
