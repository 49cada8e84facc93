//! JWK thumbprint

use std::fmt::{Display, Formatter};

use base64::Engine;
use jwt_simple::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sha2::Digest;

use crate::prelude::*;

/// Represents a [JWK thumbprint][1] as used in the 'jkt' confirmation method of [RFC 9449][2]
///
/// [1]: https://www.rfc-editor.org/rfc/rfc7638.html
/// [2]: https://www.rfc-editor.org/rfc/rfc9449.html#section-6.1
#[derive(
    Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, derive_more::From, derive_more::Into, derive_more::Deref,
)]
#[serde(transparent)]
pub struct JwkThumbprint(String);

impl JwkThumbprint {
    /// base64url encoded SHA-256 hash of the required members of a JWK
    pub fn generate(jwk: &Jwk) -> RustyDpopResult<Self> {
        let json = serde_json::to_vec(&Self::compute_json(jwk)?)?;
        let hash = sha2::Sha256::digest(json);
        Ok(Self(base64::prelude::BASE64_URL_SAFE_NO_PAD.encode(hash)))
    }

    /// Filters out some JWK fields and lexicographically order them as per [RFC 7638 Section 3.2][1]
    ///
    /// [1]: https://www.rfc-editor.org/rfc/rfc7638.html#section-3.2
    fn compute_json(jwk: &Jwk) -> RustyDpopResult<Value> {
        Ok(match jwk.algorithm.clone() {
            AlgorithmParameters::RSA(RSAKeyParameters { key_type, n, e }) => json!({
                "e": e,
                "kty": key_type,
                "n": n,
            }),
            AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters { key_type, curve, x, y }) => json!({
                "crv": curve,
                "kty": key_type,
                "x": x,
                "y": y,
            }),
            AlgorithmParameters::OctetKeyPair(OctetKeyPairParameters { key_type, curve, x }) => json!({
                "crv": curve,
                "kty": key_type,
                "x": x,
            }),
            #[allow(unreachable_patterns)]
            _ => return Err(DpopCause::UnsupportedKeyAlgorithm.into()),
        })
    }

    /// The thumbprint itself
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for JwkThumbprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JwkThumbprint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
