//! Binding of a verified proof to a DPoP bound access token

use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use jwt_simple::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Digest;

use crate::prelude::*;

/// base64url encoded SHA-256 hash of an access token, the expected value of the 'ath' claim
pub fn access_token_hash(access_token: &str) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(sha2::Sha256::digest(access_token.as_bytes()))
}

/// Proof claims exposing the hash of the access token the proof is presented with
pub trait AccessTokenHashClaims {
    /// 'ath' claim, empty when absent
    fn access_token_hash(&self) -> RustyDpopResult<&str>;
}

/// Access token claims exposing the thumbprint of the key the token is bound to
pub trait BoundClaims {
    /// 'cnf.jkt' claim, empty when absent
    fn jwk_thumbprint(&self) -> RustyDpopResult<&str>;
}

impl AccessTokenHashClaims for ProofClaims {
    fn access_token_hash(&self) -> RustyDpopResult<&str> {
        Ok(self.ath.as_deref().unwrap_or_default())
    }
}

impl AccessTokenHashClaims for Value {
    fn access_token_hash(&self) -> RustyDpopResult<&str> {
        match self.get("ath") {
            None | Some(Value::Null) => Ok(""),
            Some(Value::String(ath)) => Ok(ath),
            Some(_) => Err(DpopCause::IncorrectClaimsType.into()),
        }
    }
}

impl<T: AccessTokenHashClaims> AccessTokenHashClaims for JWTClaims<T> {
    fn access_token_hash(&self) -> RustyDpopResult<&str> {
        self.custom.access_token_hash()
    }
}

impl BoundClaims for Value {
    fn jwk_thumbprint(&self) -> RustyDpopResult<&str> {
        self.get("cnf")
            .and_then(|cnf| cnf.get("jkt"))
            .and_then(Value::as_str)
            .ok_or_else(|| DpopCause::IncorrectAccessTokenClaimsType.into())
    }
}

impl<T: BoundClaims> BoundClaims for JWTClaims<T> {
    fn jwk_thumbprint(&self) -> RustyDpopResult<&str> {
        self.custom.jwk_thumbprint()
    }
}

/// Confirmation method of a DPoP bound access token as specified in [RFC 9449 Section 6.1][1]
///
/// [1]: https://www.rfc-editor.org/rfc/rfc9449.html#section-6.1
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Thumbprint of the client key
    pub jkt: JwkThumbprint,
}

/// Custom claims of an access token bound to a client key
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoundAccessTokenClaims {
    /// Confirmation
    pub cnf: Confirmation,
    /// Arbitrary claims
    #[serde(flatten)]
    pub extra_claims: Map<String, Value>,
}

impl BoundAccessTokenClaims {
    /// Binds an access token to the key of a verified proof
    pub fn new(jkt: JwkThumbprint) -> Self {
        Self {
            cnf: Confirmation { jkt },
            extra_claims: Map::new(),
        }
    }

    /// Checks that the token is actually bound
    pub fn validate(&self) -> RustyDpopResult<()> {
        if self.cnf.jkt.is_empty() {
            return Err(DpopCause::IncorrectAccessTokenClaimsType.into());
        }
        Ok(())
    }
}

impl BoundClaims for BoundAccessTokenClaims {
    fn jwk_thumbprint(&self) -> RustyDpopResult<&str> {
        Ok(self.cnf.jkt.as_str())
    }
}

impl<C: AccessTokenHashClaims> Proof<C> {
    /// Verifies that this proof goes along with a DPoP bound access token as specified in
    /// [RFC 9449 Section 7.1][1]
    ///
    /// # Arguments
    /// * `access_token_hash` - SHA-256 hash of the access token, see [access_token_hash]
    /// * `bound` - claims of the access token, already verified by the caller
    ///
    /// [1]: https://www.rfc-editor.org/rfc/rfc9449.html#section-7.1
    pub fn validate<B: BoundClaims + ?Sized>(&self, access_token_hash: &[u8], bound: &B) -> RustyDpopResult<()> {
        let result = self.verify_binding(access_token_hash, bound);
        if let Err(e) = &result {
            tracing::debug!(cause = %e, jkt = %self.thumbprint, "rejected DPoP bound access token");
        }
        result
    }

    fn verify_binding<B: BoundClaims + ?Sized>(&self, access_token_hash: &[u8], bound: &B) -> RustyDpopResult<()> {
        let ath = self
            .claims
            .custom
            .access_token_hash()
            .map_err(RustyDpopError::into_invalid_proof)?;
        if ath.is_empty() {
            return Err(RustyDpopError::invalid_proof(DpopCause::MissingAth));
        }
        if ath.as_bytes() != access_token_hash {
            return Err(RustyDpopError::invalid_proof(DpopCause::AthMismatch));
        }

        if self.thumbprint.is_empty() {
            return Err(RustyDpopError::invalid_proof(DpopCause::MissingJwk));
        }
        let jkt = bound
            .jwk_thumbprint()
            .map_err(|e| e.joined(DpopCause::IncorrectAccessTokenClaimsType))?;
        if jkt != self.thumbprint.as_str() {
            return Err(RustyDpopError::invalid_proof(DpopCause::JwkMismatch));
        }
        Ok(())
    }
}
