use jwt_simple::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::prelude::*;

mod create;
pub mod htm;
pub mod htu;
pub mod options;
mod parse;

/// 'typ' header of every DPoP proof
pub(crate) const TYP: &str = "dpop+jwt";

/// Claims required of a proof for it to be matched against an HTTP request
pub trait HttpTargetClaims {
    /// 'htm' claim, empty when absent
    fn htm(&self) -> &str;
    /// 'htu' claim, empty when absent
    fn htu(&self) -> &str;
}

/// Custom claims of a DPoP proof as specified in [RFC 9449 Section 4.2][1]. Registered claims
/// (`jti`, `iat`, `nonce`...) live in the enclosing [JWTClaims].
///
/// [1]: https://www.rfc-editor.org/rfc/rfc9449.html#section-4.2
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct ProofClaims {
    /// The value of the HTTP method of the request to which the proof is attached
    #[serde(default)]
    pub htm: String,
    /// The HTTP target URI of the request to which the proof is attached, without query and fragment
    #[serde(default)]
    pub htu: String,
    /// Hash of the access token presented along with the proof
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ath: Option<String>,
    /// Arbitrary claims
    #[serde(flatten)]
    pub extra_claims: Map<String, Value>,
}

impl ProofClaims {
    /// Claims of a proof for the request `htm` `htu`
    pub fn new(htm: Htm, htu: impl Into<Htu>) -> Self {
        Self {
            htm: htm.to_string(),
            htu: htu.into().to_string(),
            ..Default::default()
        }
    }

    /// Binds the proof to `access_token`
    pub fn with_access_token(self, access_token: &str) -> Self {
        Self {
            ath: Some(access_token_hash(access_token)),
            ..self
        }
    }

    /// Adds a claim not defined by DPoP
    pub fn with_extra_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_claims.insert(name.into(), value.into());
        self
    }

    /// Wraps into registered claims with a fresh random 'jti', an 'iat' of now and the server
    /// provided 'nonce' if any
    pub fn into_jwt_claims(self, nonce: Option<String>) -> JWTClaims<Self> {
        let mut claims = Claims::with_custom_claims(self, Duration::from_secs(0)).with_jwt_id(new_jti());
        claims.expires_at = None;
        claims.invalid_before = None;
        match nonce {
            Some(nonce) => claims.with_nonce(nonce),
            None => claims,
        }
    }
}

fn new_jti() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl HttpTargetClaims for ProofClaims {
    fn htm(&self) -> &str {
        &self.htm
    }

    fn htu(&self) -> &str {
        &self.htu
    }
}

impl HttpTargetClaims for Value {
    fn htm(&self) -> &str {
        self.get("htm").and_then(Value::as_str).unwrap_or_default()
    }

    fn htu(&self) -> &str {
        self.get("htu").and_then(Value::as_str).unwrap_or_default()
    }
}

/// A DPoP proof whose signature and claims have been verified
#[derive(Debug, Clone)]
pub struct Proof<C = ProofClaims> {
    pub(crate) token: String,
    pub(crate) alg: JwsAlgorithm,
    pub(crate) jwk: Jwk,
    pub(crate) claims: JWTClaims<C>,
    pub(crate) thumbprint: JwkThumbprint,
}

impl<C> Proof<C> {
    /// The compact token as received
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Signature algorithm
    pub fn alg(&self) -> JwsAlgorithm {
        self.alg
    }

    /// Public key from the 'jwk' header, trimmed to its required members
    pub fn jwk(&self) -> &Jwk {
        &self.jwk
    }

    /// Verified claims
    pub fn claims(&self) -> &JWTClaims<C> {
        &self.claims
    }

    /// Thumbprint of the key which signed this proof. Issue access tokens bound to it
    pub fn thumbprint(&self) -> &JwkThumbprint {
        &self.thumbprint
    }
}
