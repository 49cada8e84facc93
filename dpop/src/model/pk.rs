use jwt_simple::prelude::*;
use serde::{Serialize, de::DeserializeOwned};

use crate::prelude::*;

/// RSA public key components as minimal-width big-endian unsigned integers
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RsaPublicKey {
    /// Modulus
    pub n: Vec<u8>,
    /// Public exponent
    pub e: Vec<u8>,
}

impl RsaPublicKey {
    /// Strips any leading zero byte from the components
    pub fn new(n: impl AsRef<[u8]>, e: impl AsRef<[u8]>) -> Self {
        Self {
            n: trim_leading_zeros(n.as_ref()).to_vec(),
            e: trim_leading_zeros(e.as_ref()).to_vec(),
        }
    }
}

fn trim_leading_zeros(i: &[u8]) -> &[u8] {
    let start = i.iter().position(|b| *b != 0).unwrap_or(i.len());
    &i[start..]
}

/// Public half of the key pair a client signs its proofs with
#[derive(Debug, Clone)]
pub enum DpopPublicKey {
    /// NIST P-256 key verifying ES256 signatures
    P256(ES256PublicKey),
    /// NIST P-384 key verifying ES384 signatures
    P384(ES384PublicKey),
    /// NIST P-521 key verifying ES512 signatures
    P521(ES512PublicKey),
    /// RSA key verifying RS* and PS* signatures
    Rsa(RsaPublicKey),
    /// Ed25519 key verifying EdDSA signatures
    Ed25519(Ed25519PublicKey),
}

impl DpopPublicKey {
    /// Extracts the public key of a key pair in PEM format
    pub fn from_pem(alg: JwsAlgorithm, kp: &Pem) -> RustyDpopResult<Self> {
        Ok(match alg {
            JwsAlgorithm::ES256 => Self::P256(ES256KeyPair::from_pem(kp)?.public_key()),
            JwsAlgorithm::ES384 => Self::P384(ES384KeyPair::from_pem(kp)?.public_key()),
            JwsAlgorithm::ES512 => Self::P521(ES512KeyPair::from_pem(kp)?.public_key()),
            JwsAlgorithm::EdDSA => Self::Ed25519(Ed25519KeyPair::from_pem(kp)?.public_key()),
            // all RSA flavours share the same key material
            _ => {
                let components = RS256KeyPair::from_pem(kp)?.public_key().to_components();
                Self::Rsa(RsaPublicKey::new(components.n, components.e))
            }
        })
    }

    /// JWK 'kty' of this key
    pub fn kty(&self) -> &'static str {
        match self {
            Self::P256(_) | Self::P384(_) | Self::P521(_) => "EC",
            Self::Rsa(_) => "RSA",
            Self::Ed25519(_) => "OKP",
        }
    }

    /// Whether signatures made with `alg` can be verified with this key
    pub fn supports(&self, alg: JwsAlgorithm) -> bool {
        match self {
            Self::P256(_) => alg == JwsAlgorithm::ES256,
            Self::P384(_) => alg == JwsAlgorithm::ES384,
            Self::P521(_) => alg == JwsAlgorithm::ES512,
            Self::Rsa(_) => alg.is_rsa(),
            Self::Ed25519(_) => alg == JwsAlgorithm::EdDSA,
        }
    }

    /// Verifies the signature of a compact token and deserializes its claims.
    ///
    /// Temporal checks are left to the caller through `options`.
    pub(crate) fn verify_token<C>(
        &self,
        alg: JwsAlgorithm,
        token: &str,
        options: VerificationOptions,
    ) -> RustyDpopResult<JWTClaims<C>>
    where
        C: Serialize + DeserializeOwned,
    {
        let options = Some(options);
        Ok(match (self, alg) {
            (Self::P256(pk), JwsAlgorithm::ES256) => pk.verify_token::<C>(token, options)?,
            (Self::P384(pk), JwsAlgorithm::ES384) => pk.verify_token::<C>(token, options)?,
            (Self::P521(pk), JwsAlgorithm::ES512) => pk.verify_token::<C>(token, options)?,
            (Self::Ed25519(pk), JwsAlgorithm::EdDSA) => pk.verify_token::<C>(token, options)?,
            (Self::Rsa(pk), JwsAlgorithm::RS256) => {
                RS256PublicKey::from_components(&pk.n, &pk.e)?.verify_token::<C>(token, options)?
            }
            (Self::Rsa(pk), JwsAlgorithm::RS384) => {
                RS384PublicKey::from_components(&pk.n, &pk.e)?.verify_token::<C>(token, options)?
            }
            (Self::Rsa(pk), JwsAlgorithm::RS512) => {
                RS512PublicKey::from_components(&pk.n, &pk.e)?.verify_token::<C>(token, options)?
            }
            (Self::Rsa(pk), JwsAlgorithm::PS256) => {
                PS256PublicKey::from_components(&pk.n, &pk.e)?.verify_token::<C>(token, options)?
            }
            (Self::Rsa(pk), JwsAlgorithm::PS384) => {
                PS384PublicKey::from_components(&pk.n, &pk.e)?.verify_token::<C>(token, options)?
            }
            (Self::Rsa(pk), JwsAlgorithm::PS512) => {
                PS512PublicKey::from_components(&pk.n, &pk.e)?.verify_token::<C>(token, options)?
            }
            (key, alg) => {
                let reason = format!("a '{}' key cannot verify '{alg}' signatures", key.kty());
                return Err(DpopCause::InvalidToken(reason).into());
            }
        })
    }
}

impl PartialEq for DpopPublicKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::P256(a), Self::P256(b)) => a.to_bytes() == b.to_bytes(),
            (Self::P384(a), Self::P384(b)) => a.to_bytes() == b.to_bytes(),
            (Self::P521(a), Self::P521(b)) => a.to_bytes() == b.to_bytes(),
            (Self::Rsa(a), Self::Rsa(b)) => a == b,
            (Self::Ed25519(a), Self::Ed25519(b)) => a.to_bytes() == b.to_bytes(),
            _ => false,
        }
    }
}
