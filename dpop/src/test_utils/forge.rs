use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use jwt_simple::prelude::*;
use p256::ecdsa::{Signature, SigningKey, signature::Signer};
use serde_json::{Value, json};

use super::utils::*;

/// Signs arbitrary ES256 proofs, including malformed ones `create_proof` would never produce
pub struct Forge {
    kp: ES256KeyPair,
}

impl Default for Forge {
    fn default() -> Self {
        Self {
            kp: ES256KeyPair::generate(),
        }
    }
}

impl Forge {
    pub fn to_jwk(&self) -> Jwk {
        crate::prelude::TryIntoJwk::try_into_jwk(self.kp.public_key()).unwrap()
    }

    /// 'jwk' header members
    pub fn jwk(&self) -> Value {
        match self.to_jwk().algorithm {
            AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters { x, y, .. }) => json!({
                "kty": "EC",
                "crv": "P-256",
                "x": x,
                "y": y,
            }),
            _ => unreachable!(),
        }
    }

    pub fn thumbprint(&self) -> crate::prelude::JwkThumbprint {
        crate::prelude::JwkThumbprint::generate(&self.to_jwk()).unwrap()
    }

    /// A valid proof header
    pub fn header(&self) -> Value {
        json!({
            "typ": "dpop+jwt",
            "alg": "ES256",
            "jwk": self.jwk(),
        })
    }

    /// Valid proof claims for 'POST' [HTU] issued at `iat`
    pub fn claims(&self, iat: UnixTimeStamp) -> Value {
        json!({
            "htm": "POST",
            "htu": HTU,
            "jti": "e1j3V_bKic8-LAEB",
            "iat": iat.as_secs(),
        })
    }

    pub fn sign(&self, header: &Value, claims: &Value) -> String {
        self.sign_with(self, header, claims)
    }

    /// Signs with the key of `signer` regardless of the 'jwk' in `header`
    pub fn sign_with(&self, signer: &Self, header: &Value, claims: &Value) -> String {
        let header = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(header).unwrap());
        let claims = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
        let signing_input = format!("{header}.{claims}");
        let sk = SigningKey::from_slice(&signer.kp.to_bytes()).unwrap();
        let signature: Signature = sk.sign(signing_input.as_bytes());
        let signature = BASE64_URL_SAFE_NO_PAD.encode(signature.to_bytes());
        format!("{signing_input}.{signature}")
    }
}
