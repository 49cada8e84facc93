use jwt_simple::prelude::*;
use serde::{Serialize, de::DeserializeOwned};

use super::TYP;
use crate::prelude::*;

impl RustyDpop {
    /// Signs a DPoP proof with the private key `kp` in PEM format. Its public key is embedded in
    /// the 'jwk' header.
    ///
    /// # Arguments
    /// * `alg` - signature algorithm, has to match the type of `kp`
    /// * `claims` - see [ProofClaims::into_jwt_claims]
    /// * `kp` - private key of the client
    pub fn create_proof<C>(alg: JwsAlgorithm, claims: JWTClaims<C>, kp: &Pem) -> RustyDpopResult<String>
    where
        C: Serialize + DeserializeOwned,
    {
        let header = JWTHeader {
            algorithm: alg.to_string(),
            signature_type: Some(TYP.to_string()),
            ..Default::default()
        };
        let with_jwk = |jwk: Jwk| KeyMetadata::default().with_public_key(jwk);
        let proof = match alg {
            JwsAlgorithm::ES256 => {
                let mut kp = ES256KeyPair::from_pem(kp)?;
                let jwk = kp.public_key().try_into_jwk()?;
                kp.attach_metadata(with_jwk(jwk))?;
                kp.sign_with_header(Some(claims), header)?
            }
            JwsAlgorithm::ES384 => {
                let mut kp = ES384KeyPair::from_pem(kp)?;
                let jwk = kp.public_key().try_into_jwk()?;
                kp.attach_metadata(with_jwk(jwk))?;
                kp.sign_with_header(Some(claims), header)?
            }
            JwsAlgorithm::ES512 => {
                let mut kp = ES512KeyPair::from_pem(kp)?;
                let jwk = kp.public_key().try_into_jwk()?;
                kp.attach_metadata(with_jwk(jwk))?;
                kp.sign_with_header(Some(claims), header)?
            }
            JwsAlgorithm::EdDSA => {
                let mut kp = Ed25519KeyPair::from_pem(kp)?;
                let jwk = kp.public_key().try_into_jwk()?;
                kp.attach_metadata(with_jwk(jwk))?;
                kp.sign_with_header(Some(claims), header)?
            }
            JwsAlgorithm::RS256 => {
                let mut kp = RS256KeyPair::from_pem(kp)?;
                let c = kp.public_key().to_components();
                kp.attach_metadata(with_jwk(RsaPublicKey::new(c.n, c.e).try_into_jwk()?))?;
                kp.sign_with_header(Some(claims), header)?
            }
            JwsAlgorithm::RS384 => {
                let mut kp = RS384KeyPair::from_pem(kp)?;
                let c = kp.public_key().to_components();
                kp.attach_metadata(with_jwk(RsaPublicKey::new(c.n, c.e).try_into_jwk()?))?;
                kp.sign_with_header(Some(claims), header)?
            }
            JwsAlgorithm::RS512 => {
                let mut kp = RS512KeyPair::from_pem(kp)?;
                let c = kp.public_key().to_components();
                kp.attach_metadata(with_jwk(RsaPublicKey::new(c.n, c.e).try_into_jwk()?))?;
                kp.sign_with_header(Some(claims), header)?
            }
            JwsAlgorithm::PS256 => {
                let mut kp = PS256KeyPair::from_pem(kp)?;
                let c = kp.public_key().to_components();
                kp.attach_metadata(with_jwk(RsaPublicKey::new(c.n, c.e).try_into_jwk()?))?;
                kp.sign_with_header(Some(claims), header)?
            }
            JwsAlgorithm::PS384 => {
                let mut kp = PS384KeyPair::from_pem(kp)?;
                let c = kp.public_key().to_components();
                kp.attach_metadata(with_jwk(RsaPublicKey::new(c.n, c.e).try_into_jwk()?))?;
                kp.sign_with_header(Some(claims), header)?
            }
            JwsAlgorithm::PS512 => {
                let mut kp = PS512KeyPair::from_pem(kp)?;
                let c = kp.public_key().to_components();
                kp.attach_metadata(with_jwk(RsaPublicKey::new(c.n, c.e).try_into_jwk()?))?;
                kp.sign_with_header(Some(claims), header)?
            }
        };
        Ok(proof)
    }
}
