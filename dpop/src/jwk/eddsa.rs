use jwt_simple::prelude::*;

use super::*;

impl TryIntoJwk for Ed25519PublicKey {
    fn try_into_jwk(self) -> RustyDpopResult<Jwk> {
        Ok(Jwk {
            common: RustyJwk::common_parameters(),
            algorithm: AlgorithmParameters::OctetKeyPair(OctetKeyPairParameters {
                key_type: OctetKeyPairType::OctetKeyPair,
                curve: EdwardCurve::Ed25519,
                x: RustyJwk::base64_url_encode(self.to_bytes()),
            }),
        })
    }
}

impl TryFromJwk for Ed25519PublicKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyDpopResult<Self> {
        match &jwk.algorithm {
            AlgorithmParameters::OctetKeyPair(p) => {
                let x = RustyJwk::base64_url_decode(&p.x)?;
                Ed25519PublicKey::from_bytes(&x).map_err(RustyJwk::invalid_key)
            }
            _ => Err(DpopCause::InvalidJwk("expected an Ed25519 key".to_string()).into()),
        }
    }
}
