use jwt_simple::prelude::*;

use super::*;

impl TryIntoJwk for RsaPublicKey {
    fn try_into_jwk(self) -> RustyDpopResult<Jwk> {
        Ok(Jwk {
            common: RustyJwk::common_parameters(),
            algorithm: AlgorithmParameters::RSA(RSAKeyParameters {
                key_type: RSAKeyType::RSA,
                n: RustyJwk::base64_url_encode(self.n),
                e: RustyJwk::base64_url_encode(self.e),
            }),
        })
    }
}

impl TryFromJwk for RsaPublicKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyDpopResult<Self> {
        match &jwk.algorithm {
            AlgorithmParameters::RSA(RSAKeyParameters { n, e, .. }) => {
                let n = RustyJwk::base64_url_decode(n)?;
                let e = RustyJwk::base64_url_decode(e)?;
                RS256PublicKey::from_components(&n, &e).map_err(RustyJwk::invalid_key)?;
                Ok(Self::new(n, e))
            }
            _ => Err(DpopCause::InvalidJwk("expected an RSA key".to_string()).into()),
        }
    }
}
