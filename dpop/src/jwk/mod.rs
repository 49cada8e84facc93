use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use jwt_simple::prelude::*;
use serde_json::{Map, Value};

use crate::prelude::*;

pub mod ecdsa;
pub mod eddsa;
pub mod rsa;

/// Encodes a public key as a JWK
pub trait TryIntoJwk {
    /// Canonical JWK of this key
    fn try_into_jwk(self) -> RustyDpopResult<Jwk>;
}

/// Decodes a public key from a JWK
pub trait TryFromJwk
where
    Self: Sized,
{
    /// Public key held by `jwk`
    fn try_from_jwk(jwk: &Jwk) -> RustyDpopResult<Self>;
}

/// JWK helpers
pub struct RustyJwk;

impl RustyJwk {
    /// Extracts the 'jwk' header of a proof, keeping only the members its 'kty' requires.
    ///
    /// Member values are kept as received so that the thumbprint is computed over what the client
    /// actually sent.
    pub fn from_header(header: &Map<String, Value>) -> RustyDpopResult<Jwk> {
        let jwk = header
            .get("jwk")
            .and_then(Value::as_object)
            .ok_or(DpopCause::MissingJwk)?;
        let member = |name: &str| -> RustyDpopResult<String> {
            jwk.get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| DpopCause::InvalidJwk(format!("missing '{name}' member")).into())
        };
        let algorithm = match jwk.get("kty").and_then(Value::as_str) {
            Some("EC") => {
                let curve = match member("crv")?.as_str() {
                    "P-256" => EllipticCurve::P256,
                    "P-384" => EllipticCurve::P384,
                    "P-521" => EllipticCurve::P521,
                    _ => return Err(DpopCause::UnsupportedCurve.into()),
                };
                AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
                    key_type: EllipticCurveKeyType::EC,
                    curve,
                    x: member("x")?,
                    y: member("y")?,
                })
            }
            Some("RSA") => AlgorithmParameters::RSA(RSAKeyParameters {
                key_type: RSAKeyType::RSA,
                n: member("n")?,
                e: member("e")?,
            }),
            Some("OKP") => {
                if member("crv")? != "Ed25519" {
                    return Err(DpopCause::UnsupportedCurve.into());
                }
                AlgorithmParameters::OctetKeyPair(OctetKeyPairParameters {
                    key_type: OctetKeyPairType::OctetKeyPair,
                    curve: EdwardCurve::Ed25519,
                    x: member("x")?,
                })
            }
            _ => return Err(DpopCause::UnsupportedKeyAlgorithm.into()),
        };
        Ok(Jwk {
            common: Self::common_parameters(),
            algorithm,
        })
    }

    pub(crate) fn base64_url_encode(i: impl AsRef<[u8]>) -> String {
        BASE64_URL_SAFE_NO_PAD.encode(i)
    }

    /// Some producers pad base64url values although JWK forbids it
    pub(crate) fn base64_url_decode(i: &str) -> RustyDpopResult<Vec<u8>> {
        BASE64_URL_SAFE_NO_PAD
            .decode(i.trim_end_matches('='))
            .map_err(|e| DpopCause::InvalidJwk(e.to_string()).into())
    }

    /// Left pads a big-endian unsigned integer to `width` bytes
    pub(crate) fn fixed_width(i: Vec<u8>, width: usize) -> RustyDpopResult<Vec<u8>> {
        match i.len() {
            len if len == width => Ok(i),
            len if len < width => {
                let mut padded = vec![0u8; width - len];
                padded.extend(i);
                Ok(padded)
            }
            len => {
                let reason = format!("coordinate is {len} bytes long whereas the curve expects {width}");
                Err(DpopCause::InvalidJwk(reason).into())
            }
        }
    }

    pub(crate) fn invalid_key(e: impl ToString) -> RustyDpopError {
        DpopCause::InvalidJwk(e.to_string()).into()
    }

    fn common_parameters() -> CommonParameters {
        CommonParameters::default()
    }
}

impl TryIntoJwk for DpopPublicKey {
    fn try_into_jwk(self) -> RustyDpopResult<Jwk> {
        match self {
            Self::P256(pk) => pk.try_into_jwk(),
            Self::P384(pk) => pk.try_into_jwk(),
            Self::P521(pk) => pk.try_into_jwk(),
            Self::Rsa(pk) => pk.try_into_jwk(),
            Self::Ed25519(pk) => pk.try_into_jwk(),
        }
    }
}

impl TryFromJwk for DpopPublicKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyDpopResult<Self> {
        Ok(match &jwk.algorithm {
            AlgorithmParameters::EllipticCurve(p) => match p.curve {
                EllipticCurve::P256 => Self::P256(ES256PublicKey::try_from_jwk(jwk)?),
                EllipticCurve::P384 => Self::P384(ES384PublicKey::try_from_jwk(jwk)?),
                EllipticCurve::P521 => Self::P521(ES512PublicKey::try_from_jwk(jwk)?),
                #[allow(unreachable_patterns)]
                _ => return Err(DpopCause::UnsupportedCurve.into()),
            },
            AlgorithmParameters::RSA(_) => Self::Rsa(RsaPublicKey::try_from_jwk(jwk)?),
            AlgorithmParameters::OctetKeyPair(_) => Self::Ed25519(Ed25519PublicKey::try_from_jwk(jwk)?),
            #[allow(unreachable_patterns)]
            _ => return Err(DpopCause::UnsupportedKeyAlgorithm.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::test_utils::*;

    use super::*;

    fn header(jwk: Value) -> Map<String, Value> {
        json!({ "alg": "ES256", "typ": "dpop+jwt", "jwk": jwk })
            .as_object()
            .unwrap()
            .to_owned()
    }

    #[apply(all_keys)]
    #[test]
    fn should_round_trip(key: JwtKey) {
        let pk = DpopPublicKey::from_pem(key.alg, &key.kp).unwrap();
        let jwk = pk.clone().try_into_jwk().unwrap();
        assert_eq!(DpopPublicKey::try_from_jwk(&jwk).unwrap(), pk);
    }

    #[apply(all_keys)]
    #[test]
    fn should_read_back_encoded_jwk_from_header(key: JwtKey) {
        let jwk = key.to_jwk();
        let read = RustyJwk::from_header(&header(serde_json::to_value(&jwk).unwrap())).unwrap();
        assert_eq!(
            JwkThumbprint::generate(&read).unwrap(),
            JwkThumbprint::generate(&jwk).unwrap()
        );
    }

    #[test]
    fn should_fail_when_jwk_missing() {
        let header = json!({ "alg": "ES256", "typ": "dpop+jwt" }).as_object().unwrap().to_owned();
        let e = RustyJwk::from_header(&header).unwrap_err();
        assert!(e.is(&DpopCause::MissingJwk));
    }

    #[test]
    fn should_fail_when_jwk_not_an_object() {
        let e = RustyJwk::from_header(&header(json!("error"))).unwrap_err();
        assert!(e.is(&DpopCause::MissingJwk));
    }

    #[test]
    fn should_reject_symmetric_keys() {
        let jwk = json!({ "kty": "oct", "alg": "HS256", "k": "FdFYFzERwC2uCBB46pZQi4GG85LujR8obt-KWRBICVQ" });
        let e = RustyJwk::from_header(&header(jwk)).unwrap_err();
        assert!(e.is(&DpopCause::UnsupportedKeyAlgorithm));
    }

    #[rstest]
    #[case::unknown_kty(json!({ "kty": "EC2", "crv": "P-256", "x": "AA", "y": "AA" }))]
    #[case::missing_kty(json!({ "crv": "P-256", "x": "AA", "y": "AA" }))]
    fn should_reject_unknown_key_types(#[case] jwk: Value) {
        let e = RustyJwk::from_header(&header(jwk)).unwrap_err();
        assert!(e.is(&DpopCause::UnsupportedKeyAlgorithm));
    }

    #[rstest]
    #[case::secp256k1(json!({ "kty": "EC", "crv": "secp256k1", "x": "AA", "y": "AA" }))]
    #[case::x25519(json!({ "kty": "OKP", "crv": "X25519", "x": "AA" }))]
    fn should_reject_unsupported_curves(#[case] jwk: Value) {
        let e = RustyJwk::from_header(&header(jwk)).unwrap_err();
        assert!(e.is(&DpopCause::UnsupportedCurve));
    }

    #[test]
    fn should_fail_when_member_missing() {
        let jwk = json!({ "kty": "RSA", "e": "AQAB" });
        let e = RustyJwk::from_header(&header(jwk)).unwrap_err();
        assert!(matches!(e.cause(), Some(DpopCause::InvalidJwk(_))));
    }

    #[test]
    fn should_drop_extra_members() {
        let jwk = json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "x": "WB_tAI9xAaV1BpANo70gPuqqbaWuGxb78Ek8rAgtghM",
            "ext": true,
            "kid": "client-key",
        });
        let jwk = serde_json::to_value(RustyJwk::from_header(&header(jwk)).unwrap()).unwrap();
        assert!(jwk.get("ext").is_none());
        assert!(jwk.get("kid").is_none());
        assert_eq!(jwk.get("crv").and_then(Value::as_str), Some("Ed25519"));
    }

    #[test]
    fn should_tolerate_trailing_padding() {
        assert_eq!(RustyJwk::base64_url_decode("AQAB").unwrap(), vec![1, 0, 1]);
        assert_eq!(RustyJwk::base64_url_decode("AQAB==").unwrap(), vec![1, 0, 1]);
        assert_eq!(RustyJwk::base64_url_decode("AQ==").unwrap(), vec![1]);
        assert!(RustyJwk::base64_url_decode("A+B/").is_err());
    }

    #[test]
    fn should_pad_to_fixed_width() {
        assert_eq!(RustyJwk::fixed_width(vec![1, 2], 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(RustyJwk::fixed_width(vec![1, 2], 2).unwrap(), vec![1, 2]);
        assert!(RustyJwk::fixed_width(vec![1, 2, 3], 2).is_err());
    }
}
