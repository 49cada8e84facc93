use jwt_simple::prelude::*;

use super::*;

/// NIST curves allowed for DPoP
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum EcCurve {
    P256,
    P384,
    P521,
}

impl EcCurve {
    fn curve(&self) -> EllipticCurve {
        match self {
            Self::P256 => EllipticCurve::P256,
            Self::P384 => EllipticCurve::P384,
            Self::P521 => EllipticCurve::P521,
        }
    }

    /// Byte length of a coordinate
    fn width(&self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }

    /// Decoded and left padded 'x' and 'y' members
    fn coordinates(&self, jwk: &Jwk) -> RustyDpopResult<(Vec<u8>, Vec<u8>)> {
        match &jwk.algorithm {
            AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters { curve, x, y, .. })
                if *curve == self.curve() =>
            {
                let x = RustyJwk::fixed_width(RustyJwk::base64_url_decode(x)?, self.width())?;
                let y = RustyJwk::fixed_width(RustyJwk::base64_url_decode(y)?, self.width())?;
                Ok((x, y))
            }
            _ => Err(DpopCause::InvalidJwk(format!("expected a {:?} key", self)).into()),
        }
    }
}

impl TryIntoJwk for ES256PublicKey {
    fn try_into_jwk(self) -> RustyDpopResult<Jwk> {
        AnyEcPublicKey(EcCurve::P256, self.public_key().to_bytes_uncompressed()).try_into_jwk()
    }
}

impl TryFromJwk for ES256PublicKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyDpopResult<Self> {
        let (x, y) = EcCurve::P256.coordinates(jwk)?;
        let point = p256::EncodedPoint::from_affine_coordinates(x.as_slice().into(), y.as_slice().into(), false);
        ES256PublicKey::from_bytes(point.as_bytes()).map_err(RustyJwk::invalid_key)
    }
}

impl TryIntoJwk for ES384PublicKey {
    fn try_into_jwk(self) -> RustyDpopResult<Jwk> {
        AnyEcPublicKey(EcCurve::P384, self.public_key().to_bytes_uncompressed()).try_into_jwk()
    }
}

impl TryFromJwk for ES384PublicKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyDpopResult<Self> {
        let (x, y) = EcCurve::P384.coordinates(jwk)?;
        let point = p384::EncodedPoint::from_affine_coordinates(x.as_slice().into(), y.as_slice().into(), false);
        ES384PublicKey::from_bytes(point.as_bytes()).map_err(RustyJwk::invalid_key)
    }
}

impl TryIntoJwk for ES512PublicKey {
    fn try_into_jwk(self) -> RustyDpopResult<Jwk> {
        AnyEcPublicKey(EcCurve::P521, self.public_key().to_bytes_uncompressed()).try_into_jwk()
    }
}

impl TryFromJwk for ES512PublicKey {
    fn try_from_jwk(jwk: &Jwk) -> RustyDpopResult<Self> {
        let (x, y) = EcCurve::P521.coordinates(jwk)?;
        let point = p521::EncodedPoint::from_affine_coordinates(x.as_slice().into(), y.as_slice().into(), false);
        ES512PublicKey::from_bytes(point.as_bytes()).map_err(RustyJwk::invalid_key)
    }
}

/// For factorizing common elliptic curve operations
struct AnyEcPublicKey(EcCurve, Vec<u8>);

impl TryIntoJwk for AnyEcPublicKey {
    fn try_into_jwk(self) -> RustyDpopResult<Jwk> {
        let (x, y) = match self.0 {
            EcCurve::P256 => {
                let point = p256::EncodedPoint::from_bytes(&self.1).map_err(RustyJwk::invalid_key)?;
                (point.x().map(|x| x.to_vec()), point.y().map(|y| y.to_vec()))
            }
            EcCurve::P384 => {
                let point = p384::EncodedPoint::from_bytes(&self.1).map_err(RustyJwk::invalid_key)?;
                (point.x().map(|x| x.to_vec()), point.y().map(|y| y.to_vec()))
            }
            EcCurve::P521 => {
                let point = p521::EncodedPoint::from_bytes(&self.1).map_err(RustyJwk::invalid_key)?;
                (point.x().map(|x| x.to_vec()), point.y().map(|y| y.to_vec()))
            }
        };
        let (Some(x), Some(y)) = (x, y) else {
            return Err(RustyJwk::invalid_key("identity or compressed point"));
        };
        let width = self.0.width();
        Ok(Jwk {
            common: RustyJwk::common_parameters(),
            algorithm: AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
                key_type: EllipticCurveKeyType::EC,
                curve: self.0.curve(),
                x: RustyJwk::base64_url_encode(RustyJwk::fixed_width(x, width)?),
                y: RustyJwk::base64_url_encode(RustyJwk::fixed_width(y, width)?),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};

    use super::*;

    // P-256 key whose 'x' coordinate starts with a zero byte
    const LEADING_ZERO_X: &str = "ABb3EarQ0HLccFyFmT-SeL4NKg17Pe8sxCZeYElmDTo";
    const LEADING_ZERO_Y: &str = "5kHQhze8V7fHtMmbO67KbCsNtTVhDOFZTM0YWtSeFE8";

    fn p256_jwk(x: &str, y: &str) -> Jwk {
        Jwk {
            common: CommonParameters::default(),
            algorithm: AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
                key_type: EllipticCurveKeyType::EC,
                curve: EllipticCurve::P256,
                x: x.to_string(),
                y: y.to_string(),
            }),
        }
    }

    fn members(jwk: &Jwk) -> (String, String) {
        match &jwk.algorithm {
            AlgorithmParameters::EllipticCurve(p) => (p.x.clone(), p.y.clone()),
            _ => panic!("not an EC key"),
        }
    }

    #[test]
    fn should_keep_leading_zeros() {
        let pk = ES256PublicKey::try_from_jwk(&p256_jwk(LEADING_ZERO_X, LEADING_ZERO_Y)).unwrap();
        let (x, y) = members(&pk.try_into_jwk().unwrap());
        assert_eq!(x, LEADING_ZERO_X);
        assert_eq!(y, LEADING_ZERO_Y);
        assert_eq!(BASE64_URL_SAFE_NO_PAD.decode(x).unwrap().len(), 32);
    }

    #[test]
    fn should_pad_short_coordinates() {
        let full = BASE64_URL_SAFE_NO_PAD.decode(LEADING_ZERO_X).unwrap();
        assert_eq!(full[0], 0);
        let short = BASE64_URL_SAFE_NO_PAD.encode(&full[1..]);

        let pk = ES256PublicKey::try_from_jwk(&p256_jwk(&short, LEADING_ZERO_Y)).unwrap();
        let expected = ES256PublicKey::try_from_jwk(&p256_jwk(LEADING_ZERO_X, LEADING_ZERO_Y)).unwrap();
        assert_eq!(pk.to_bytes(), expected.to_bytes());

        let jwk = pk.try_into_jwk().unwrap();
        assert_eq!(
            JwkThumbprint::generate(&jwk).unwrap(),
            JwkThumbprint::generate(&p256_jwk(LEADING_ZERO_X, LEADING_ZERO_Y)).unwrap()
        );
    }

    #[test]
    fn should_tolerate_padded_coordinates() {
        let padded = format!("{LEADING_ZERO_X}=");
        let pk = ES256PublicKey::try_from_jwk(&p256_jwk(&padded, LEADING_ZERO_Y)).unwrap();
        let expected = ES256PublicKey::try_from_jwk(&p256_jwk(LEADING_ZERO_X, LEADING_ZERO_Y)).unwrap();
        assert_eq!(pk.to_bytes(), expected.to_bytes());
    }

    #[test]
    fn should_fail_when_coordinate_too_long() {
        let mut long = BASE64_URL_SAFE_NO_PAD.decode(LEADING_ZERO_X).unwrap();
        long.insert(0, 1);
        let long = BASE64_URL_SAFE_NO_PAD.encode(long);
        let e = ES256PublicKey::try_from_jwk(&p256_jwk(&long, LEADING_ZERO_Y)).unwrap_err();
        assert!(matches!(e.cause(), Some(DpopCause::InvalidJwk(_))));
    }

    #[test]
    fn should_fail_when_point_not_on_curve() {
        let e = ES256PublicKey::try_from_jwk(&p256_jwk(LEADING_ZERO_X, LEADING_ZERO_X)).unwrap_err();
        assert!(matches!(e.cause(), Some(DpopCause::InvalidJwk(_))));
    }

    #[test]
    fn should_fail_converting_jwk_into_key_when_wrong_size() {
        let jwk = ES384KeyPair::generate().public_key().try_into_jwk().unwrap();
        assert!(ES256PublicKey::try_from_jwk(&jwk).is_err());
        assert!(ES512PublicKey::try_from_jwk(&jwk).is_err());
        assert!(ES384PublicKey::try_from_jwk(&jwk).is_ok());
    }

    #[test]
    fn p521_coordinates_should_be_66_bytes() {
        let jwk = ES512KeyPair::generate().public_key().try_into_jwk().unwrap();
        let (x, y) = members(&jwk);
        assert_eq!(BASE64_URL_SAFE_NO_PAD.decode(x).unwrap().len(), 66);
        assert_eq!(BASE64_URL_SAFE_NO_PAD.decode(y).unwrap().len(), 66);
    }
}
