use jwt_simple::prelude::*;
pub use rstest::*;
pub use rstest_reuse::{self, *};

pub use forge::*;
pub use utils::*;

use crate::prelude::*;

pub mod forge;
pub mod utils;

#[template]
#[export]
#[rstest(
    key,
    case::ES256($ crate::test_utils::JwtKey::new_key($ crate::prelude::JwsAlgorithm::ES256)),
    case::ES384($ crate::test_utils::JwtKey::new_key($ crate::prelude::JwsAlgorithm::ES384)),
    case::ES512($ crate::test_utils::JwtKey::new_key($ crate::prelude::JwsAlgorithm::ES512)),
    case::RS256($ crate::test_utils::JwtKey::new_key($ crate::prelude::JwsAlgorithm::RS256)),
    case::PS256($ crate::test_utils::JwtKey::new_key($ crate::prelude::JwsAlgorithm::PS256)),
    case::EdDSA($ crate::test_utils::JwtKey::new_key($ crate::prelude::JwsAlgorithm::EdDSA))
)]
#[allow(non_snake_case)]
pub fn all_keys(key: JwtKey) {}

lazy_static::lazy_static! {
    // generating RSA keys is slow
    static ref RSA_KEY: Pem = RS256KeyPair::generate(2048).unwrap().to_pem().unwrap().into();
}

#[derive(Debug, Clone)]
pub struct JwtKey {
    /// KeyPair
    pub kp: Pem,
    /// Algorithm
    pub alg: JwsAlgorithm,
}

impl JwtKey {
    pub fn new_key(alg: JwsAlgorithm) -> Self {
        let kp: Pem = match alg {
            JwsAlgorithm::ES256 => ES256KeyPair::generate().to_pem().unwrap().into(),
            JwsAlgorithm::ES384 => ES384KeyPair::generate().to_pem().unwrap().into(),
            JwsAlgorithm::ES512 => ES512KeyPair::generate().to_pem().unwrap().into(),
            JwsAlgorithm::EdDSA => Ed25519KeyPair::generate().to_pem().into(),
            _ => RSA_KEY.clone(),
        };
        Self { kp, alg }
    }

    /// Just creates a new fresh key with same algorithm
    pub fn create_another(&self) -> Self {
        Self::new_key(self.alg)
    }

    /// Algorithms which cannot be used with this key
    pub fn reverse_algorithms(&self) -> Vec<JwsAlgorithm> {
        JwsAlgorithm::ALL
            .into_iter()
            .filter(|alg| match self.alg.is_rsa() {
                true => !alg.is_rsa(),
                false => *alg != self.alg,
            })
            .collect()
    }

    pub fn to_jwk(&self) -> Jwk {
        DpopPublicKey::from_pem(self.alg, &self.kp)
            .unwrap()
            .try_into_jwk()
            .unwrap()
    }

    pub fn thumbprint(&self) -> JwkThumbprint {
        JwkThumbprint::generate(&self.to_jwk()).unwrap()
    }
}
