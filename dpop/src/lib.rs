//! DPoP ([RFC 9449][1]) proofs: creation on the client side, verification on the server side and
//! binding of a verified proof to a DPoP bound access token.
//!
//! A client builds [ProofClaims] for every HTTP request and signs them with
//! [RustyDpop::create_proof]. The server verifies the compact token with [RustyDpop::parse_proof]
//! and, when the request also carries a bound access token, checks with [Proof::validate] that
//! both refer to the same key.
//!
//! [1]: https://www.rfc-editor.org/rfc/rfc9449.html
#![deny(missing_docs)]
#![allow(clippy::single_component_path_imports)]

#[cfg(test)]
use rstest_reuse;

#[cfg(test)]
#[macro_use]
pub mod test_utils;
// both imports above have to be defined at the beginning of the crate for rstest to work

mod binding;
mod error;
mod http;
mod jwk;
mod jwk_thumbprint;
mod model;
mod proof;

/// Prelude
pub mod prelude {
    pub use jwt_simple::prelude::{Jwk, JWTClaims, UnixTimeStamp};

    pub use crate::binding::{
        AccessTokenHashClaims, BoundAccessTokenClaims, BoundClaims, Confirmation, access_token_hash,
    };
    pub use crate::error::{DpopCause, RustyDpopError, RustyDpopResult};
    pub use crate::http::{AUTHORIZATION_SCHEME, DPOP_HEADER, DPOP_NONCE_HEADER, bound_access_token};
    pub use crate::jwk::{RustyJwk, TryFromJwk, TryIntoJwk};
    pub use crate::jwk_thumbprint::JwkThumbprint;
    pub use crate::model::{alg::JwsAlgorithm, pem::Pem, pk::DpopPublicKey, pk::RsaPublicKey};
    pub use crate::proof::{
        HttpTargetClaims, Proof, ProofClaims, htm::Htm, htu::Htu, options::ParseOptions,
    };
    pub use crate::RustyDpop;
}

pub use prelude::*;

/// Entry point for creating and parsing DPoP proofs
pub struct RustyDpop;
