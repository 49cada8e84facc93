/// Wrapper over a [Result] with a [RustyDpopError] error
pub type RustyDpopResult<T> = Result<T, RustyDpopError>;

/// A single reason for rejecting a proof, a key or a bound access token
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DpopCause {
    /// Umbrella for every rejection of a malformed or untrustworthy proof
    #[error("invalid_dpop_proof")]
    InvalidProof,
    /// The proof does not carry the nonce the server expects. The client should retry with the
    /// nonce found in the `DPoP-Nonce` response header
    #[error("use_dpop_nonce")]
    IncorrectNonce,
    /// One of `htm`, `htu`, `jti` or `iat` is missing
    #[error("missing claims")]
    MissingClaims,
    /// 'typ' header is not 'dpop+jwt'
    #[error("unsupported jwt type")]
    UnsupportedJwtType,
    /// `htm` or `htu` do not match the HTTP request
    #[error("incorrect http target")]
    IncorrectHttpTarget,
    /// The proof was issued too long ago or has an expiry in the past
    #[error("proof has expired")]
    Expired,
    /// The proof was issued too far into the future
    #[error("proof is issued too far into the future")]
    Future,
    /// The proof claims do not expose an access token hash
    #[error("incorrect claims type")]
    IncorrectClaimsType,
    /// The proof has no 'ath' claim although it is presented with an access token
    #[error("missing 'ath' claim")]
    MissingAth,
    /// The proof 'ath' claim is not the hash of the presented access token
    #[error("ath mismatch")]
    AthMismatch,
    /// The proof has no 'jwk' header or it is not a JSON object
    #[error("missing 'jwk' header")]
    MissingJwk,
    /// The proof key thumbprint differs from the one committed to with `dpop_jkt`
    #[error("incorrect 'jkt'")]
    IncorrectJkt,
    /// The proof key is not the one the access token is bound to
    #[error("key mismatch")]
    JwkMismatch,
    /// The access token claims do not expose a key thumbprint
    #[error("incorrect access token claims type")]
    IncorrectAccessTokenClaimsType,
    /// Elliptic curve other than P-256, P-384, P-521 or Ed25519
    #[error("unsupported curve")]
    UnsupportedCurve,
    /// Symmetric or unknown 'kty'
    #[error("unsupported key algorithm")]
    UnsupportedKeyAlgorithm,
    /// Signature algorithm outside of the ones allowed for DPoP
    #[error("unsupported signature algorithm '{0}'")]
    UnsupportedAlgorithm(String),
    /// A 'jwk' member is missing or cannot be decoded into a public key
    #[error("invalid 'jwk' header because {0}")]
    InvalidJwk(String),
    /// The compact token cannot be parsed
    #[error("JWT token verification failed because {0}")]
    InvalidToken(String),
    /// JWT error from `jwt-simple` crate
    #[error("{0}")]
    JwtSimpleError(String),
}

impl From<jwt_simple::Error> for DpopCause {
    fn from(e: jwt_simple::Error) -> Self {
        Self::JwtSimpleError(e.to_string())
    }
}

impl From<serde_json::Error> for DpopCause {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidToken(e.to_string())
    }
}

/// All errors which [crate::RustyDpop] might throw.
///
/// Holds an ordered list of [DpopCause]: proof rejections start with [DpopCause::InvalidProof]
/// followed by the specific reason.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("{}", join_causes(.causes))]
pub struct RustyDpopError {
    causes: Vec<DpopCause>,
}

fn join_causes(causes: &[DpopCause]) -> String {
    causes.iter().map(ToString::to_string).collect::<Vec<_>>().join(": ")
}

impl RustyDpopError {
    /// A proof rejection: [DpopCause::InvalidProof] joined with `cause`
    pub fn invalid_proof(cause: DpopCause) -> Self {
        Self::from(cause).joined(DpopCause::InvalidProof)
    }

    /// Prepends `head` unless it is already one of the causes
    pub fn joined(mut self, head: DpopCause) -> Self {
        if !self.is(&head) {
            self.causes.insert(0, head);
        }
        self
    }

    /// Turns any error into a proof rejection
    pub fn into_invalid_proof(self) -> Self {
        self.joined(DpopCause::InvalidProof)
    }

    /// Whether `cause` is one of the joined causes
    pub fn is(&self, cause: &DpopCause) -> bool {
        self.causes.contains(cause)
    }

    /// Whether the proof has to be rejected as malformed
    pub fn is_invalid_proof(&self) -> bool {
        self.is(&DpopCause::InvalidProof)
    }

    /// All the causes, umbrella first
    pub fn causes(&self) -> &[DpopCause] {
        &self.causes
    }

    /// The most specific cause
    pub fn cause(&self) -> Option<&DpopCause> {
        self.causes.last()
    }

    /// The `error` value of a [RFC 9449 Section 7.1][1] `WWW-Authenticate` challenge, if any
    ///
    /// [1]: https://www.rfc-editor.org/rfc/rfc9449.html#section-7.1
    pub fn oauth_error_code(&self) -> Option<&'static str> {
        if self.is(&DpopCause::IncorrectNonce) {
            Some("use_dpop_nonce")
        } else if self.is_invalid_proof() {
            Some("invalid_dpop_proof")
        } else {
            None
        }
    }
}

impl From<DpopCause> for RustyDpopError {
    fn from(cause: DpopCause) -> Self {
        Self { causes: vec![cause] }
    }
}

impl From<jwt_simple::Error> for RustyDpopError {
    fn from(e: jwt_simple::Error) -> Self {
        DpopCause::from(e).into()
    }
}

impl From<serde_json::Error> for RustyDpopError {
    fn from(e: serde_json::Error) -> Self {
        DpopCause::from(e).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_join_umbrella_first() {
        let e = RustyDpopError::invalid_proof(DpopCause::Expired);
        assert_eq!(e.causes(), &[DpopCause::InvalidProof, DpopCause::Expired]);
        assert_eq!(e.cause(), Some(&DpopCause::Expired));
        assert!(e.is_invalid_proof());
        assert_eq!(e.to_string(), "invalid_dpop_proof: proof has expired");
    }

    #[test]
    fn should_not_join_twice() {
        let e = RustyDpopError::invalid_proof(DpopCause::MissingJwk).into_invalid_proof();
        assert_eq!(e.causes(), &[DpopCause::InvalidProof, DpopCause::MissingJwk]);
    }

    #[test]
    fn nonce_should_stand_alone() {
        let e = RustyDpopError::from(DpopCause::IncorrectNonce);
        assert!(!e.is_invalid_proof());
        assert_eq!(e.oauth_error_code(), Some("use_dpop_nonce"));
        assert_eq!(e.to_string(), "use_dpop_nonce");
    }

    #[test]
    fn should_map_oauth_error_codes() {
        let e = RustyDpopError::invalid_proof(DpopCause::AthMismatch);
        assert_eq!(e.oauth_error_code(), Some("invalid_dpop_proof"));
        let e = RustyDpopError::from(DpopCause::IncorrectAccessTokenClaimsType);
        assert_eq!(e.oauth_error_code(), None);
    }
}
