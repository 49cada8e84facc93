/// Expectations a server has on an incoming proof
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseOptions {
    /// Nonce the server handed out in a `DPoP-Nonce` header. The proof must carry it
    pub nonce: Option<String>,
    /// The nonce encodes its own issuance time: the 'iat' window is not enforced
    pub nonce_has_timestamp: bool,
    /// How far in the past or in the future 'iat' may be
    pub allowed_proof_age: core::time::Duration,
    /// Thumbprint the client committed to with the `dpop_jkt` authorization request parameter
    pub jkt: Option<String>,
}

impl ParseOptions {
    /// Window applied to 'iat' unless configured otherwise
    pub const DEFAULT_ALLOWED_PROOF_AGE: core::time::Duration = core::time::Duration::from_secs(30);

    /// Requires the proof to carry `nonce`
    pub fn with_nonce(self, nonce: impl Into<String>) -> Self {
        Self {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// Skips the 'iat' window since the nonce carries freshness
    pub fn with_nonce_timestamp(self) -> Self {
        Self {
            nonce_has_timestamp: true,
            ..self
        }
    }

    /// Widens or narrows the 'iat' window
    pub fn with_allowed_proof_age(self, allowed_proof_age: core::time::Duration) -> Self {
        Self {
            allowed_proof_age,
            ..self
        }
    }

    /// Requires the proof to be signed by the key whose thumbprint is `jkt`
    pub fn with_jkt(self, jkt: impl Into<String>) -> Self {
        Self {
            jkt: Some(jkt.into()),
            ..self
        }
    }

    pub(crate) fn expected_nonce(&self) -> Option<&str> {
        self.nonce.as_deref().filter(|n| !n.is_empty())
    }

    pub(crate) fn expected_jkt(&self) -> Option<&str> {
        self.jkt.as_deref().filter(|j| !j.is_empty())
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            nonce: None,
            nonce_has_timestamp: false,
            allowed_proof_age: Self::DEFAULT_ALLOWED_PROOF_AGE,
            jkt: None,
        }
    }
}
