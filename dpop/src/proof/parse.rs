use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use jwt_simple::prelude::*;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use super::TYP;
use crate::prelude::*;

/// What is read from the proof header before its signature is verified
struct ProofHeader {
    alg: JwsAlgorithm,
    typ: Option<String>,
    jwk: Jwk,
}

impl ProofHeader {
    fn read(token: &str) -> RustyDpopResult<Self> {
        let mut parts = token.split('.');
        let (Some(header), Some(_), Some(_), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
            return Err(DpopCause::InvalidToken("not a compact JWS".to_string()).into());
        };
        let header = BASE64_URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|e| DpopCause::InvalidToken(e.to_string()))?;
        let header = serde_json::from_slice::<Map<String, Value>>(&header)?;

        let jwk = RustyJwk::from_header(&header)?;
        let alg = header
            .get("alg")
            .and_then(Value::as_str)
            .ok_or_else(|| DpopCause::InvalidToken("missing 'alg' header".to_string()))?;
        let alg = JwsAlgorithm::try_from(alg)?;
        let typ = header.get("typ").and_then(Value::as_str).map(str::to_string);
        Ok(Self { alg, typ, jwk })
    }
}

impl RustyDpop {
    /// Verifies a DPoP proof as specified in [RFC 9449 Section 4.3][1].
    ///
    /// The signature is verified against the key in the 'jwk' header, then the proof is matched
    /// against the HTTP request it came with and against the server's expectations in `options`.
    /// On success the returned [Proof] carries the thumbprint of the client key.
    ///
    /// # Arguments
    /// * `token` - value of the `DPoP` HTTP header
    /// * `htm` - method of the HTTP request
    /// * `htu` - URI of the HTTP request. Query and fragment are ignored
    /// * `options` - nonce, 'iat' window and `dpop_jkt` expectations
    ///
    /// [1]: https://www.rfc-editor.org/rfc/rfc9449.html#section-4.3
    pub fn parse_proof<C>(token: &str, htm: Htm, htu: &url::Url, options: &ParseOptions) -> RustyDpopResult<Proof<C>>
    where
        C: HttpTargetClaims + Serialize + DeserializeOwned,
    {
        Self::parse_proof_at(token, htm, htu, options, Clock::now_since_epoch())
    }

    pub(crate) fn parse_proof_at<C>(
        token: &str,
        htm: Htm,
        htu: &url::Url,
        options: &ParseOptions,
        now: UnixTimeStamp,
    ) -> RustyDpopResult<Proof<C>>
    where
        C: HttpTargetClaims + Serialize + DeserializeOwned,
    {
        let result = Self::verify_proof(token, htm, htu, options, now);
        match &result {
            Ok(proof) => tracing::trace!(alg = %proof.alg, jkt = %proof.thumbprint, "accepted DPoP proof"),
            Err(e) => tracing::debug!(cause = %e, %htm, htu = %Htu::from(htu), "rejected DPoP proof"),
        }
        result
    }

    fn verify_proof<C>(
        token: &str,
        htm: Htm,
        htu: &url::Url,
        options: &ParseOptions,
        now: UnixTimeStamp,
    ) -> RustyDpopResult<Proof<C>>
    where
        C: HttpTargetClaims + Serialize + DeserializeOwned,
    {
        let ProofHeader { alg, typ, jwk } = ProofHeader::read(token).map_err(RustyDpopError::into_invalid_proof)?;
        let claims = Self::verify_signature::<C>(token, alg, &jwk, now).map_err(RustyDpopError::into_invalid_proof)?;
        if claims.expires_at.is_some_and(|exp| exp < now) {
            return Err(RustyDpopError::invalid_proof(DpopCause::Expired));
        }

        let has_jti = claims.jwt_id.as_deref().is_some_and(|jti| !jti.is_empty());
        let has_required_claims =
            has_jti && claims.issued_at.is_some() && !claims.custom.htm().is_empty() && !claims.custom.htu().is_empty();
        if !has_required_claims {
            return Err(RustyDpopError::invalid_proof(DpopCause::MissingClaims));
        }

        if typ.as_deref() != Some(TYP) {
            return Err(RustyDpopError::invalid_proof(DpopCause::UnsupportedJwtType));
        }

        // 'htu' is compared verbatim, no URI normalization happens
        if claims.custom.htm() != htm.as_str() || claims.custom.htu() != Htu::from(htu).as_str() {
            return Err(RustyDpopError::invalid_proof(DpopCause::IncorrectHttpTarget));
        }

        if let Some(nonce) = options.expected_nonce() {
            if claims.nonce.as_deref() != Some(nonce) {
                return Err(DpopCause::IncorrectNonce.into());
            }
        }

        if !options.nonce_has_timestamp {
            if let Some(iat) = claims.issued_at {
                Self::verify_iat(iat, now, options.allowed_proof_age)?;
            }
        }

        let thumbprint = JwkThumbprint::generate(&jwk).map_err(RustyDpopError::into_invalid_proof)?;
        if let Some(jkt) = options.expected_jkt() {
            if jkt != thumbprint.as_str() {
                return Err(RustyDpopError::invalid_proof(DpopCause::IncorrectJkt));
            }
        }

        Ok(Proof {
            token: token.to_string(),
            alg,
            jwk,
            claims,
            thumbprint,
        })
    }

    fn verify_signature<C>(token: &str, alg: JwsAlgorithm, jwk: &Jwk, now: UnixTimeStamp) -> RustyDpopResult<JWTClaims<C>>
    where
        C: Serialize + DeserializeOwned,
    {
        let key = DpopPublicKey::try_from_jwk(jwk)?;
        if !key.supports(alg) {
            let reason = format!("'{alg}' does not match the '{}' key in the 'jwk' header", key.kty());
            return Err(DpopCause::InvalidToken(reason).into());
        }
        // 'iat' is verified later with a window of our own, possibly not at all
        let verifications = VerificationOptions {
            time_tolerance: Some(now),
            artificial_time: Some(now),
            ..Default::default()
        };
        key.verify_token::<C>(alg, token, verifications)
    }

    /// 'iat' has to be within `window` of `now`, in both directions, compared in milliseconds
    fn verify_iat(iat: UnixTimeStamp, now: UnixTimeStamp, window: core::time::Duration) -> RustyDpopResult<()> {
        let (iat, now, window) = (u128::from(iat.as_millis()), u128::from(now.as_millis()), window.as_millis());
        if iat.saturating_add(window) < now {
            return Err(RustyDpopError::invalid_proof(DpopCause::Expired));
        }
        if iat > now.saturating_add(window) {
            return Err(RustyDpopError::invalid_proof(DpopCause::Future));
        }
        Ok(())
    }
}
