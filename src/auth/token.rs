//! Stateless signed session tokens.
//!
//! A token is `v1.<base64url(claims json)>.<base64url(hmac-sha256)>`, signed
//! with the process-wide `SESSION_SECRET`. Validation is a pure function of
//! token + current time + secret: no storage, no revocation, expiry is the
//! only termination path.

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};

use crate::roster::model::{Account, Role};

const HEADER: &str = "v1.";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("token expired")]
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct SessionClaims {
    sub: String,
    role: Role,
    iat: String,
    exp: String,
}

/// A validated session: identity and role as captured at issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub subject_email: String,
    pub role: Role,
    pub issued_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// Issues and validates session tokens with a fixed TTL.
pub struct TokenSigner {
    secret: SecretString,
    ttl_seconds: i64,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: SecretString, ttl_seconds: i64) -> Self {
        Self {
            secret,
            ttl_seconds,
        }
    }

    /// Issue an opaque token for the account, valid for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] if the claims cannot be encoded,
    /// which does not happen for well-formed timestamps.
    pub fn issue(&self, account: &Account, now: OffsetDateTime) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub: account.email.clone(),
            role: account.role,
            iat: rfc3339(now)?,
            exp: rfc3339(now + Duration::seconds(self.ttl_seconds))?,
        };
        let payload = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;
        let payload_b64 = Base64UrlUnpadded::encode_string(&payload);
        let signature = self.sign(&payload_b64);
        let signature_b64 = Base64UrlUnpadded::encode_string(&signature);
        Ok(format!("{HEADER}{payload_b64}.{signature_b64}"))
    }

    /// Validate a token and return its session.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Malformed`] for anything that does not parse as a
    ///   token, including issued-at timestamps in the future,
    /// - [`TokenError::SignatureMismatch`] when the payload was not signed
    ///   with this signer's secret,
    /// - [`TokenError::Expired`] when `exp` is not after `now`.
    pub fn validate(&self, token: &str, now: OffsetDateTime) -> Result<Session, TokenError> {
        let body = token.strip_prefix(HEADER).ok_or(TokenError::Malformed)?;
        let (payload_b64, signature_b64) = body.split_once('.').ok_or(TokenError::Malformed)?;

        let signature =
            Base64UrlUnpadded::decode_vec(signature_b64).map_err(|_| TokenError::Malformed)?;
        // Verify before decoding claims; unsigned payloads get no parsing.
        let mut mac = self.mac();
        mac.update(HEADER.as_bytes());
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::SignatureMismatch)?;

        let payload =
            Base64UrlUnpadded::decode_vec(payload_b64).map_err(|_| TokenError::Malformed)?;
        let claims: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        let issued_at = parse_rfc3339(&claims.iat)?;
        let expires_at = parse_rfc3339(&claims.exp)?;
        if issued_at > now {
            return Err(TokenError::Malformed);
        }
        if expires_at <= now {
            return Err(TokenError::Expired);
        }

        Ok(Session {
            subject_email: claims.sub,
            role: claims.role,
            issued_at,
            expires_at,
        })
    }

    fn sign(&self, payload_b64: &str) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(HEADER.as_bytes());
        mac.update(payload_b64.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC can take key of any size")
    }
}

fn rfc3339(moment: OffsetDateTime) -> Result<String, TokenError> {
    moment.format(&Rfc3339).map_err(|_| TokenError::Malformed)
}

fn parse_rfc3339(value: &str) -> Result<OffsetDateTime, TokenError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| TokenError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn at(unix: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(unix).expect("valid timestamp")
    }

    fn signer(secret: &str) -> TokenSigner {
        TokenSigner::new(SecretString::from(secret.to_string()), 3600)
    }

    fn account(role: Role) -> Account {
        Account {
            email: "alice@x.com".to_string(),
            name: "Alice".to_string(),
            password_hash: String::new(),
            role,
            uniform_required: String::new(),
            achievements: Vec::new(),
        }
    }

    #[test]
    fn issue_and_validate_round_trip() -> Result<(), TokenError> {
        let signer = signer("test-secret");
        let token = signer.issue(&account(Role::Admin), at(NOW))?;
        let session = signer.validate(&token, at(NOW + 60))?;
        assert_eq!(session.subject_email, "alice@x.com");
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.issued_at, at(NOW));
        assert_eq!(session.expires_at, at(NOW + 3600));
        Ok(())
    }

    #[test]
    fn validate_rejects_expired() -> Result<(), TokenError> {
        let signer = signer("test-secret");
        let token = signer.issue(&account(Role::User), at(NOW))?;
        let result = signer.validate(&token, at(NOW + 3600));
        assert_eq!(result, Err(TokenError::Expired));
        Ok(())
    }

    #[test]
    fn validate_rejects_wrong_secret() -> Result<(), TokenError> {
        let token = signer("secret-one").issue(&account(Role::User), at(NOW))?;
        let result = signer("secret-two").validate(&token, at(NOW));
        assert_eq!(result, Err(TokenError::SignatureMismatch));
        Ok(())
    }

    #[test]
    fn validate_rejects_tampered_payload() -> Result<(), TokenError> {
        let signer = signer("test-secret");
        let token = signer.issue(&account(Role::User), at(NOW))?;
        // Re-encode the claims with an escalated role, keeping the signature.
        let (payload_b64, signature_b64) = token
            .strip_prefix(HEADER)
            .and_then(|body| body.split_once('.'))
            .ok_or(TokenError::Malformed)?;
        let payload =
            Base64UrlUnpadded::decode_vec(payload_b64).map_err(|_| TokenError::Malformed)?;
        let forged = String::from_utf8_lossy(&payload).replace("\"user\"", "\"chief\"");
        let forged_token = format!(
            "{HEADER}{}.{signature_b64}",
            Base64UrlUnpadded::encode_string(forged.as_bytes())
        );
        let result = signer.validate(&forged_token, at(NOW));
        assert_eq!(result, Err(TokenError::SignatureMismatch));
        Ok(())
    }

    #[test]
    fn validate_rejects_malformed_tokens() {
        let signer = signer("test-secret");
        for token in ["", "v1.", "not-a-token", "v1.missing-dot", "v2.a.b"] {
            assert_eq!(
                signer.validate(token, at(NOW)),
                Err(TokenError::Malformed),
                "token {token:?} should be malformed"
            );
        }
    }

    #[test]
    fn validate_rejects_future_issued_at() -> Result<(), TokenError> {
        let signer = signer("test-secret");
        let token = signer.issue(&account(Role::User), at(NOW + 600))?;
        let result = signer.validate(&token, at(NOW));
        assert_eq!(result, Err(TokenError::Malformed));
        Ok(())
    }
}
