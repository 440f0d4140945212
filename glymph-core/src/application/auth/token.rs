use super::error::AuthError;
use crate::config::AuthConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    Activation,
    PasswordReset,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::Activation => "activation",
            TokenKind::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))
    }
}

/// HS256 signer and verifier for every token kind.
#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    config: AuthConfig,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config: config.clone(),
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.config.access_ttl,
            TokenKind::Refresh => self.config.refresh_ttl,
            TokenKind::Activation => self.config.activation_ttl,
            TokenKind::PasswordReset => self.config.password_reset_ttl,
        }
    }

    pub fn issue(&self, user_id: i64, kind: TokenKind) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl(kind)).timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(AuthError::Signing)
    }

    /// Verify signature and expiry, then require the expected kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(err.to_string()),
            })?
            .claims;
        if claims.kind != expected {
            return Err(AuthError::WrongTokenType { expected });
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_carries_kind_and_subject() {
        let jwt = JwtService::new(&AuthConfig::new("test-secret"));
        let token = jwt.issue(7, TokenKind::Access).unwrap();

        let claims = jwt.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let jwt = JwtService::new(&AuthConfig::new("test-secret"));
        let refresh = jwt.issue(7, TokenKind::Refresh).unwrap();

        assert!(matches!(
            jwt.verify(&refresh, TokenKind::Access),
            Err(AuthError::WrongTokenType {
                expected: TokenKind::Access
            })
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut config = AuthConfig::new("test-secret");
        config.access_ttl = Duration::seconds(-30);
        let jwt = JwtService::new(&config);
        let token = jwt.issue(7, TokenKind::Access).unwrap();

        assert!(matches!(
            jwt.verify(&token, TokenKind::Access),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let ours = JwtService::new(&AuthConfig::new("test-secret"));
        let theirs = JwtService::new(&AuthConfig::new("other-secret"));
        let token = theirs.issue(7, TokenKind::Access).unwrap();

        assert!(matches!(
            ours.verify(&token, TokenKind::Access),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
