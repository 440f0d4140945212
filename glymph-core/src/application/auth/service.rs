use super::error::AuthError;
use super::password::{hash_password, verify_password};
use super::token::{Claims, JwtService, TokenKind};
use crate::config::AuthConfig;
use crate::constants::ADMIN_ROLE;
use crate::domain::{NewUser, User};
use crate::store::Store;
use crate::validation::{validate_new_user, validate_password};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

/// A freshly registered (still inactive) account and the token that
/// activates it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Registration {
    pub user: User,
    pub activation_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: Store,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(store: Store, config: &AuthConfig) -> Self {
        Self {
            store,
            jwt: JwtService::new(config),
        }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Create an inactive account. The very first account is made admin.
    pub async fn register(&self, new_user: NewUser) -> Result<Registration, AuthError> {
        validate_new_user(&new_user)?;
        let hash = hash_password(&new_user.password)?;
        let (user, is_first) = self
            .store
            .register_user(
                new_user.username.trim(),
                new_user.email.trim(),
                &hash,
                ADMIN_ROLE,
            )
            .await?;
        if is_first {
            info!(user_id = user.id, "First account granted the admin role");
        }

        let activation_token = self.jwt.issue(user.id, TokenKind::Activation)?;
        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(Registration {
            user,
            activation_token,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let Some(credentials) = self.store.credentials_by_username(username).await? else {
            debug!(username, "Login for unknown user");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &credentials.password_hash) {
            warn!(user_id = credentials.user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        if !credentials.user.is_active {
            return Err(AuthError::Inactive);
        }
        info!(user_id = credentials.user.id, "User logged in");
        self.issue_pair(credentials.user.id)
    }

    /// Exchange a refresh token for a new pair; the old refresh token is
    /// revoked.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.authenticate(refresh_token, TokenKind::Refresh).await?;
        let user = self.active_user(claims.user_id()?).await?;
        self.spend(&claims).await?;
        self.issue_pair(user.id)
    }

    pub async fn activate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.authenticate(token, TokenKind::Activation).await?;
        let user_id = claims.user_id()?;
        self.spend(&claims).await?;
        self.store.set_user_active(user_id, true).await?;
        info!(user_id, "User activated");
        self.store
            .user(user_id)
            .await?
            .ok_or_else(|| AuthError::NotFound {
                entity: "user",
                key: user_id.to_string(),
            })
    }

    /// Returns the reset token when the email belongs to an account. Callers
    /// must answer identically either way.
    pub async fn request_password_reset(&self, email: &str) -> Result<Option<String>, AuthError> {
        let Some(user) = self.store.user_by_email(email.trim()).await? else {
            return Ok(None);
        };
        let token = self.jwt.issue(user.id, TokenKind::PasswordReset)?;
        info!(user_id = user.id, "Password reset requested");
        Ok(Some(token))
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password("new_password", new_password)?;
        let claims = self.authenticate(token, TokenKind::PasswordReset).await?;
        let user_id = claims.user_id()?;
        let hash = hash_password(new_password)?;
        self.spend(&claims).await?;
        self.store.set_password_hash(user_id, &hash).await?;
        info!(user_id, "Password reset");
        Ok(())
    }

    /// Revoke the presented access token.
    pub async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let claims = self.authenticate(access_token, TokenKind::Access).await?;
        self.spend(&claims).await?;
        info!(user_id = %claims.sub, "User logged out");
        Ok(())
    }

    /// Verify a token of the given kind and check it has not been revoked.
    pub async fn authenticate(&self, token: &str, kind: TokenKind) -> Result<Claims, AuthError> {
        let claims = self.jwt.verify(token, kind)?;
        if self.store.is_token_revoked(&claims.jti).await? {
            return Err(AuthError::Revoked);
        }
        Ok(claims)
    }

    /// The active user behind an access token.
    pub async fn current_user(&self, access_token: &str) -> Result<User, AuthError> {
        let claims = self.authenticate(access_token, TokenKind::Access).await?;
        self.active_user(claims.user_id()?).await
    }

    pub async fn is_admin(&self, user_id: i64) -> Result<bool, AuthError> {
        let roles = self.store.user_role_names(user_id).await?;
        Ok(roles.iter().any(|role| role == ADMIN_ROLE))
    }

    pub async fn require_admin(&self, user_id: i64, action: &str) -> Result<(), AuthError> {
        if self.is_admin(user_id).await? {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                action: action.to_string(),
            })
        }
    }

    /// Single-use tokens: only the caller that records the revocation may
    /// act on the token.
    async fn spend(&self, claims: &Claims) -> Result<(), AuthError> {
        if self.store.revoke_token(&claims.jti).await? {
            Ok(())
        } else {
            Err(AuthError::Revoked)
        }
    }

    async fn active_user(&self, user_id: i64) -> Result<User, AuthError> {
        let user = self
            .store
            .user(user_id)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("user no longer exists".to_string()))?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        Ok(user)
    }

    fn issue_pair(&self, user_id: i64) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.jwt.issue(user_id, TokenKind::Access)?,
            refresh_token: self.jwt.issue(user_id, TokenKind::Refresh)?,
            token_type: "bearer".to_string(),
        })
    }
}
