//! Access tokens.
//!
//! Users and admins receive HS256-signed JWTs with the same claims, `{ id, email, role }`, but signed with different
//! keys. A token's role is decided by the key that validates it, so a user cannot promote themselves by editing the
//! `role` claim.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::Duration;
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    UntrustedToken,
};
use log::*;
use marketplace_engine::db_types::Role;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl JwtClaims {
    pub fn new<S: Into<String>>(id: i64, email: S, role: Role) -> Self {
        Self { id, email: email.into(), role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Placed in the request extensions when a bearer token was supplied but could not be validated.
#[derive(Debug, Clone)]
pub struct InvalidToken(pub String);

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let extensions = req.extensions();
        let result = match (extensions.get::<JwtClaims>(), extensions.get::<InvalidToken>()) {
            (Some(claims), _) => Ok(claims.clone()),
            (None, Some(InvalidToken(reason))) => Err(AuthError::InvalidToken(reason.clone()).into()),
            (None, None) => Err(AuthError::MissingToken.into()),
        };
        ready(result)
    }
}

fn key_for(config: &AuthConfig, role: Role) -> Hs256Key {
    let secret = match role {
        Role::User => config.user_token_secret.reveal(),
        Role::Admin => config.admin_token_secret.reveal(),
    };
    Hs256Key::new(secret.as_bytes())
}

pub struct TokenIssuer {
    user_key: Hs256Key,
    admin_key: Hs256Key,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            user_key: key_for(config, Role::User),
            admin_key: key_for(config, Role::Admin),
            lifetime: config.token_lifetime,
        }
    }

    pub fn issue_token(&self, claims: JwtClaims) -> Result<String, AuthError> {
        self.issue_token_with_lifetime(claims, self.lifetime)
    }

    /// Signs `claims` with the key that belongs to `claims.role`.
    pub fn issue_token_with_lifetime(&self, claims: JwtClaims, lifetime: Duration) -> Result<String, AuthError> {
        let key = match claims.role {
            Role::User => &self.user_key,
            Role::Admin => &self.admin_key,
        };
        let header = Header::empty().with_token_type("JWT");
        let claims = Claims::new(claims).set_duration_and_issuance(&TimeOptions::default(), lifetime);
        Hs256.token(&header, &claims, key).map_err(|e| AuthError::CouldNotIssueToken(e.to_string()))
    }
}

pub struct TokenVerifier {
    user_key: Hs256Key,
    admin_key: Hs256Key,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self { user_key: key_for(config, Role::User), admin_key: key_for(config, Role::Admin) }
    }

    /// Validates the token against the user key, then the admin key. The returned role is that of the key that
    /// validated the token, whatever the `role` claim says.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let untrusted = UntrustedToken::new(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let (mut claims, role) = match Hs256.validator::<JwtClaims>(&self.user_key).validate(&untrusted) {
            Ok(token) => (token.claims().clone(), Role::User),
            Err(_) => {
                let token = Hs256
                    .validator::<JwtClaims>(&self.admin_key)
                    .validate(&untrusted)
                    .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
                (token.claims().clone(), Role::Admin)
            },
        };
        claims.validate_expiration(&TimeOptions::default()).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        if claims.custom.role != role {
            let (id, claimed) = (claims.custom.id, &claims.custom.role);
            warn!("🔑️ Token for #{id} claims the {claimed} role but was signed with the {role} key");
            claims.custom.role = role;
        }
        Ok(claims.custom)
    }
}
