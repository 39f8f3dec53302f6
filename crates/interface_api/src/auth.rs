//! Authentication
//!
//! A completed bootstrap flow yields an HS256 token carrying the user, the
//! selected role, and the session id. The session id ties the token to a
//! live server-side session so that logging out invalidates it.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::{Actor, FlowId, Role, UserId};
use domain_identity::Session;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: UserId,
    /// Session id (the bootstrap flow that produced it)
    pub sid: FlowId,
    pub name: String,
    pub role: Role,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Session has ended")]
    SessionEnded,
    #[error("Failed to issue token: {0}")]
    Issue(String),
}

/// The authenticated caller, placed in request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub session_id: FlowId,
    pub name: String,
    pub role: Role,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            session_id: claims.sid,
            name: claims.name,
            role: claims.role,
        }
    }
}

/// Creates a token for a freshly established session
pub fn create_token(
    session: &Session,
    session_id: FlowId,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: session.user.id,
        sid: session_id,
        name: session.user.name.clone(),
        role: session.role,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Issue(e.to_string()))
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use domain_identity::{Profile, SessionUser};

    fn session(role: Role) -> Session {
        Session {
            user: SessionUser {
                id: UserId::new(),
                name: "Jane Smith".to_string(),
                firm_code: "M100".to_string(),
                started_at: Utc::now(),
            },
            role,
            nationality: None,
            profile: Profile {
                name: "Jane Smith".to_string(),
                designation: None,
                department: None,
                location: None,
                manager: None,
                currency: Currency::USD,
            },
        }
    }

    #[test]
    fn test_token_round_trip() {
        let session = session(Role::Manager);
        let sid = FlowId::new();
        let token = create_token(&session, sid, "secret", 60).unwrap();

        let claims = validate_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, session.user.id);
        assert_eq!(claims.sid, sid);
        assert_eq!(claims.role, Role::Manager);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_token(&session(Role::Admin), FlowId::new(), "secret", 60).unwrap();
        assert!(matches!(validate_token(&token, "other"), Err(AuthError::InvalidToken)));
    }
}
