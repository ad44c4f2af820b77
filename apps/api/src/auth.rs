//! Bearer-token authentication.
//!
//! Verification goes through the `TokenVerifier` trait carried in
//! `AppState`, so handlers and tests never touch the JWT library directly.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated caller, inserted into request extensions by
/// `require_auth` and extracted by handlers via `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Verifies a bearer token and yields the caller identity.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AuthUser, AppError>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

/// HS256 JWT verifier. The `sub` claim is the user id.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<AuthUser, AppError> {
        let data =
            decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
                tracing::debug!("token rejected: {e}");
                AppError::Unauthorized
            })?;
        if data.claims.sub.is_empty() {
            return Err(AppError::Unauthorized);
        }
        Ok(AuthUser {
            user_id: data.claims.sub,
        })
    }
}

/// Axum middleware guarding every `/api` route except the health check.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;
    let user = state.verifier.verify(token)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub fn arc_verifier(secret: &str) -> Arc<dyn TokenVerifier> {
    Arc::new(JwtVerifier::new(secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
    }

    fn sign(secret: &str, sub: &str) -> String {
        let claims = TestClaims {
            sub: sub.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_user_id() {
        let verifier = JwtVerifier::new("s3cret");
        let token = sign("s3cret", "user_42");
        let user = verifier.verify(&token).unwrap();
        assert_eq!(user.user_id, "user_42");
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let verifier = JwtVerifier::new("s3cret");
        let token = sign("other", "user_42");
        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let verifier = JwtVerifier::new("s3cret");
        assert!(matches!(
            verifier.verify("not.a.jwt"),
            Err(AppError::Unauthorized)
        ));
    }
}
