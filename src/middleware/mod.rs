/// HTTP middleware utilities for the community service
///
/// Bearer-token authentication in front of the API scope plus the pure
/// authorization predicates in `permissions`. Token issuance belongs to the
/// external auth service; this middleware only validates inbound tokens and
/// resolves the acting user.
pub mod permissions;

pub use permissions::{check_group_access, check_group_request, check_mutate, Access, DenyReason};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::user_repo;
use crate::error::AppError;
use crate::models::User;

/// Claims this service reads from an access token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Shared state for token validation and actor lookup
pub struct AuthState {
    pool: PgPool,
    decoding_key: DecodingKey,
}

impl AuthState {
    pub fn new(pool: PgPool, jwt_secret: &str) -> Self {
        Self {
            pool,
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }
}

/// Decode a bearer token down to the user id it names
pub fn decode_user_id(token: &str, key: &DecodingKey) -> Result<Uuid, AppError> {
    let data = decode::<Claims>(token, key, &Validation::new(Algorithm::HS256))
        .map_err(|_| AppError::Unauthorized("invalid or expired token".to_string()))?;

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| AppError::Unauthorized("invalid user id in token".to_string()))
}

/// Actix middleware that resolves the acting user from a Bearer token.
///
/// Requests without an Authorization header pass through unauthenticated;
/// the `CurrentUser` extractor decides per handler whether that is allowed.
/// A header that is present but does not validate fails the request.
pub struct BearerAuth {
    state: Arc<AuthState>,
}

impl BearerAuth {
    pub fn new(state: Arc<AuthState>) -> Self {
        Self { state }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService {
            service: Rc::new(service),
            state: self.state.clone(),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: Rc<S>,
    state: Arc<AuthState>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let state = self.state.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get("Authorization")
                .map(|h| h.to_str().map(str::to_owned))
                .transpose()
                .map_err(|_| AppError::Unauthorized("invalid Authorization header".to_string()))?;

            if let Some(header) = header {
                let token = header.strip_prefix("Bearer ").ok_or_else(|| {
                    AppError::Unauthorized("invalid Authorization scheme".to_string())
                })?;

                let user_id = decode_user_id(token, &state.decoding_key)?;

                let user = user_repo::find_user_by_id(&state.pool, user_id)
                    .await
                    .map_err(AppError::from)?
                    .ok_or_else(|| AppError::Unauthorized("unknown user".to_string()))?;

                req.extensions_mut().insert(CurrentUser(user));
            }

            service.call(req).await
        })
    }
}

/// The authenticated actor, stored in request extensions by `BearerAuth`.
///
/// Extracting it from an unauthenticated request denies the operation; the
/// public read endpoints simply do not ask for it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(|| {
                    AppError::Forbidden(DenyReason::Unauthenticated.message().to_string()).into()
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token_for(sub: &str, exp: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn key() -> DecodingKey {
        DecodingKey::from_secret(SECRET.as_bytes())
    }

    #[test]
    fn a_valid_token_resolves_to_its_user_id() {
        let user_id = Uuid::new_v4();
        let token = token_for(&user_id.to_string(), Utc::now().timestamp() + 3600);
        assert_eq!(decode_user_id(&token, &key()).unwrap(), user_id);
    }

    #[test]
    fn an_expired_token_is_rejected() {
        let token = token_for(
            &Uuid::new_v4().to_string(),
            Utc::now().timestamp() - 3600,
        );
        assert!(matches!(
            decode_user_id(&token, &key()),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn a_token_signed_with_another_secret_is_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"other-secret"),
        )
        .unwrap();
        assert!(decode_user_id(&token, &key()).is_err());
    }

    #[test]
    fn a_non_uuid_subject_is_rejected() {
        let token = token_for("not-a-uuid", Utc::now().timestamp() + 3600);
        assert!(matches!(
            decode_user_id(&token, &key()),
            Err(AppError::Unauthorized(_))
        ));
    }
}
