/// JWT Authentication Middleware
///
/// Extracts the bearer token from the Authorization header, runs it through
/// the full access-token validation chain (decode, type check, principal
/// lookup) and injects the resolved `Principal` into request extensions for
/// route handlers.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{validate_token, JwtKeys, TokenType};
use crate::error::{AppError, AuthError};
use crate::store::{PgCredentialStore, RedisRevocationStore};

/// Middleware guarding routes that require an access token.
#[derive(Clone)]
pub struct JwtMiddleware {
    keys: JwtKeys,
    credentials: PgCredentialStore,
    revocations: RedisRevocationStore,
}

impl JwtMiddleware {
    pub fn new(
        keys: JwtKeys,
        credentials: PgCredentialStore,
        revocations: RedisRevocationStore,
    ) -> Self {
        Self {
            keys,
            credentials,
            revocations,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            keys: self.keys.clone(),
            credentials: self.credentials.clone(),
            revocations: self.revocations.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    keys: JwtKeys,
    credentials: PgCredentialStore,
    revocations: RedisRevocationStore,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
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
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.to_string());

        let keys = self.keys.clone();
        let credentials = self.credentials.clone();
        let revocations = self.revocations.clone();
        let service = self.service.clone();

        Box::pin(async move {
            let token = match bearer {
                Some(token) => token,
                None => {
                    tracing::warn!("Missing or invalid Authorization header");
                    return Err(AppError::Auth(AuthError::MissingToken).into());
                }
            };

            match validate_token(
                &token,
                TokenType::Access,
                &keys,
                &credentials,
                &revocations,
            )
            .await
            {
                Ok(principal) => {
                    tracing::debug!(
                        user_id = principal.id,
                        username = %principal.username,
                        "Access token validated"
                    );
                    req.extensions_mut().insert(principal);
                    service.call(req).await
                }
                Err(e) => Err(e.into()),
            }
        })
    }
}
