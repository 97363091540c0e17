//! Bearer token extraction.
//!
//! This middleware wraps the whole application. It reads the `Authorization: Bearer <token>` header and, if the token
//! validates, stores the [`JwtClaims`] in the request extensions. A token that fails validation leaves an
//! [`InvalidToken`] marker instead, so that protected routes can tell a bad token from a missing one. The middleware
//! never rejects a request itself; that is the job of the [`super::AclMiddlewareFactory`] and the `JwtClaims`
//! extractor.
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{debug, trace};

use crate::auth::{InvalidToken, TokenVerifier};

pub struct JwtAuthMiddlewareFactory {
    verifier: Arc<TokenVerifier>,
}

impl JwtAuthMiddlewareFactory {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = JwtAuthMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService { verifier: Arc::clone(&self.verifier), service: Rc::new(service) }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    verifier: Arc<TokenVerifier>,
    service: Rc<S>,
}

/// Returns the token from an `Authorization` header value, if it uses the Bearer scheme.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .map(String::from);
        if let Some(token) = token {
            match self.verifier.verify(&token) {
                Ok(claims) => {
                    trace!("🔑️ Request from #{} ({})", claims.id, claims.role);
                    req.extensions_mut().insert(claims);
                },
                Err(e) => {
                    debug!("🔑️ Rejected bearer token for {}. {e:?}", req.path());
                    req.extensions_mut().insert(InvalidToken(format!("{e:?}")));
                },
            }
        }
        let service = Rc::clone(&self.service);
        Box::pin(async move { service.call(req).await })
    }
}
