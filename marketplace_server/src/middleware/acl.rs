//! Access control list middleware.
//!
//! Wrap a route with [`AclMiddlewareFactory`] to restrict it to the given roles. The claims are put in place by the
//! [`super::JwtAuthMiddlewareFactory`], which must wrap the application. A request without a token is refused with a
//! 401, as is one whose token failed validation. A valid token whose role is not in the list gets a 403.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::warn;
use marketplace_engine::db_types::Role;

use crate::{
    auth::{InvalidToken, JwtClaims},
    errors::{AuthError, ServerError},
};

pub struct AclMiddlewareFactory {
    allowed_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(allowed_roles: &[Role]) -> Self {
        AclMiddlewareFactory { allowed_roles: allowed_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AclMiddlewareService { allowed_roles: self.allowed_roles.clone(), service: Rc::new(service) }))
    }
}

pub struct AclMiddlewareService<S> {
    allowed_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S> AclMiddlewareService<S> {
    fn check(&self, req: &ServiceRequest) -> Result<(), AuthError> {
        let extensions = req.extensions();
        match (extensions.get::<JwtClaims>(), extensions.get::<InvalidToken>()) {
            (Some(claims), _) if self.allowed_roles.contains(&claims.role) => Ok(()),
            (Some(claims), _) => {
                warn!("🔑️ #{} ({}) tried to access {} without permission", claims.id, claims.role, req.path());
                Err(AuthError::InsufficientPermissions)
            },
            (None, Some(InvalidToken(reason))) => Err(AuthError::InvalidToken(reason.clone())),
            (None, None) => Err(AuthError::MissingToken),
        }
    }
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
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
        if let Err(e) = self.check(&req) {
            return Box::pin(ready(Err(ServerError::from(e).into())));
        }
        let service = Rc::clone(&self.service);
        Box::pin(async move { service.call(req).await })
    }
}
