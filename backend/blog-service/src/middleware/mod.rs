/// HTTP middleware for blog-service
///
/// Session-cookie authentication: the middleware resolves the session cookie
/// to a user (fresh database read per request) and stores the identity in
/// request extensions. It never rejects a request itself; the `CurrentUser`
/// and `MaybeUser` extractors decide whether authentication is required.
pub mod permissions;

pub use permissions::*;

use crate::db::session_repo;
use crate::error::AppError;
use crate::models::Role;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

/// The authenticated user resolved from the session cookie.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
}

/// Optional authentication: `None` on anonymous requests.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn is_admin(&self) -> bool {
        matches!(self.0, Some(user) if user.role == Role::Admin)
    }
}

/// Actix middleware that resolves the session cookie into a `CurrentUser`.
pub struct SessionAuthMiddleware {
    pool: PgPool,
    cookie_name: String,
}

impl SessionAuthMiddleware {
    pub fn new(pool: PgPool, cookie_name: String) -> Self {
        Self { pool, cookie_name }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddlewareService {
            service: Rc::new(service),
            pool: self.pool.clone(),
            cookie_name: Rc::new(self.cookie_name.clone()),
        }))
    }
}

pub struct SessionAuthMiddlewareService<S> {
    service: Rc<S>,
    pool: PgPool,
    cookie_name: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddlewareService<S>
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
        let pool = self.pool.clone();
        let cookie_name = self.cookie_name.clone();

        Box::pin(async move {
            let session_id = req
                .request()
                .cookie(cookie_name.as_str())
                .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

            if let Some(session_id) = session_id {
                match session_repo::find_session_user(&pool, session_id).await {
                    Ok(Some(session_user)) => {
                        req.extensions_mut().insert(CurrentUser {
                            id: session_user.user_id,
                            role: session_user.role,
                        });
                    }
                    Ok(None) => {
                        // Expired or deleted session; proceed anonymously.
                    }
                    Err(err) => {
                        tracing::warn!(%session_id, "session lookup failed: {}", err);
                    }
                }
            }

            service.call(req).await
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(req.extensions().get::<CurrentUser>().copied().ok_or_else(|| {
            AppError::Unauthorized("Authentication required: Please sign in".to_string()).into()
        }))
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(MaybeUser(req.extensions().get::<CurrentUser>().copied())))
    }
}
