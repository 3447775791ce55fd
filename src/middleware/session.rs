use actix_web::{
    cookie::{Cookie, SameSite},
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorInternalServerError,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "trip_session";

/// The visitor's session id, set by `SessionMiddleware`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionId(pub Uuid);

impl FromRequest for SessionId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<SessionId>() {
            Some(id) => ready(Ok(*id)),
            None => ready(Err(ErrorInternalServerError("Session middleware not mounted"))),
        }
    }
}

/// Gives every request a session id from the `trip_session` cookie, issuing a new one
/// when the cookie is missing or unreadable.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService { service }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let existing = req
            .cookie(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

        let (id, is_new) = match existing {
            Some(id) => (id, false),
            None => (Uuid::new_v4(), true),
        };
        req.extensions_mut().insert(SessionId(id));

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            if is_new {
                log::debug!("Issued session {}", id);
                let cookie = Cookie::build(SESSION_COOKIE, id.to_string())
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .finish();
                res.response_mut().add_cookie(&cookie)?;
            }
            Ok(res)
        })
    }
}
