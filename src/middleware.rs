//! Sends unauthenticated visitors to the auth service sign-in page.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::{StatusCode, header};
use actix_web::{Error, HttpResponse, web};

use crate::models::config::ServerConfig;

const SIGNIN_PATH: &str = "/auth/signin";

type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// Rewrites `401 Unauthorized` responses into a `303 See Other` to the
/// sign-in page.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let location = signin_url(&req);
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let res = service.call(req).await?;
            if res.status() != StatusCode::UNAUTHORIZED {
                return Ok(res.map_into_left_body());
            }

            let (req, _) = res.into_parts();
            let redirect = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish();
            Ok(ServiceResponse::new(req, redirect).map_into_right_body())
        })
    }
}

/// Sign-in page of the configured auth service, or the local path when no
/// configuration is registered.
fn signin_url(req: &ServiceRequest) -> String {
    match req.app_data::<web::Data<ServerConfig>>() {
        Some(config) if !config.auth_service_url.is_empty() => format!(
            "{}{SIGNIN_PATH}",
            config.auth_service_url.trim_end_matches('/')
        ),
        _ => SIGNIN_PATH.to_string(),
    }
}
