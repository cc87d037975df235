use futures::future::{ok, LocalBoxFuture, Ready};

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
};

/// Serves JSON bodies as `text/plain` to clients whose `Accept` header
/// starts with `text/plain`. The body bytes are left untouched.
pub struct ContentNegotiation;

pub struct ContentNegotiationMiddleware<S> {
    service: S,
}

impl<S, B> Transform<S, ServiceRequest> for ContentNegotiation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;

    type Error = actix_web::Error;

    type InitError = ();

    type Transform = ContentNegotiationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ContentNegotiationMiddleware { service })
    }
}

impl<S, B> Service<ServiceRequest> for ContentNegotiationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;

    type Error = actix_web::Error;

    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let wants_plain_text = accepts_plain_text(&req);

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            if wants_plain_text && is_json(&res) {
                res.headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
            }

            Ok(res)
        })
    }
}

fn accepts_plain_text(req: &ServiceRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .map_or(false, |accept| accept.starts_with("text/plain"))
}

fn is_json<B>(res: &ServiceResponse<B>) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .map_or(false, |content_type| {
            content_type.starts_with("application/json")
        })
}
