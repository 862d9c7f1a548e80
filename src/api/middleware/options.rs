//! Plain OPTIONS responder
//!
//! 带 `Access-Control-Request-Method` 的 OPTIONS 是 CORS 预检，由外层的
//! CORS 中间件直接应答，不会到这里。其余 OPTIONS 返回 200 空响应，
//! CORS 头由外层补上。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::ACCESS_CONTROL_REQUEST_METHOD},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::trace;

#[derive(Clone, Default)]
pub struct OptionsResponder;

impl<S, B> Transform<S, ServiceRequest> for OptionsResponder
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = OptionsResponderMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OptionsResponderMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct OptionsResponderMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for OptionsResponderMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            if req.method() == Method::OPTIONS
                && !req.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
            {
                trace!("Answering plain OPTIONS for {}", req.path());
                return Ok(req.into_response(HttpResponse::Ok().finish().map_into_right_body()));
            }

            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}
