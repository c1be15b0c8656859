use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::task::{Context, Poll};

use actix_service::{Service, Transform};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::Error;
use futures::future::{ok, Ready};
use futures::Future;

lazy_static! {
    static ref STATS: Stats = Stats::new();
}

/// Global request/error counters, served on the admin stats route.
pub struct Stats {
    requests: AtomicU32,
    errors: AtomicU32,
}

#[derive(Serialize, Debug)]
pub struct LoadedStats {
    pub requests: u32,
    pub errors: u32,
}

impl Stats {
    fn new() -> Stats {
        Stats {
            requests: AtomicU32::new(0u32),
            errors: AtomicU32::new(0u32),
        }
    }

    fn record_request() {
        STATS.requests.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error() {
        STATS.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Load the atomic stats variables as regular u32's
    pub fn load() -> LoadedStats {
        LoadedStats {
            requests: STATS.requests.load(Ordering::Relaxed),
            errors: STATS.errors.load(Ordering::Relaxed),
        }
    }
}

pub struct Middleware;

impl Middleware {
    pub fn default() -> Middleware {
        Middleware
    }
}

impl<S, B> Transform<S> for Middleware
where
    S: Service<Request = ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
{
    type Request = ServiceRequest;
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestCountMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestCountMiddleware { service })
    }
}

pub struct RequestCountMiddleware<S> {
    service: S,
}

impl<S, B> Service for RequestCountMiddleware<S>
where
    S: Service<Request = ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
{
    type Request = ServiceRequest;
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: ServiceRequest) -> Self::Future {
        Stats::record_request();

        let fut = self.service.call(request);

        Box::pin(async move {
            let res = fut.await?;

            if res.response().status().is_server_error() {
                Stats::record_error();
            }

            Ok(res)
        })
    }
}
