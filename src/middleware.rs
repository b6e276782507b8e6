// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The `tower` middleware that logs every completed request.
//!
//! ```
//! use std::convert::Infallible;
//!
//! use http::Request;
//! use http::Response;
//! use logforth_access::RequestLogger;
//! use tower::Layer;
//! use tower::service_fn;
//!
//! let logger = RequestLogger::builder().emoji(true).build().unwrap();
//! let service = logger.layer().layer(service_fn(|_req: Request<()>| async {
//!     Ok::<_, Infallible>(Response::new(()))
//! }));
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;
use std::task::ready;
use std::time::Instant;

use http::Method;
use http::Request;
use http::Response;
use http::StatusCode;
use tower::Layer;
use tower::Service;

use crate::RequestLogger;
use crate::record::Record;

/// A [`Layer`] that wraps services with [`RequestLoggerService`].
#[derive(Debug, Clone)]
pub struct RequestLoggerLayer {
    logger: RequestLogger,
}

impl RequestLoggerLayer {
    /// Create a layer logging through `logger`.
    pub fn new(logger: RequestLogger) -> Self {
        Self { logger }
    }
}

impl From<RequestLogger> for RequestLoggerLayer {
    fn from(logger: RequestLogger) -> Self {
        Self::new(logger)
    }
}

impl<S> Layer<S> for RequestLoggerLayer {
    type Service = RequestLoggerService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLoggerService {
            inner,
            logger: self.logger.clone(),
        }
    }
}

/// Logs one line for each request the inner service answers.
///
/// The request is always passed on unchanged. The line is handed to the logger once the inner
/// service has produced its response; requests whose future is dropped or fails are not logged.
/// Unless the logger is blocking, this only queues the line and the response is returned without
/// waiting for the write.
#[derive(Debug, Clone)]
pub struct RequestLoggerService<S> {
    inner: S,
    logger: RequestLogger,
}

impl<S, B, R> Service<Request<B>> for RequestLoggerService<S>
where
    S: Service<Request<B>, Response = Response<R>>,
{
    type Response = Response<R>;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let pending = PendingRecord::new(&self.logger, &req);
        ResponseFuture {
            inner: self.inner.call(req),
            pending,
            logger: self.logger.clone(),
        }
    }
}

/// What is known about a request before its response exists.
#[derive(Debug)]
struct PendingRecord {
    method: Method,
    path: String,
    remote_addr: Option<String>,
    start: Instant,
}

impl PendingRecord {
    fn new<B>(logger: &RequestLogger, req: &Request<B>) -> Option<PendingRecord> {
        let path = request_path(req);
        if !logger.accepts(req.method(), path) {
            return None;
        }
        let remote_addr = if logger.config().ip {
            remote_addr(req)
        } else {
            None
        };
        Some(PendingRecord {
            method: req.method().clone(),
            path: path.to_string(),
            remote_addr,
            start: Instant::now(),
        })
    }

    fn finish(self, status: StatusCode) -> Record {
        Record::builder()
            .method(self.method)
            .path(self.path)
            .status(status.as_u16())
            .remote_addr(self.remote_addr)
            .elapsed(self.start.elapsed())
            .build()
    }
}

fn request_path<B>(req: &Request<B>) -> &str {
    req.uri()
        .path_and_query()
        .map(|path| path.as_str())
        .unwrap_or_default()
}

/// The client address, preferring proxy headers over the socket address.
fn remote_addr<B>(req: &Request<B>) -> Option<String> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| {
            req.extensions()
                .get::<SocketAddr>()
                .map(|addr| addr.ip().to_string())
        })
}

/// Response future of [`RequestLoggerService`].
#[pin_project::pin_project]
pub struct ResponseFuture<F> {
    #[pin]
    inner: F,
    pending: Option<PendingRecord>,
    logger: RequestLogger,
}

impl<F, R, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<Response<R>, E>>,
{
    type Output = Result<Response<R>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let result = ready!(this.inner.poll(cx));

        if let Ok(response) = &result {
            if let Some(pending) = this.pending.take() {
                this.logger.log(&pending.finish(response.status()));
            }
        }

        Poll::Ready(result)
    }
}
