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

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fs;

use http::Request;
use http::Response;
use logforth_access::RequestLogger;
use tempfile::TempDir;
use tower::Layer;
use tower::ServiceExt;
use tower::service_fn;

const REQUESTS: usize = 200;

async fn hammer(logger: RequestLogger) {
    let service = logger.layer().layer(service_fn(|req: Request<()>| async move {
        tokio::task::yield_now().await;
        let status = if req.uri().path().ends_with('7') { 404 } else { 200 };
        let response = Response::builder().status(status).body(()).unwrap();
        Ok::<_, Infallible>(response)
    }));

    let handles = (0..REQUESTS)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                let req = Request::get(format!("/items/{i}")).body(()).unwrap();
                service.oneshot(req).await.unwrap();
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.await.unwrap();
    }
    logger.flush();
}

fn check_lines(content: &str) {
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), REQUESTS);

    let mut seen = BTreeSet::new();
    for line in lines {
        let path = match line.strip_prefix("GET 200 OK ") {
            Some(path) => path,
            None => line
                .strip_prefix("GET 404 Not Found ")
                .unwrap_or_else(|| panic!("malformed line: {line:?}")),
        };
        let i = path
            .strip_prefix("/items/")
            .and_then(|i| i.parse::<usize>().ok())
            .unwrap_or_else(|| panic!("malformed line: {line:?}"));
        assert!(seen.insert(i), "duplicated line: {line:?}");
    }
    assert_eq!(seen.len(), REQUESTS);
    assert!(content.ends_with('\n'));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_requests_blocking() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let filename = temp_dir.path().join("logs").join("access.log");
    let logger = RequestLogger::builder()
        .color(false)
        .blocking(true)
        .callback(|_| {})
        .filename(&filename)
        .build()
        .unwrap();

    hammer(logger).await;

    check_lines(&fs::read_to_string(&filename).unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_requests_non_blocking() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let filename = temp_dir.path().join("logs").join("access.log");
    let logger = RequestLogger::builder()
        .color(false)
        .callback(|_| {})
        .filename(&filename)
        .build()
        .unwrap();

    hammer(logger).await;

    check_lines(&fs::read_to_string(&filename).unwrap());
}
