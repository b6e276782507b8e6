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

use std::convert::Infallible;
use std::fs;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use colored::Colorize;
use http::Request;
use http::Response;
use http::StatusCode;
use logforth_access::Level;
use logforth_access::RequestLogger;
use logforth_access::RequestLoggerBuilder;
use tempfile::TempDir;
use tower::Layer;
use tower::ServiceExt;
use tower::service_fn;

type Lines = Arc<Mutex<Vec<String>>>;

fn capture(builder: RequestLoggerBuilder) -> (RequestLogger, Lines) {
    let lines = Lines::default();
    let captured = lines.clone();
    let logger = builder
        .callback(move |line| captured.lock().unwrap().push(line.to_string()))
        .build()
        .unwrap();
    (logger, lines)
}

async fn request(logger: &RequestLogger, path: &str, status: u16) -> Response<String> {
    let service = logger.layer().layer(service_fn(move |_req: Request<()>| async move {
        let response = Response::builder()
            .status(status)
            .header("x-handler", "app")
            .body("body".to_string())
            .unwrap();
        Ok::<_, Infallible>(response)
    }));
    let req = Request::get(path).body(()).unwrap();
    service.oneshot(req).await.unwrap()
}

fn lines(logger: &RequestLogger, lines: &Lines) -> Vec<String> {
    logger.flush();
    lines.lock().unwrap().clone()
}

fn is_time(token: &str, fields: usize) -> bool {
    let parts = token.split(':').collect::<Vec<_>>();
    parts.len() == fields
        && parts
            .iter()
            .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_digit()))
}

#[tokio::test]
async fn test_timestamp_pattern() {
    let (logger, captured) = capture(RequestLogger::builder().color(false).timestamp("mm:ss"));
    request(&logger, "/", 404).await;

    let line = lines(&logger, &captured).remove(0);
    let first = line.split(' ').next().unwrap();
    assert!(is_time(first, 2), "{line}");
    assert!(line.ends_with(" GET 404 Not Found /"), "{line}");
}

#[tokio::test]
async fn test_timestamp_default_pattern() {
    let (logger, captured) = capture(RequestLogger::builder().color(false).timestamp(true));
    request(&logger, "/", 404).await;

    let line = lines(&logger, &captured).remove(0);
    assert!(is_time(line.split(' ').next().unwrap(), 3), "{line}");
}

#[tokio::test]
async fn test_no_timestamp() {
    let (logger, captured) = capture(RequestLogger::builder().color(false));
    request(&logger, "/", 404).await;

    assert_eq!(lines(&logger, &captured), ["GET 404 Not Found /"]);
}

#[tokio::test]
async fn test_level_tag() {
    let (logger, captured) = capture(
        RequestLogger::builder()
            .timestamp(false)
            .color(false)
            .level(Level::Log),
    );
    request(&logger, "/", 404).await;

    let line = lines(&logger, &captured).remove(0);
    assert!(line.contains("[LOG] GET 404 Not Found /"), "{line}");
}

#[tokio::test]
async fn test_level_gate_suppresses() {
    let (logger, captured) = capture(RequestLogger::builder().color(false).level(Level::Error));
    request(&logger, "/", 200).await;
    request(&logger, "/", 404).await;
    request(&logger, "/boom", 503).await;

    assert_eq!(lines(&logger, &captured), ["[ERROR] GET 503 Service Unavailable /boom"]);
}

#[tokio::test]
async fn test_custom_callback_without_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let (logger, captured) = capture(RequestLogger::builder().color(false));
    request(&logger, "/", 404).await;

    assert!(lines(&logger, &captured)[0].contains("GET 404 Not Found /"));
    assert!(logger.config().output.filename.is_none());
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_file_is_created() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let filename = temp_dir.path().join("tiny.log");
    let (logger, _) = capture(
        RequestLogger::builder()
            .color(false)
            .filename(&filename)
            .level(Level::Log),
    );
    assert!(!filename.exists());

    request(&logger, "/", 404).await;
    logger.flush();
    assert!(filename.exists());
}

#[tokio::test]
async fn test_file_lines_match_console() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let filename = temp_dir.path().join("logs").join("test1").join("tiny.log");
    let (logger, captured) = capture(
        RequestLogger::builder()
            .color(false)
            .filename(&filename)
            .level(Level::Warn),
    );

    request(&logger, "/", 404).await;
    logger.flush();

    let content = fs::read_to_string(&filename).unwrap();
    let file_lines = content.split('\n').collect::<Vec<_>>();
    assert_eq!(file_lines, ["[WARN] GET 404 Not Found /", ""]);
    assert_eq!(lines(&logger, &captured), [file_lines[0]]);
}

#[tokio::test]
async fn test_queued_lines_drain_on_drop() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let filename = temp_dir.path().join("async").join("access.log");
    let (logger, _) = capture(
        RequestLogger::builder()
            .color(false)
            .filename(&filename),
    );

    request(&logger, "/a", 200).await;
    request(&logger, "/b", 500).await;
    drop(logger);

    let content = fs::read_to_string(&filename).unwrap();
    assert_eq!(
        content,
        "GET 200 OK /a\nGET 500 Internal Server Error /b\n"
    );
}

#[tokio::test]
async fn test_blocking_writes_before_response() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let filename = temp_dir.path().join("access.log");
    let (logger, captured) = capture(
        RequestLogger::builder()
            .color(false)
            .blocking(true)
            .filename(&filename),
    );

    request(&logger, "/", 201).await;

    assert_eq!(*captured.lock().unwrap(), ["GET 201 Created /"]);
    assert_eq!(fs::read_to_string(&filename).unwrap(), "GET 201 Created /\n");
}

#[tokio::test]
async fn test_slow_destination_does_not_delay_response() {
    let delay = Duration::from_millis(300);
    let logger = RequestLogger::builder()
        .color(false)
        .shutdown_timeout(Duration::from_secs(5))
        .callback(move |_| std::thread::sleep(delay))
        .build()
        .unwrap();

    let start = Instant::now();
    request(&logger, "/a", 200).await;
    request(&logger, "/b", 200).await;
    let elapsed = start.elapsed();
    assert!(elapsed < delay, "responses took {elapsed:?}");

    logger.flush();
    assert!(start.elapsed() >= delay * 2);
}

#[tokio::test]
async fn test_status_colors() {
    colored::control::set_override(true);

    for (status, expected) in [
        (200, "200".bold().cyan()),
        (400, "400".bold().red()),
        (404, "404".bold().red()),
        (500, "500".bold().magenta()),
    ] {
        let (logger, captured) = capture(RequestLogger::builder().color(true));
        request(&logger, "/", status).await;

        let line = lines(&logger, &captured).remove(0);
        assert_eq!(line.split(' ').nth(1), Some(expected.to_string().as_str()));
    }
}

#[tokio::test]
async fn test_badges() {
    for (status, badge) in [(200, "✅"), (400, "🚫"), (404, "❓"), (500, "💣")] {
        let (logger, captured) = capture(RequestLogger::builder().color(false).emoji(true));
        request(&logger, "/", status).await;

        let line = lines(&logger, &captured).remove(0);
        assert_eq!(line.split(' ').next(), Some(badge), "{line}");
    }

    let (logger, captured) = capture(RequestLogger::builder().color(false).emoji(true));
    request(&logger, "/", 200).await;
    assert_eq!(lines(&logger, &captured), ["✅ GET 200 OK /"]);
}

#[tokio::test]
async fn test_badge_keeps_token_positions() {
    for status in [101, 200, 302, 404, 503] {
        let (logger, captured) = capture(RequestLogger::builder().color(false).emoji(true));
        request(&logger, "/", status).await;

        let line = lines(&logger, &captured).remove(0);
        let tokens = line.split(' ').collect::<Vec<_>>();
        assert_eq!(tokens[1], "GET", "{line}");
        assert_eq!(tokens[2], status.to_string(), "{line}");
    }

    let (logger, captured) = capture(RequestLogger::builder().color(false).emoji(true));
    request(&logger, "/", 302).await;
    assert_eq!(lines(&logger, &captured), [" GET 302 Found /"]);
}

#[tokio::test]
async fn test_no_badge_by_default() {
    let (logger, captured) = capture(RequestLogger::builder().color(false));
    request(&logger, "/", 200).await;

    assert_eq!(lines(&logger, &captured), ["GET 200 OK /"]);
}

#[tokio::test]
async fn test_response_passes_through() {
    let (logger, captured) = capture(RequestLogger::builder().color(false));
    let response = request(&logger, "/teapot?brew=1", 418).await;

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(response.headers()["x-handler"], "app");
    assert_eq!(response.body(), "body");
    assert_eq!(lines(&logger, &captured), ["GET 418 I'm a teapot /teapot?brew=1"]);
}

#[tokio::test]
async fn test_ignored_paths_and_methods() {
    let (logger, captured) = capture(
        RequestLogger::builder()
            .color(false)
            .ignore("/health")
            .methods([http::Method::GET]),
    );
    request(&logger, "/health", 200).await;
    request(&logger, "/users", 200).await;

    let service = logger.layer().layer(service_fn(|_req: Request<()>| async {
        Ok::<_, Infallible>(Response::new(()))
    }));
    let req = Request::post("/users").body(()).unwrap();
    service.oneshot(req).await.unwrap();

    assert_eq!(lines(&logger, &captured), ["GET 200 OK /users"]);
}

#[tokio::test]
async fn test_ip_and_response_time() {
    let (logger, captured) = capture(
        RequestLogger::builder()
            .color(false)
            .ip(true)
            .response_time(true),
    );
    let service = logger.layer().layer(service_fn(|_req: Request<()>| async {
        Ok::<_, Infallible>(Response::new(()))
    }));
    let req = Request::get("/")
        .header("x-forwarded-for", "203.0.113.9")
        .body(())
        .unwrap();
    service.oneshot(req).await.unwrap();

    let line = lines(&logger, &captured).remove(0);
    let tokens = line.split(' ').collect::<Vec<_>>();
    assert_eq!(tokens[..5], ["203.0.113.9", "GET", "200", "OK", "/"]);
    assert!(tokens[5].ends_with("ms"), "{line}");
}

#[tokio::test]
async fn test_failed_request_is_not_logged() {
    let (logger, captured) = capture(RequestLogger::builder().color(false));
    let service = logger.layer().layer(service_fn(|_req: Request<()>| async {
        Err::<Response<()>, _>("connection reset")
    }));
    let req = Request::get("/").body(()).unwrap();
    assert!(service.oneshot(req).await.is_err());

    assert!(lines(&logger, &captured).is_empty());
}

#[tokio::test]
async fn test_aborted_request_is_not_logged() {
    let (logger, captured) = capture(RequestLogger::builder().color(false));
    let service = logger.layer().layer(service_fn(|_req: Request<()>| async {
        std::future::pending::<Result<Response<()>, Infallible>>().await
    }));
    let req = Request::get("/").body(()).unwrap();
    let fut = service.oneshot(req);
    drop(fut);

    assert!(lines(&logger, &captured).is_empty());
}
