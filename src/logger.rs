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

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use http::Method;

use crate::Error;
use crate::Layout;
use crate::RequestLoggerLayer;
use crate::Trap;
use crate::append::Append;
use crate::append::Callback;
use crate::append::File;
use crate::append::Stdout;
use crate::config::LoggerConfig;
use crate::config::Timestamp;
use crate::layout::TextLayout;
use crate::record::Level;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::WorkerOptions;
use crate::trap::DefaultTrap;

/// Formats completed requests and writes them to the configured destinations.
///
/// Cloning is cheap: every clone shares the same configuration, layout and sink, including the
/// lazily opened log file.
#[derive(Debug, Clone)]
pub struct RequestLogger {
    inner: Arc<LoggerInner>,
}

#[derive(Debug)]
struct LoggerInner {
    config: LoggerConfig,
    layout: Box<dyn Layout>,
    sink: Sink,
}

impl RequestLogger {
    /// Create a [`RequestLoggerBuilder`] with the default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use logforth_access::Level;
    /// use logforth_access::RequestLogger;
    ///
    /// let logger = RequestLogger::builder()
    ///     .timestamp(true)
    ///     .emoji(true)
    ///     .level(Level::Warn)
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> RequestLoggerBuilder {
        RequestLoggerBuilder::default()
    }

    /// The normalized configuration.
    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    /// Whether a request with this method and path is logged at all.
    pub fn accepts(&self, method: &Method, path: &str) -> bool {
        self.inner.config.accepts(method, path)
    }

    /// Format a record without writing it.
    pub fn format(&self, record: &Record) -> String {
        self.inner.layout.format(record)
    }

    /// Format a record and write it to the sink.
    ///
    /// Records rejected by the method or path filters, or below the minimum level, are dropped
    /// before formatting.
    pub fn log(&self, record: &Record) {
        let inner = self.inner.as_ref();
        if !inner.config.accepts(record.method(), record.path()) {
            return;
        }
        let level = record.level();
        if !inner.sink.enabled(level) {
            return;
        }
        let line = inner.layout.format(record);
        inner.sink.emit(&line, level);
    }

    /// The sink lines are written to.
    pub fn sink(&self) -> &Sink {
        &self.inner.sink
    }

    /// Wait for queued lines to be written, then flush every destination.
    pub fn flush(&self) {
        self.inner.sink.flush();
    }

    /// A [`tower::Layer`] wrapping services with this logger.
    pub fn layer(&self) -> RequestLoggerLayer {
        RequestLoggerLayer::new(self.clone())
    }
}

/// A builder for [`RequestLogger`].
#[must_use = "call `build` to construct the logger"]
#[derive(Debug)]
pub struct RequestLoggerBuilder {
    config: LoggerConfig,
    level_tag: Option<bool>,
    layout: Option<Box<dyn Layout>>,
    append: Box<dyn Append>,
    worker: WorkerOptions,
    trap: Arc<dyn Trap>,
}

impl Default for RequestLoggerBuilder {
    fn default() -> Self {
        Self {
            config: LoggerConfig::default(),
            level_tag: None,
            layout: None,
            append: Box::new(Stdout::default()),
            worker: WorkerOptions::default(),
            trap: Arc::new(DefaultTrap::default()),
        }
    }
}

impl RequestLoggerBuilder {
    /// Render a timestamp as the first token: `false`, `true` or a pattern.
    ///
    /// Default to disabled.
    pub fn timestamp(mut self, timestamp: impl Into<Timestamp>) -> Self {
        self.config.timestamp = timestamp.into();
        self
    }

    /// Prepend the status badge. Default to `false`.
    pub fn emoji(mut self, emoji: bool) -> Self {
        self.config.emoji = emoji;
        self
    }

    /// Render the client address. Default to `false`.
    pub fn ip(mut self, ip: bool) -> Self {
        self.config.ip = ip;
        self
    }

    /// Append the response time. Default to `false`.
    pub fn response_time(mut self, response_time: bool) -> Self {
        self.config.response_time = response_time;
        self
    }

    /// Only log requests with these methods. Default to every method.
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.config.methods = Some(methods.into_iter().collect());
        self
    }

    /// Do not log requests whose path starts with `prefix`.
    pub fn ignore(mut self, prefix: impl Into<String>) -> Self {
        self.config.ignore.push(prefix.into());
        self
    }

    /// Color the status code. Default to `true`.
    pub fn color(mut self, color: bool) -> Self {
        self.config.output.color = color;
        self
    }

    /// Only write lines at `level` or above.
    ///
    /// This also renders the level as a `[LEVEL]` tag, unless [`level_tag`](Self::level_tag) says
    /// otherwise.
    pub fn level(mut self, level: Level) -> Self {
        self.config.output.level = Some(level);
        self
    }

    /// Whether to render the configured level as a `[LEVEL]` tag.
    ///
    /// Default to whether a level is configured.
    pub fn level_tag(mut self, level_tag: bool) -> Self {
        self.level_tag = Some(level_tag);
        self
    }

    /// Also append every written line to this file.
    pub fn filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.config.output.filename = Some(filename.into());
        self
    }

    /// Write lines on the request task instead of a background thread.
    ///
    /// By default, logging a request only queues its line, and a dedicated thread writes it to
    /// every destination. Blocking mode writes before the response is handed back, which makes
    /// the response wait for slow destinations.
    pub fn blocking(mut self, blocking: bool) -> Self {
        self.config.output.blocking = blocking;
        self
    }

    /// Sets the buffer size of queued lines. Unbounded by default.
    ///
    /// Once the buffer is full, logging a request waits for the background thread.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.worker.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// Sets how long flushing, and dropping the last logger clone, wait for queued lines.
    /// Default to one second.
    pub fn shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.worker.shutdown_timeout = Some(shutdown_timeout);
        self
    }

    /// Replace the primary destination. Default to [`Stdout`].
    pub fn append(mut self, append: impl Into<Box<dyn Append>>) -> Self {
        self.append = append.into();
        self
    }

    /// Replace the primary destination with a function receiving each line.
    pub fn callback(self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.append(Callback::new(callback))
    }

    /// Replace the default [`TextLayout`].
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Set the trap receiving errors raised while writing. Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Build the [`RequestLogger`].
    ///
    /// # Errors
    ///
    /// Return an error if the background writer thread cannot be spawned.
    pub fn build(self) -> Result<RequestLogger, Error> {
        let RequestLoggerBuilder {
            mut config,
            level_tag,
            layout,
            append,
            worker,
            trap,
        } = self;

        config.output.level_tag = level_tag.unwrap_or(config.output.level.is_some());

        let file = config.output.filename.as_ref().map(File::new);
        let level = config.output.level;
        let sink = if config.output.blocking {
            Sink::blocking(level, append, file, trap)
        } else {
            Sink::non_blocking(level, append, file, trap, worker)?
        };

        let layout = layout.unwrap_or_else(|| Box::new(TextLayout::from_config(&config)));
        Ok(RequestLogger {
            inner: Arc::new(LoggerInner {
                config,
                layout,
                sink,
            }),
        })
    }
}
