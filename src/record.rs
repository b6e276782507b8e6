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

//! The completed request record and the levels derived from it.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use http::Method;
use http::StatusCode;
use jiff::Zoned;

use crate::Error;

/// Reason phrase rendered for status codes missing from the canonical table.
pub const UNKNOWN_STATUS_TEXT: &str = "Unknown";

/// Severity of a logged request, derived from its status class.
///
/// Levels are ordered by increasing severity: `Log < Warn < Error`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Level {
    /// Informational, 2xx and 3xx responses.
    Log,
    /// Client errors, 4xx responses.
    Warn,
    /// Server errors, 5xx responses.
    Error,
}

impl Level {
    /// Derive the level of a response from its status code.
    ///
    /// Codes outside the 4xx and 5xx classes map to [`Level::Log`].
    pub fn from_status(status: u16) -> Level {
        match status {
            400..=499 => Level::Warn,
            500..=599 => Level::Error,
            _ => Level::Log,
        }
    }

    /// The lowercase name of the level.
    pub fn name(&self) -> &'static str {
        match self {
            Level::Log => "log",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    /// The uppercase tag rendered in front of a line, e.g. `[WARN]`.
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Log => "[LOG]",
            Level::Warn => "[WARN]",
            Level::Error => "[ERROR]",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for level in [Level::Log, Level::Warn, Level::Error] {
            if s.trim().eq_ignore_ascii_case(level.name()) {
                return Ok(level);
            }
        }
        Err(Error::new("unknown log level").with_context("level", s))
    }
}

/// A request that has completed, ready to be formatted.
///
/// Built once the response is available and discarded after the line is emitted.
#[derive(Clone, Debug)]
pub struct Record {
    time: Zoned,
    method: Method,
    path: String,
    status: u16,
    remote_addr: Option<String>,
    elapsed: Option<Duration>,
}

impl Record {
    /// Returns a new builder.
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// The instant the record was built.
    pub fn time(&self) -> &Zoned {
        &self.time
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path, including the query string. Empty if unknown.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The response status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The reason phrase of the status code.
    pub fn status_text(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or(UNKNOWN_STATUS_TEXT)
    }

    /// The level derived from the status class.
    pub fn level(&self) -> Level {
        Level::from_status(self.status)
    }

    /// The client address, if known.
    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }

    /// Time between receiving the request and completing the response, if measured.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                time: Zoned::now(),
                method: Method::GET,
                path: String::new(),
                status: 200,
                remote_addr: None,
                elapsed: None,
            },
        }
    }
}

impl RecordBuilder {
    /// Set [`time`](Record::time).
    pub fn time(mut self, time: Zoned) -> Self {
        self.record.time = time;
        self
    }

    /// Set [`method`](Record::method).
    pub fn method(mut self, method: Method) -> Self {
        self.record.method = method;
        self
    }

    /// Set [`path`](Record::path).
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.record.path = path.into();
        self
    }

    /// Set [`status`](Record::status).
    pub fn status(mut self, status: u16) -> Self {
        self.record.status = status;
        self
    }

    /// Set [`remote_addr`](Record::remote_addr).
    pub fn remote_addr(mut self, addr: Option<String>) -> Self {
        self.record.remote_addr = addr;
        self
    }

    /// Set [`elapsed`](Record::elapsed).
    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.record.elapsed = Some(elapsed);
        self
    }

    /// Invoke the builder and return a [`Record`].
    pub fn build(self) -> Record {
        self.record
    }
}
