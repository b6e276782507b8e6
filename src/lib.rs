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

//! Logforth-access is a request logging middleware for `http`/`tower` services: one line per
//! completed request, optionally timestamped, colored and badged, written to the console and to a
//! file.
//!
//! # Overview
//!
//! A [`RequestLogger`] is configured once and shared by every request. Each completed request
//! becomes a [`Record`], which a [`Layout`] formats into a line such as:
//!
//! ```text
//! 22:44:57 ❓ [WARN] GET 404 Not Found /favicon.ico
//! ```
//!
//! The line is then routed by the sink: it passes a minimum level gate, goes to the primary
//! destination (stdout by default) and is appended to a log file if one is configured. The writes
//! happen on a background thread, so responses never wait for them. Errors raised while writing
//! never reach the request; they go to a [`Trap`].
//!
//! # Examples
//!
//! Log every request to stdout with the default options:
//!
//! ```
//! use logforth_access::RequestLogger;
//!
//! let layer = RequestLogger::builder().build().unwrap().layer();
//! ```
//!
//! Log client and server errors to stderr and to a file:
//!
//! ```no_run
//! use logforth_access::Level;
//! use logforth_access::RequestLogger;
//! use logforth_access::append;
//!
//! let logger = RequestLogger::builder()
//!     .timestamp("hh:mm:ss")
//!     .emoji(true)
//!     .level(Level::Warn)
//!     .append(append::Stderr::default())
//!     .filename("logs/access.log")
//!     .build()
//!     .unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod color;
pub mod config;
pub mod layout;
pub mod middleware;
pub mod record;
pub mod time;
pub mod trap;

mod error;
mod logger;
mod non_blocking;
mod sink;

pub use append::Append;
pub use config::LoggerConfig;
pub use config::LoggerOptions;
pub use config::Timestamp;
pub use error::Error;
pub use layout::Layout;
pub use logger::RequestLogger;
pub use logger::RequestLoggerBuilder;
pub use middleware::RequestLoggerLayer;
pub use middleware::RequestLoggerService;
pub use record::Level;
pub use record::Record;
pub use sink::Sink;
pub use trap::Trap;
