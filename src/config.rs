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

//! Logger configuration.
//!
//! [`LoggerOptions`] is the loose, user-facing form: every field is optional and the timestamp
//! accepts a boolean, a bare pattern or a `{ format }` object. It is normalized once into a
//! [`LoggerConfig`], which is what the formatter and the sink read for every request.

use std::path::PathBuf;

use http::Method;

use crate::Error;
use crate::RequestLoggerBuilder;
use crate::append;
use crate::record::Level;
use crate::time::DEFAULT_PATTERN;

/// Whether and how a timestamp is rendered in front of each line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Timestamp {
    /// No timestamp token.
    #[default]
    Disabled,
    /// Render with [`DEFAULT_PATTERN`].
    Default,
    /// Render with the given pattern, see [`time`](crate::time).
    Pattern(String),
}

impl Timestamp {
    /// The pattern to render, or `None` if disabled.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Timestamp::Disabled => None,
            Timestamp::Default => Some(DEFAULT_PATTERN),
            Timestamp::Pattern(pattern) => Some(pattern),
        }
    }
}

impl From<bool> for Timestamp {
    fn from(enabled: bool) -> Self {
        if enabled {
            Timestamp::Default
        } else {
            Timestamp::Disabled
        }
    }
}

impl From<&str> for Timestamp {
    fn from(pattern: &str) -> Self {
        Timestamp::Pattern(pattern.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(pattern: String) -> Self {
        Timestamp::Pattern(pattern)
    }
}

/// The normalized configuration, immutable once the logger is built.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Timestamp token.
    pub timestamp: Timestamp,
    /// Prepend the status badge.
    pub emoji: bool,
    /// Render the client address token.
    pub ip: bool,
    /// Append the response time token.
    pub response_time: bool,
    /// Only requests with these methods are logged; `None` logs every method.
    pub methods: Option<Vec<Method>>,
    /// Requests whose path starts with any of these prefixes are not logged.
    pub ignore: Vec<String>,
    /// Output options.
    pub output: OutputConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            timestamp: Timestamp::Disabled,
            emoji: false,
            ip: false,
            response_time: false,
            methods: None,
            ignore: vec![],
            output: OutputConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Whether a request with this method and path is logged at all.
    pub fn accepts(&self, method: &Method, path: &str) -> bool {
        if let Some(methods) = &self.methods {
            if !methods.contains(method) {
                return false;
            }
        }
        !self.ignore.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// The level rendered as the `[LEVEL]` tag, if any.
    pub fn level_tag(&self) -> Option<Level> {
        if self.output.level_tag {
            self.output.level
        } else {
            None
        }
    }
}

/// Output part of [`LoggerConfig`].
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Color the status code.
    pub color: bool,
    /// Minimum level for a line to be written; `None` writes every line.
    pub level: Option<Level>,
    /// Render the configured level as a `[LEVEL]` tag.
    pub level_tag: bool,
    /// File every accepted line is appended to.
    pub filename: Option<PathBuf>,
    /// Write lines on the request task; by default a background thread writes them.
    pub blocking: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            level: None,
            level_tag: false,
            filename: None,
            blocking: false,
        }
    }
}

/// Loose configuration, as written in a configuration file.
///
/// ```json
/// {
///   "timestamp": { "format": "mm:ss" },
///   "emoji": true,
///   "ignore": ["/health"],
///   "output": { "color": false, "level": "warn", "filename": "logs/access.log" }
/// }
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct LoggerOptions {
    /// `false`, `true`, a pattern or `{ "format": pattern }`.
    pub timestamp: TimestampOption,
    /// Prepend the status badge.
    pub emoji: bool,
    /// Render the client address token.
    pub ip: bool,
    /// Append the response time token.
    pub response_time: bool,
    /// Method names to log; all methods if unset.
    pub methods: Option<Vec<String>>,
    /// Path prefixes not to log.
    pub ignore: Vec<String>,
    /// Output options.
    pub output: OutputOptions,
}

/// The overloaded forms accepted for the timestamp option.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum TimestampOption {
    /// `true` or `false`.
    Enabled(bool),
    /// A bare pattern.
    Pattern(String),
    /// An object with an optional pattern.
    Format(TimestampFormat),
}

/// The object form of [`TimestampOption`]; the default pattern if `format` is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct TimestampFormat {
    /// The pattern.
    pub format: Option<String>,
}

impl Default for TimestampOption {
    fn default() -> Self {
        TimestampOption::Enabled(false)
    }
}

impl From<TimestampOption> for Timestamp {
    fn from(option: TimestampOption) -> Self {
        match option {
            TimestampOption::Enabled(enabled) => Timestamp::from(enabled),
            TimestampOption::Pattern(pattern) => Timestamp::Pattern(pattern),
            TimestampOption::Format(TimestampFormat { format: None }) => Timestamp::Default,
            TimestampOption::Format(TimestampFormat {
                format: Some(pattern),
            }) => Timestamp::Pattern(pattern),
        }
    }
}

/// Output part of [`LoggerOptions`].
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct OutputOptions {
    /// Built-in destination receiving every accepted line.
    pub target: OutputTarget,
    /// Color the status code.
    pub color: bool,
    /// Minimum level for a line to be written.
    pub level: Option<Level>,
    /// Render the `[LEVEL]` tag; defaults to whether a level is set.
    pub level_tag: Option<bool>,
    /// File every accepted line is appended to.
    pub filename: Option<PathBuf>,
    /// Write lines on the request task instead of a background thread.
    pub blocking: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            target: OutputTarget::Stdout,
            color: true,
            level: None,
            level_tag: None,
            filename: None,
            blocking: false,
        }
    }
}

/// Built-in destinations selectable from [`OutputOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum OutputTarget {
    /// [`append::Stdout`].
    #[default]
    Stdout,
    /// [`append::Stderr`].
    Stderr,
    /// [`append::Log`].
    Log,
}

impl LoggerOptions {
    /// Normalize the options into a logger builder.
    ///
    /// # Errors
    ///
    /// Return an error if a method name is invalid.
    pub fn into_builder(self) -> Result<RequestLoggerBuilder, Error> {
        let LoggerOptions {
            timestamp,
            emoji,
            ip,
            response_time,
            methods,
            ignore,
            output,
        } = self;

        let mut builder = crate::RequestLogger::builder()
            .timestamp(timestamp)
            .emoji(emoji)
            .ip(ip)
            .response_time(response_time)
            .color(output.color);

        if let Some(methods) = methods {
            let methods = methods
                .iter()
                .map(|name| {
                    Method::from_bytes(name.trim().to_ascii_uppercase().as_bytes()).map_err(|err| {
                        Error::new("invalid request method")
                            .with_context("method", name)
                            .with_source(err)
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.methods(methods);
        }
        for prefix in ignore {
            builder = builder.ignore(prefix);
        }

        builder = match output.target {
            OutputTarget::Stdout => builder.append(append::Stdout::default()),
            OutputTarget::Stderr => builder.append(append::Stderr::default()),
            OutputTarget::Log => builder.append(append::Log::default()),
        };
        if let Some(level) = output.level {
            builder = builder.level(level);
        }
        if let Some(level_tag) = output.level_tag {
            builder = builder.level_tag(level_tag);
        }
        if let Some(filename) = output.filename {
            builder = builder.filename(filename);
        }
        if output.blocking {
            builder = builder.blocking(true);
        }

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_forms() {
        assert_eq!(Timestamp::from(false).pattern(), None);
        assert_eq!(Timestamp::from(true).pattern(), Some("hh:mm:ss"));
        assert_eq!(Timestamp::from("mm:ss").pattern(), Some("mm:ss"));

        let option = TimestampOption::Format(TimestampFormat::default());
        assert_eq!(Timestamp::from(option), Timestamp::Default);
        let option = TimestampOption::Format(TimestampFormat {
            format: Some("ss".to_string()),
        });
        assert_eq!(Timestamp::from(option).pattern(), Some("ss"));
    }

    #[test]
    fn test_accepts_methods_and_ignore() {
        let config = LoggerConfig {
            methods: Some(vec![Method::GET, Method::POST]),
            ignore: vec!["/health".to_string()],
            ..Default::default()
        };
        assert!(config.accepts(&Method::GET, "/users?page=2"));
        assert!(config.accepts(&Method::POST, "/"));
        assert!(!config.accepts(&Method::DELETE, "/users"));
        assert!(!config.accepts(&Method::GET, "/health"));
        assert!(!config.accepts(&Method::GET, "/healthz"));
        assert!(LoggerConfig::default().accepts(&Method::PATCH, ""));
    }

    #[test]
    fn test_level_tag_requires_level() {
        let mut config = LoggerConfig::default();
        config.output.level_tag = true;
        assert_eq!(config.level_tag(), None);

        config.output.level = Some(Level::Warn);
        assert_eq!(config.level_tag(), Some(Level::Warn));

        config.output.level_tag = false;
        assert_eq!(config.level_tag(), None);
    }

    #[test]
    fn test_invalid_method_is_rejected() {
        let options = LoggerOptions {
            methods: Some(vec!["get".to_string(), "NOT A METHOD".to_string()]),
            ..Default::default()
        };
        let err = options.into_builder().unwrap_err();
        assert_eq!(err.message(), "invalid request method");
        assert_eq!(err.context("method"), Some("NOT A METHOD"));
    }
}
