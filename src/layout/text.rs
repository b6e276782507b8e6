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

use std::time::Duration;

use crate::color;
use crate::config::LoggerConfig;
use crate::config::Timestamp;
use crate::layout::Layout;
use crate::record::Level;
use crate::record::Record;
use crate::time;

/// A layout that formats a completed request as one line of space-separated tokens.
///
/// Output format, with every optional token enabled:
///
/// ```text
/// 22:44:57 ❓ [WARN] 10.0.0.7 GET 404 Not Found /favicon.ico 3ms
/// ```
///
/// The tokens are, in order: timestamp, badge, level tag, client address, method, status code,
/// status text, path and response time. Disabled tokens are omitted entirely. Enabled tokens
/// whose value is unknown (an empty path, a missing client address, the badge of a 3xx status)
/// are still rendered as empty tokens, so that positions stay stable.
///
/// By default, the status code is bold and colored by its class, see [`color`]. Call
/// [`TextLayout::no_color`] to disable this.
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    timestamp: Timestamp,
    emoji: bool,
    no_color: bool,
    level_tag: Option<Level>,
    ip: bool,
    response_time: bool,
}

impl TextLayout {
    /// Create the layout described by a logger configuration.
    pub fn from_config(config: &LoggerConfig) -> Self {
        Self {
            timestamp: config.timestamp.clone(),
            emoji: config.emoji,
            no_color: !config.output.color,
            level_tag: config.level_tag(),
            ip: config.ip,
            response_time: config.response_time,
        }
    }

    /// Render a timestamp as the first token.
    pub fn timestamp(mut self, timestamp: impl Into<Timestamp>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Prepend the status badge.
    pub fn emoji(mut self) -> Self {
        self.emoji = true;
        self
    }

    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Render `level` as a `[LEVEL]` tag.
    pub fn level_tag(mut self, level: Level) -> Self {
        self.level_tag = Some(level);
        self
    }

    /// Render the client address.
    pub fn ip(mut self) -> Self {
        self.ip = true;
        self
    }

    /// Append the response time.
    pub fn response_time(mut self) -> Self {
        self.response_time = true;
        self
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{}ms", elapsed.as_millis())
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> String {
        let mut tokens = Vec::with_capacity(9);

        if let Some(pattern) = self.timestamp.pattern() {
            tokens.push(time::format(pattern, record.time()));
        }
        if self.emoji {
            // statuses without a badge keep an empty token
            tokens.push(color::status_badge(record.status()).unwrap_or_default().to_string());
        }
        if let Some(level) = self.level_tag {
            tokens.push(level.tag().to_string());
        }
        if self.ip {
            tokens.push(record.remote_addr().unwrap_or_default().to_string());
        }

        tokens.push(record.method().to_string());
        tokens.push(color::colorize_status(self.no_color, record.status()));
        tokens.push(record.status_text().to_string());
        tokens.push(record.path().to_string());

        if self.response_time {
            tokens.push(record.elapsed().map(format_elapsed).unwrap_or_default());
        }

        tokens.join(" ")
    }
}
