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

//! Timestamp patterns.
//!
//! A pattern is plain text in which the tokens `hh`, `mm` and `ss` are replaced by the
//! zero-padded hour (24-hour clock), minute and second. Tokens are case-sensitive and anything
//! else, including unknown tokens, is copied verbatim:
//!
//! ```
//! use jiff::civil::date;
//! use jiff::tz::TimeZone;
//!
//! let time = date(2024, 8, 11).at(9, 4, 7, 0).to_zoned(TimeZone::UTC).unwrap();
//! assert_eq!(logforth_access::time::format("hh:mm:ss", &time), "09:04:07");
//! assert_eq!(logforth_access::time::format("[mm:ss] HH", &time), "[04:07] HH");
//! ```

use jiff::Zoned;

/// Pattern used when the timestamp is enabled without an explicit pattern.
pub const DEFAULT_PATTERN: &str = "hh:mm:ss";

/// Render `time` according to `pattern`.
pub fn format(pattern: &str, time: &Zoned) -> String {
    let mut text = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while !rest.is_empty() {
        let field = if rest.starts_with("hh") {
            Some(time.hour())
        } else if rest.starts_with("mm") {
            Some(time.minute())
        } else if rest.starts_with("ss") {
            Some(time.second())
        } else {
            None
        };

        match field {
            Some(value) => {
                text.push_str(&format!("{value:02}"));
                rest = &rest[2..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(ch) = chars.next() {
                    text.push(ch);
                }
                rest = chars.as_str();
            }
        }
    }

    text
}

/// Render the current local time according to `pattern`.
pub fn now(pattern: &str) -> String {
    format(pattern, &Zoned::now())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use jiff::tz;
    use jiff::tz::TimeZone;

    use super::*;

    fn fixed_time() -> Zoned {
        date(2024, 8, 11)
            .at(22, 4, 57, 172_105_000)
            .to_zoned(TimeZone::fixed(tz::offset(8)))
            .unwrap()
    }

    #[test]
    fn test_default_pattern() {
        assert_eq!(format(DEFAULT_PATTERN, &fixed_time()), "22:04:57");
    }

    #[test]
    fn test_partial_pattern() {
        assert_eq!(format("mm:ss", &fixed_time()), "04:57");
        assert_eq!(format("hh", &fixed_time()), "22");
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        assert_eq!(format("YYYY-MM-DD hh:mm", &fixed_time()), "YYYY-MM-DD 22:04");
        assert_eq!(format("HH:MM:SS", &fixed_time()), "HH:MM:SS");
        assert_eq!(format("h:m:s", &fixed_time()), "h:m:s");
        assert_eq!(format("⏱ hhh", &fixed_time()), "⏱ 22h");
        assert_eq!(format("", &fixed_time()), "");
    }

    #[test]
    fn test_now_shape() {
        let text = now(DEFAULT_PATTERN);
        let parts = text.split(':').collect::<Vec<_>>();
        assert_eq!(parts.len(), 3);
        for part in parts {
            assert_eq!(part.len(), 2);
            assert!(part.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
