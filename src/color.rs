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

//! Color and badge selection by status class.
//!
//! The selection is a lookup in [`STATUS_RULES`], evaluated top-down where the first matching
//! rule wins:
//!
//! | Range   | Color   | Badge |
//! |---------|---------|-------|
//! | 200-299 | cyan    | ✅    |
//! | 300-399 | none    | none  |
//! | 404     | red     | ❓    |
//! | 400-499 | red     | 🚫    |
//! | 500-599 | magenta | 💣    |
//!
//! Any other code matches no rule and renders without color or badge.

use colored::Color;
use colored::Colorize;

/// Styling applied to one status range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusRule {
    /// First status code of the range, inclusive.
    pub start: u16,
    /// Last status code of the range, inclusive.
    pub end: u16,
    /// Color of the status code token.
    pub color: Option<Color>,
    /// Badge prepended to the line.
    pub badge: Option<&'static str>,
}

impl StatusRule {
    const fn new(start: u16, end: u16, color: Option<Color>, badge: Option<&'static str>) -> Self {
        Self {
            start,
            end,
            color,
            badge,
        }
    }

    /// Whether this rule applies to the status code.
    pub fn matches(&self, status: u16) -> bool {
        (self.start..=self.end).contains(&status)
    }
}

/// The ordered status style table. `404` must precede the generic client error row.
pub const STATUS_RULES: &[StatusRule] = &[
    StatusRule::new(200, 299, Some(Color::Cyan), Some("✅")),
    StatusRule::new(300, 399, None, None),
    StatusRule::new(404, 404, Some(Color::Red), Some("❓")),
    StatusRule::new(400, 499, Some(Color::Red), Some("🚫")),
    StatusRule::new(500, 599, Some(Color::Magenta), Some("💣")),
];

fn rule(status: u16) -> Option<&'static StatusRule> {
    STATUS_RULES.iter().find(|rule| rule.matches(status))
}

/// The color of a status code, if its class has one.
pub fn status_color(status: u16) -> Option<Color> {
    rule(status).and_then(|rule| rule.color)
}

/// The badge of a status code, if its class has one.
pub fn status_badge(status: u16) -> Option<&'static str> {
    rule(status).and_then(|rule| rule.badge)
}

/// Render the status code token.
///
/// With `no_color` unset, the code is bold and colored by its class. Codes without a color
/// render as plain digits either way.
///
/// Coloring goes through [`colored`], so `NO_COLOR`, `CLICOLOR_FORCE` and
/// [`colored::control::set_override`] are honored.
pub fn colorize_status(no_color: bool, status: u16) -> String {
    match status_color(status) {
        Some(color) if !no_color => status.to_string().bold().color(color).to_string(),
        _ => status.to_string(),
    }
}
