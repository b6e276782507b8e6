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

//! Layouts for formatting completed requests.

use std::fmt;

use crate::record::Record;

mod custom;
mod text;

pub use self::custom::CustomLayout;
pub use self::text::TextLayout;

/// Formats a completed request into a single line.
///
/// Implementations must be pure: formatting the same record twice yields the same line. The line
/// carries no trailing newline; destinations separate lines.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Formats a completed request.
    fn format(&self, record: &Record) -> String;
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
