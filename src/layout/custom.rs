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

use std::fmt;

use crate::layout::Layout;
use crate::record::Record;

type FormatFunction = dyn Fn(&Record) -> String + Send + Sync + 'static;

/// A layout that formats records with a user-supplied function.
///
/// # Examples
///
/// ```
/// use logforth_access::layout::CustomLayout;
///
/// let layout = CustomLayout::new(|record| {
///     format!("{} {} -> {}", record.method(), record.path(), record.status())
/// });
/// ```
pub struct CustomLayout {
    f: Box<FormatFunction>,
}

impl fmt::Debug for CustomLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomLayout {{ ... }}")
    }
}

impl CustomLayout {
    /// Creates a layout from a format function.
    pub fn new(layout: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        CustomLayout {
            f: Box::new(layout),
        }
    }
}

impl Layout for CustomLayout {
    fn format(&self, record: &Record) -> String {
        (self.f)(record)
    }
}
