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

//! Receivers for errors that cannot be returned to the caller.
//!
//! A line is written after the response is produced, so a failing destination has nobody to
//! return its error to. The sink hands such errors to a [`Trap`] instead.

use std::fmt;

use crate::Error;

mod default;

pub use self::default::DefaultTrap;

/// A receiver of errors raised while writing log lines.
pub trait Trap: fmt::Debug + Send + Sync + 'static {
    /// Handle an error raised by a destination.
    fn trap(&self, err: &Error);
}

impl<T: Trap> From<T> for Box<dyn Trap> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
