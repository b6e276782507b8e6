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

use crate::Error;
use crate::append::Append;
use crate::record::Level;

type CallbackFunction = dyn Fn(&str) + Send + Sync + 'static;

/// An appender that hands every line to a user-supplied function.
///
/// The function owns whatever it does with the line. A panic inside it is caught by the sink and
/// reported to its [`Trap`](crate::Trap).
///
/// # Examples
///
/// ```
/// use logforth_access::append::Callback;
///
/// let callback = Callback::new(|line| eprintln!("access: {line}"));
/// ```
pub struct Callback {
    f: Box<CallbackFunction>,
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback {{ ... }}")
    }
}

impl Callback {
    /// Creates an appender from a function.
    pub fn new(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Callback { f: Box::new(f) }
    }
}

impl Append for Callback {
    fn append(&self, line: &str, _level: Level) -> Result<(), Error> {
        (self.f)(line);
        Ok(())
    }
}
