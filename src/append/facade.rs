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

use crate::Error;
use crate::append::Append;
use crate::record::Level;

/// An appender that forwards lines to the [`log`] facade.
///
/// Lines are logged under the `access` target by default. Requests at [`Level::Log`] map to
/// [`log::Level::Info`]; warnings and errors map to their namesakes.
#[derive(Debug, Clone)]
pub struct Log {
    target: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            target: "access".to_string(),
        }
    }
}

impl Log {
    /// Set the target lines are logged under.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }
}

fn log_level(level: Level) -> log::Level {
    match level {
        Level::Log => log::Level::Info,
        Level::Warn => log::Level::Warn,
        Level::Error => log::Level::Error,
    }
}

impl Append for Log {
    fn append(&self, line: &str, level: Level) -> Result<(), Error> {
        log::log!(target: self.target.as_str(), log_level(level), "{line}");
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        log::logger().flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(log_level(Level::Log), log::Level::Info);
        assert_eq!(log_level(Level::Warn), log::Level::Warn);
        assert_eq!(log_level(Level::Error), log::Level::Error);
    }
}
