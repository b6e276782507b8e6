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

use std::any::Any;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use crate::Error;
use crate::Trap;
use crate::append::Append;
use crate::append::File;
use crate::non_blocking::NonBlocking;
use crate::non_blocking::NonBlockingBuilder;
use crate::non_blocking::WorkerGuard;
use crate::non_blocking::Writer;
use crate::record::Level;

/// Routes formatted lines to the configured destinations.
///
/// A line passes the level gate first. It then goes to the primary destination (standard output
/// unless replaced) and, if configured, is appended to a file. Emitting never fails and never
/// panics: errors from either destination are handed to the [`Trap`].
///
/// By default the destinations are written from a background thread and emitting only queues the
/// line. A blocking sink writes them on the calling thread instead.
#[derive(Debug)]
pub struct Sink {
    level: Option<Level>,
    dispatch: Dispatch,
    trap: Arc<dyn Trap>,
}

#[derive(Debug)]
enum Dispatch {
    Blocking(Destinations),
    NonBlocking {
        writer: NonBlocking,
        _guard: WorkerGuard,
    },
}

/// Options of the background writer thread.
#[derive(Debug, Clone, Default)]
pub(crate) struct WorkerOptions {
    pub(crate) buffered_lines_limit: Option<usize>,
    pub(crate) shutdown_timeout: Option<Duration>,
}

impl Sink {
    pub(crate) fn blocking(
        level: Option<Level>,
        append: Box<dyn Append>,
        file: Option<File>,
        trap: Arc<dyn Trap>,
    ) -> Self {
        let destinations = Destinations {
            append,
            file,
            trap: trap.clone(),
        };
        Self {
            level,
            dispatch: Dispatch::Blocking(destinations),
            trap,
        }
    }

    pub(crate) fn non_blocking(
        level: Option<Level>,
        append: Box<dyn Append>,
        file: Option<File>,
        trap: Arc<dyn Trap>,
        options: WorkerOptions,
    ) -> Result<Self, Error> {
        let destinations = Destinations {
            append,
            file,
            trap: trap.clone(),
        };
        let (writer, guard) =
            NonBlockingBuilder::new("logforth-access", destinations, trap.clone())
                .buffered_lines_limit(options.buffered_lines_limit)
                .shutdown_timeout(options.shutdown_timeout)
                .build()?;
        Ok(Self {
            level,
            dispatch: Dispatch::NonBlocking {
                writer,
                _guard: guard,
            },
            trap,
        })
    }

    /// Whether a line at `level` passes the minimum level gate.
    pub fn enabled(&self, level: Level) -> bool {
        self.level.is_none_or(|min| level >= min)
    }

    /// Whether lines are written on the calling thread.
    pub fn is_blocking(&self) -> bool {
        matches!(self.dispatch, Dispatch::Blocking(_))
    }

    /// Write `line` to every destination, unless `level` is below the minimum level.
    pub fn emit(&self, line: &str, level: Level) {
        if !self.enabled(level) {
            return;
        }

        match &self.dispatch {
            Dispatch::Blocking(destinations) => destinations.deliver(line, level),
            Dispatch::NonBlocking { writer, .. } => {
                if let Err(err) = writer.send(line.to_string(), level) {
                    self.trap.trap(&err);
                }
            }
        }
    }

    /// Flush every destination, reporting failures to the trap.
    ///
    /// A non-blocking sink first waits for the lines already emitted to be written, at most for
    /// the shutdown timeout.
    pub fn flush(&self) {
        match &self.dispatch {
            Dispatch::Blocking(destinations) => destinations.flush(),
            Dispatch::NonBlocking { writer, .. } => {
                if let Err(err) = writer.flush() {
                    self.trap.trap(&err);
                }
            }
        }
    }
}

#[derive(Debug)]
struct Destinations {
    append: Box<dyn Append>,
    file: Option<File>,
    trap: Arc<dyn Trap>,
}

impl Destinations {
    fn deliver(&self, line: &str, level: Level) {
        self.deliver_to(self.append.as_ref(), line, level);
        if let Some(file) = &self.file {
            self.deliver_to(file, line, level);
        }
    }

    fn flush(&self) {
        if let Err(err) = self.append.flush() {
            self.trap.trap(&err);
        }
        if let Some(file) = &self.file {
            if let Err(err) = file.flush() {
                self.trap.trap(&err);
            }
        }
    }

    fn deliver_to(&self, append: &dyn Append, line: &str, level: Level) {
        match panic::catch_unwind(AssertUnwindSafe(|| append.append(line, level))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => self.trap.trap(&err),
            Err(payload) => {
                let err = Error::new("log destination panicked")
                    .with_context("destination", format!("{append:?}"))
                    .with_context("panic", panic_message(payload.as_ref()));
                self.trap.trap(&err);
            }
        }
    }
}

// Failures are trapped per destination, so the worker never sees an error.
impl Writer for Destinations {
    fn write_line(&mut self, line: &str, level: Level) -> Result<(), Error> {
        self.deliver(line, level);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        Destinations::flush(self);
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
