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

//! A background writer thread fed through a channel.

mod builder;
mod worker;

pub(crate) use self::builder::NonBlocking;
pub(crate) use self::builder::NonBlockingBuilder;
pub(crate) use self::builder::WorkerGuard;

use crossbeam_channel::Sender;

use crate::Error;
use crate::record::Level;

#[derive(Debug)]
enum Message {
    Line(String, Level),
    /// Flush the writer, then acknowledge.
    Flush(Sender<()>),
    Shutdown,
}

/// The destination of lines received by the worker thread.
pub(crate) trait Writer: Send + 'static {
    fn write_line(&mut self, line: &str, level: Level) -> Result<(), Error>;

    fn flush(&mut self) -> Result<(), Error>;
}
