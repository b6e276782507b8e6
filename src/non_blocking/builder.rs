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

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::SendTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::unbounded;

use super::Message;
use super::Writer;
use super::worker::Worker;
use crate::Error;
use crate::Trap;
use crate::record::Level;

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Drains pending lines and stops the worker thread when dropped.
#[derive(Debug)]
pub(crate) struct WorkerGuard {
    _guard: Option<JoinHandle<()>>,
    sender: Sender<Message>,
    shutdown: Sender<()>,
    shutdown_timeout: Duration,
    trap: Arc<dyn Trap>,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let shutdown_timeout = self.shutdown_timeout;
        match self
            .sender
            .send_timeout(Message::Shutdown, shutdown_timeout)
        {
            Ok(()) => {
                // The worker answers on the zero-capacity channel only once every message queued
                // before the shutdown is written, so this waits for the drain.
                let _ = self.shutdown.send_timeout((), shutdown_timeout);
            }
            Err(SendTimeoutError::Disconnected(_)) => (),
            Err(SendTimeoutError::Timeout(_)) => {
                let err = Error::new("failed to send shutdown signal to the log writer")
                    .with_context("timeout", format!("{shutdown_timeout:?}"));
                self.trap.trap(&err);
            }
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NonBlocking {
    sender: Sender<Message>,
    flush_timeout: Duration,
}

impl NonBlocking {
    pub(crate) fn send(&self, line: String, level: Level) -> Result<(), Error> {
        self.sender
            .send(Message::Line(line, level))
            .map_err(|err| Error::new("failed to send log line to the log writer").with_source(err))
    }

    /// Wait until every line sent before this call is written and flushed.
    pub(crate) fn flush(&self) -> Result<(), Error> {
        let (ack, done) = bounded(1);
        self.sender
            .send(Message::Flush(ack))
            .map_err(|err| Error::new("failed to send flush signal to the log writer").with_source(err))?;
        done.recv_timeout(self.flush_timeout).map_err(|err| {
            Error::new("failed to flush the log writer")
                .with_context("timeout", format!("{:?}", self.flush_timeout))
                .with_source(err)
        })
    }
}

#[derive(Debug)]
pub(crate) struct NonBlockingBuilder<T: Writer> {
    thread_name: String,
    buffered_lines_limit: Option<usize>,
    shutdown_timeout: Option<Duration>,
    writer: T,
    trap: Arc<dyn Trap>,
}

impl<T: Writer> NonBlockingBuilder<T> {
    pub(crate) fn new(thread_name: impl Into<String>, writer: T, trap: Arc<dyn Trap>) -> Self {
        Self {
            thread_name: thread_name.into(),
            buffered_lines_limit: None,
            shutdown_timeout: None,
            writer,
            trap,
        }
    }

    pub(crate) fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    pub(crate) fn shutdown_timeout(mut self, shutdown_timeout: Option<Duration>) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    pub(crate) fn build(self) -> Result<(NonBlocking, WorkerGuard), Error> {
        let NonBlockingBuilder {
            thread_name,
            buffered_lines_limit,
            shutdown_timeout,
            writer,
            trap,
        } = self;

        let (sender, receiver) = match buffered_lines_limit {
            Some(cap) => bounded(cap),
            None => unbounded(),
        };
        let (shutdown_sender, shutdown_receiver) = bounded(0);

        let worker = Worker::new(writer, receiver, shutdown_receiver, trap.clone());
        let handle = worker.make_thread(thread_name)?;
        let shutdown_timeout = shutdown_timeout.unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT);
        let guard = WorkerGuard {
            _guard: Some(handle),
            sender: sender.clone(),
            shutdown: shutdown_sender,
            shutdown_timeout,
            trap,
        };
        let writer = NonBlocking {
            sender,
            flush_timeout: shutdown_timeout,
        };
        Ok((writer, guard))
    }
}
