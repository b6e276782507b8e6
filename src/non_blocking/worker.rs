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

use crossbeam_channel::Receiver;
use crossbeam_channel::RecvError;
use crossbeam_channel::TryRecvError;

use super::Message;
use super::Writer;
use crate::Error;
use crate::Trap;

pub(crate) struct Worker<T: Writer> {
    writer: T,
    receiver: Receiver<Message>,
    shutdown: Receiver<()>,
    trap: Arc<dyn Trap>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum WorkerState {
    Empty,
    Disconnected,
    Continue,
    Shutdown,
}

impl<T: Writer> Worker<T> {
    pub(crate) fn new(
        writer: T,
        receiver: Receiver<Message>,
        shutdown: Receiver<()>,
        trap: Arc<dyn Trap>,
    ) -> Worker<T> {
        Self {
            writer,
            receiver,
            shutdown,
            trap,
        }
    }

    fn handle(&mut self, message: Message) -> WorkerState {
        match message {
            Message::Line(line, level) => {
                if let Err(err) = self.writer.write_line(&line, level) {
                    self.trap.trap(&err);
                }
                WorkerState::Continue
            }
            Message::Flush(ack) => {
                if let Err(err) = self.writer.flush() {
                    self.trap.trap(&err);
                }
                let _ = ack.send(());
                WorkerState::Continue
            }
            Message::Shutdown => WorkerState::Shutdown,
        }
    }

    fn recv(&mut self) -> WorkerState {
        match self.receiver.recv() {
            Ok(message) => self.handle(message),
            Err(RecvError) => WorkerState::Disconnected,
        }
    }

    fn try_recv(&mut self) -> WorkerState {
        match self.receiver.try_recv() {
            Ok(message) => self.handle(message),
            Err(TryRecvError::Empty) => WorkerState::Empty,
            Err(TryRecvError::Disconnected) => WorkerState::Disconnected,
        }
    }

    pub(crate) fn work(&mut self) -> WorkerState {
        let mut worker_state = self.recv();

        while worker_state == WorkerState::Continue {
            worker_state = self.try_recv();
        }

        if let Err(err) = self.writer.flush() {
            self.trap.trap(&err);
        }
        worker_state
    }

    pub(crate) fn make_thread(
        mut self,
        name: String,
    ) -> Result<std::thread::JoinHandle<()>, Error> {
        std::thread::Builder::new()
            .name(name)
            .spawn(move || {
                loop {
                    match self.work() {
                        WorkerState::Continue | WorkerState::Empty => {}
                        WorkerState::Shutdown | WorkerState::Disconnected => {
                            let _ = self.shutdown.recv();
                            break;
                        }
                    }
                }
            })
            .map_err(|err| {
                Error::new("failed to spawn the log writer thread").with_source(err)
            })
    }
}
