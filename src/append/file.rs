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

use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::append::Append;
use crate::record::Level;

/// An appender that appends lines to a single file.
///
/// The parent directories and the file are created on the first write, and the handle is reused
/// afterwards. Writes are serialized, so lines never interleave. A failed open is retried on the
/// next line.
#[derive(Debug)]
pub struct File {
    path: PathBuf,
    writer: Mutex<LazyFileWriter>,
}

impl File {
    /// Create an appender for `path`.
    ///
    /// Nothing is touched on disk until the first line is written.
    pub fn new(path: impl Into<PathBuf>) -> File {
        let path = path.into();
        let writer = Mutex::new(LazyFileWriter::new(path.clone()));
        File { path, writer }
    }

    /// The path lines are appended to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, LazyFileWriter> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Append for File {
    fn append(&self, line: &str, _level: Level) -> Result<(), Error> {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        self.lock().write_line(&bytes)
    }

    fn flush(&self) -> Result<(), Error> {
        self.lock().flush()
    }
}

/// A file handle opened on the first write.
#[derive(Debug)]
struct LazyFileWriter {
    path: PathBuf,
    file: Option<fs::File>,
}

impl LazyFileWriter {
    fn new(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    fn write_line(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let file = match self.file.take() {
            Some(file) => file,
            None => open_log_file(&self.path)?,
        };
        let file = self.file.insert(file);
        file.write_all(bytes)
            .map_err(|err| Error::write_file(&self.path, err))
    }

    fn flush(&mut self) -> Result<(), Error> {
        match self.file.as_mut() {
            Some(file) => file
                .flush()
                .map_err(|err| Error::write_file(&self.path, err)),
            None => Ok(()),
        }
    }
}

fn open_log_file(path: &Path) -> Result<fs::File, Error> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        // create_dir_all succeeds if the directory already exists
        fs::create_dir_all(dir).map_err(|err| Error::create_dir(dir, err))?;
    }
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|err| Error::open_file(path, err))
}
