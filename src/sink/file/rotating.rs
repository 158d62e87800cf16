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
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;
use crate::ErrorKind;

/// Default primary log file.
pub const DEFAULT_FILENAME: &str = "log.txt";
/// Default backup log file.
pub const DEFAULT_FILENAME_OLD: &str = "log.old.txt";
/// Default size above which the file is rotated, in bytes.
pub const DEFAULT_MAX_SIZE: u64 = 1024 * 1024;
/// Default size above which an existing file is rotated at startup, in bytes.
pub const DEFAULT_MAX_STARTUP_SIZE: u64 = 0;

/// A file writer that keeps one backup when the primary file grows too large.
///
/// Rotation closes the primary file, deletes the backup, renames the primary to the backup and
/// opens a fresh primary. The steps are not atomic: a crash in between can leave no primary file
/// and no backup.
#[derive(Debug)]
pub struct RotatingFileWriter {
    state: State,
    writer: Option<File>,
}

impl RotatingFileWriter {
    /// Creates a new [`RotatingFileWriterBuilder`].
    #[must_use]
    pub fn builder() -> RotatingFileWriterBuilder {
        RotatingFileWriterBuilder::new()
    }

    /// Write one complete line, rotating first if the file already exceeds the size limit.
    ///
    /// # Errors
    ///
    /// Return an error if a rotation or reopen fails, or if the write fails. The line is
    /// dropped in that case.
    pub fn write_line(&mut self, buf: &[u8]) -> Result<(), Error> {
        if self.state.should_rollover_on_size() {
            self.rotate()?;
        } else if self.writer.is_none() {
            self.open()?;
        }

        if let Some(writer) = &mut self.writer {
            writer.write_all(buf).map_err(|err| {
                Error::from_io_error(err).with_context("path", self.state.path.display())
            })?;
            self.state.current_filesize += buf.len() as u64;
        }
        Ok(())
    }

    /// Flush the primary file, if open.
    pub fn flush(&mut self) -> Result<(), Error> {
        match &mut self.writer {
            Some(writer) => writer.flush().map_err(Error::from_io_error),
            None => Ok(()),
        }
    }

    /// The number of bytes tracked in the primary file.
    pub fn current_filesize(&self) -> u64 {
        self.state.current_filesize
    }

    /// Whether the primary file is open.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// The primary file path.
    pub fn path(&self) -> &Path {
        &self.state.path
    }

    /// The backup file path.
    pub fn backup_path(&self) -> &Path {
        &self.state.backup_path
    }

    fn open(&mut self) -> Result<(), Error> {
        self.writer = Some(self.state.create_log_writer()?);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(err) = writer.flush() {
                eprintln!("failed to flush previous writer: {err}");
            }
        }
        self.state.current_filesize = 0;
    }

    fn rotate(&mut self) -> Result<(), Error> {
        self.close();
        // both may fail when the files do not exist yet
        let _ = fs::remove_file(&self.state.backup_path);
        let _ = fs::rename(&self.state.path, &self.state.backup_path);
        self.open()
    }
}

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        self.close();
    }
}

/// A builder for configuring [`RotatingFileWriter`].
#[derive(Debug, Clone)]
pub struct RotatingFileWriterBuilder {
    path: PathBuf,
    backup_path: PathBuf,
    max_size: u64,
    max_startup_size: u64,
}

impl Default for RotatingFileWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RotatingFileWriterBuilder {
    /// Creates a new [`RotatingFileWriterBuilder`] with the default file names and sizes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FILENAME),
            backup_path: PathBuf::from(DEFAULT_FILENAME_OLD),
            max_size: DEFAULT_MAX_SIZE,
            max_startup_size: DEFAULT_MAX_STARTUP_SIZE,
        }
    }

    /// Sets the primary file path.
    #[must_use]
    pub fn filename(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the backup file path.
    #[must_use]
    pub fn backup_filename(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_path = path.into();
        self
    }

    /// Sets the size in bytes above which the file is rotated before the next write.
    #[must_use]
    pub fn max_file_size(mut self, n: u64) -> Self {
        self.max_size = n;
        self
    }

    /// Sets the size in bytes above which an existing file is rotated when the writer is built.
    ///
    /// The default of `0` rotates any non-empty existing file.
    #[must_use]
    pub fn max_startup_size(mut self, n: u64) -> Self {
        self.max_startup_size = n;
        self
    }

    #[cfg(test)]
    pub(crate) fn settings(&self) -> (&Path, &Path, u64, u64) {
        (
            &self.path,
            &self.backup_path,
            self.max_size,
            self.max_startup_size,
        )
    }

    /// Builds the [`RotatingFileWriter`].
    ///
    /// # Errors
    ///
    /// Return a [`ErrorKind::Resource`] error if the primary file cannot be opened.
    pub fn build(self) -> Result<RotatingFileWriter, Error> {
        let Self {
            path,
            backup_path,
            max_size,
            max_startup_size,
        } = self;

        let existing = fs::metadata(&path)
            .ok()
            .filter(|metadata| metadata.is_file())
            .map(|metadata| metadata.len());
        let mut writer = RotatingFileWriter {
            state: State {
                path,
                backup_path,
                max_size,
                max_startup_size,
                current_filesize: 0,
            },
            writer: None,
        };

        match existing {
            Some(size) if size > writer.state.max_startup_size => writer.rotate()?,
            Some(size) => {
                writer.open()?;
                writer.state.current_filesize = size;
            }
            None => writer.open()?,
        }
        Ok(writer)
    }
}

#[derive(Debug)]
struct State {
    path: PathBuf,
    backup_path: PathBuf,
    max_size: u64,
    max_startup_size: u64,
    current_filesize: u64,
}

impl State {
    fn create_log_writer(&self) -> Result<File, Error> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| {
                Error::new(ErrorKind::Resource, "failed to create log directory")
                    .with_context("path", dir.display())
                    .with_source(err)
            })?;
        }

        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| {
                Error::new(ErrorKind::Resource, "failed to open log file")
                    .with_context("path", self.path.display())
                    .with_source(err)
            })
    }

    fn should_rollover_on_size(&self) -> bool {
        self.current_filesize > self.max_size
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rand::Rng;
    use rand::distr::Alphanumeric;
    use tempfile::TempDir;

    use super::*;

    fn builder(dir: &TempDir) -> RotatingFileWriterBuilder {
        RotatingFileWriterBuilder::new()
            .filename(dir.path().join("app.log"))
            .backup_filename(dir.path().join("app.old.log"))
    }

    #[test]
    fn test_file_rolling_via_file_size() {
        test_file_rolling_for_specific_file_size(100);
        test_file_rolling_for_specific_file_size(1000);
        test_file_rolling_for_specific_file_size(8888);
    }

    fn test_file_rolling_for_specific_file_size(max_size: u64) {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let mut writer = builder(&temp_dir).max_file_size(max_size).build().unwrap();

        for _ in 0..5 {
            let mut expected_file_size = 0;
            let mut written = Vec::new();
            while expected_file_size <= max_size {
                let line = generate_random_line();
                expected_file_size += line.len() as u64;
                writer.write_line(line.as_bytes()).unwrap();
                written.extend_from_slice(line.as_bytes());
                assert_eq!(writer.current_filesize(), expected_file_size);
            }
            writer.flush().unwrap();
            assert_eq!(fs::read(writer.path()).unwrap(), written);

            let trigger = generate_random_line();
            writer.write_line(trigger.as_bytes()).unwrap();
            writer.flush().unwrap();

            assert_eq!(writer.current_filesize(), trigger.len() as u64);
            assert_eq!(fs::read(writer.backup_path()).unwrap(), written);
            assert_eq!(fs::read_to_string(writer.path()).unwrap(), trigger);

            // start the next round from an empty primary file
            drop(writer);
            fs::remove_file(temp_dir.path().join("app.log")).unwrap();
            writer = builder(&temp_dir).max_file_size(max_size).build().unwrap();
        }
    }

    #[test]
    fn test_startup_rotation() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "previous run\n").unwrap();

        let mut writer = builder(&temp_dir).build().unwrap();
        assert_eq!(writer.current_filesize(), 0);
        writer.write_line(b"fresh\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("app.old.log")).unwrap(),
            "previous run\n"
        );
    }

    #[test]
    fn test_startup_append() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.log");
        fs::write(&path, "previous run\n").unwrap();

        let mut writer = builder(&temp_dir).max_startup_size(1024).build().unwrap();
        assert_eq!(writer.current_filesize(), 13);
        writer.write_line(b"appended\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "previous run\nappended\n"
        );
        assert!(!temp_dir.path().join("app.old.log").exists());
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("nested").join("dir").join("app.log");
        let mut writer = RotatingFileWriterBuilder::new()
            .filename(&path)
            .backup_filename(temp_dir.path().join("app.old.log"))
            .build()
            .unwrap();
        writer.write_line(b"hello\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_open_failure_is_resource_error() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        // a directory cannot be opened as a log file
        let err = RotatingFileWriterBuilder::new()
            .filename(temp_dir.path())
            .backup_filename(temp_dir.path().join("app.old.log"))
            .max_startup_size(u64::MAX)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resource);
    }

    fn generate_random_line() -> String {
        let mut rng = rand::rng();
        let len = rng.random_range(50..=100);
        let mut line: String = std::iter::repeat(())
            .map(|()| rng.sample(Alphanumeric))
            .map(char::from)
            .take(len)
            .collect();
        line.push('\n');
        line
    }
}
