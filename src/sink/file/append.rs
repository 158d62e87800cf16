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

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Channel;
use crate::Config;
use crate::Error;
use crate::Layout;
use crate::layout::TextLayout;
use crate::record::Record;
use crate::sink::Sink;
use crate::sink::file::DEFAULT_FILENAME;
use crate::sink::file::DEFAULT_FILENAME_OLD;
use crate::sink::file::DEFAULT_MAX_SIZE;
use crate::sink::file::DEFAULT_MAX_STARTUP_SIZE;
use crate::sink::file::RotatingFileWriter;
use crate::sink::file::RotatingFileWriterBuilder;

/// A builder to configure and create a [`File`] sink.
#[derive(Debug)]
pub struct FileBuilder {
    builder: RotatingFileWriterBuilder,
    layout: Box<dyn Layout>,
}

impl FileBuilder {
    /// Create a new file sink builder writing to the given primary file.
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            builder: RotatingFileWriterBuilder::new().filename(filename),
            layout: Box::new(TextLayout::default()),
        }
    }

    /// Create a file sink builder from a config entry.
    ///
    /// Reads `filename` (default `log.txt`), `filename_old` (default `log.old.txt`),
    /// `max_size` (default 1 MiB) and `max_startup_size` (default `0`).
    ///
    /// # Errors
    ///
    /// Return a lookup error if a size value is not an unsigned integer.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let max_startup_size =
            config.get_parsed_or("max_startup_size", DEFAULT_MAX_STARTUP_SIZE)?;
        let max_size = config.get_parsed_or("max_size", DEFAULT_MAX_SIZE)?;
        let filename = config.get_or("filename", DEFAULT_FILENAME);
        let filename_old = config.get_or("filename_old", DEFAULT_FILENAME_OLD);

        Ok(FileBuilder::new(filename)
            .backup_filename(filename_old)
            .max_size(max_size)
            .max_startup_size(max_startup_size))
    }

    /// Build the [`File`] sink.
    ///
    /// # Errors
    ///
    /// Return a resource error if the primary file cannot be opened or rotated at startup.
    pub fn build(self) -> Result<File, Error> {
        let FileBuilder { builder, layout } = self;
        let writer = builder.build()?;
        Ok(File::new(writer, layout))
    }

    /// Set the layout for the logs.
    ///
    /// Default to [`TextLayout`].
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set the file the primary file is renamed to on rotation.
    pub fn backup_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.builder = self.builder.backup_filename(filename);
        self
    }

    /// Rotate before writing once the file exceeds `n` bytes.
    pub fn max_size(mut self, n: u64) -> Self {
        self.builder = self.builder.max_file_size(n);
        self
    }

    /// Rotate an existing file larger than `n` bytes when the sink is built, instead of
    /// appending to it.
    pub fn max_startup_size(mut self, n: u64) -> Self {
        self.builder = self.builder.max_startup_size(n);
        self
    }
}

/// A sink that writes log records to a file, keeping one backup on rotation.
#[derive(Debug)]
pub struct File {
    writer: Mutex<RotatingFileWriter>,
    layout: Box<dyn Layout>,
}

impl File {
    fn new(writer: RotatingFileWriter, layout: Box<dyn Layout>) -> Self {
        let writer = Mutex::new(writer);
        Self { writer, layout }
    }

    fn writer(&self) -> MutexGuard<'_, RotatingFileWriter> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The number of bytes tracked in the primary file.
    pub fn current_filesize(&self) -> u64 {
        self.writer().current_filesize()
    }
}

impl Sink for File {
    fn emit(&self, _: &Channel, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');
        self.writer().write_line(&bytes)
    }

    fn flush(&self) -> Result<(), Error> {
        self.writer().flush()
    }
}

impl Drop for File {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(|e| e.into_inner());
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::DateTime;
    use crate::ErrorKind;
    use crate::Severity;

    #[test]
    fn test_from_config() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("svc.txt");
        let config = Config::new("OutputFile")
            .with_value("filename", path.to_string_lossy())
            .with_value("filename_old", temp_dir.path().join("svc.old.txt").to_string_lossy())
            .with_value("max_size", "64");
        let file = FileBuilder::from_config(&config).unwrap().build().unwrap();

        let channel = Channel::new("svc", Severity::Debug);
        let record = Record::new("svc", Severity::Notice, DateTime::default(), "hello");
        file.emit(&channel, &record).unwrap();
        file.flush().unwrap();

        let line = "0000-00-00 00:00:00.000  svc          NOTE hello\n";
        assert_eq!(fs::read_to_string(&path).unwrap(), line);
        assert_eq!(file.current_filesize(), line.len() as u64);
    }

    #[test]
    fn test_from_config_defaults() {
        let builder = FileBuilder::from_config(&Config::new("OutputFile")).unwrap();
        let (path, backup_path, max_size, max_startup_size) = builder.builder.settings();
        assert_eq!(path, Path::new("log.txt"));
        assert_eq!(backup_path, Path::new("log.old.txt"));
        assert_eq!(max_size, 1024 * 1024);
        assert_eq!(max_startup_size, 0);

        let config = Config::new("OutputFile").with_value("max_startup_size", "4096");
        let builder = FileBuilder::from_config(&config).unwrap();
        let (path, backup_path, max_size, max_startup_size) = builder.builder.settings();
        assert_eq!(path, Path::new(DEFAULT_FILENAME));
        assert_eq!(backup_path, Path::new(DEFAULT_FILENAME_OLD));
        assert_eq!(max_size, DEFAULT_MAX_SIZE);
        assert_eq!(max_startup_size, 4096);
    }

    #[test]
    fn test_malformed_size() {
        let config = Config::new("OutputFile").with_value("max_size", "1MB");
        let err = FileBuilder::from_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(err.context("key"), Some("max_size"));
    }
}
