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

use crate::Manager;
use crate::Severity;

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Debug,
        }
    }
}

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        log::Log::enabled(Manager::global(), metadata)
    }

    fn log(&self, record: &log::Record) {
        log::Log::log(Manager::global(), record);
    }

    fn flush(&self) {
        log::Log::flush(Manager::global());
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] so that all logs from the log crate are forwarded to
/// the global [`Manager`]. The record target is used as the channel name.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// use logchannel::ConfigList;
/// use logchannel::Manager;
///
/// logchannel::bridge::setup_log_crate();
///
/// let mut configs = ConfigList::new();
/// configs.add_output("OutputConsole");
/// Manager::global().configure(&configs).unwrap();
///
/// log::warn!(target: "main.bridge", "forwarded to the main.bridge channel");
/// ```
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "logchannel::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}

impl log::Log for Manager {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.get(metadata.target())
            .admits(Severity::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        self.logger(record.target())
            .log(Severity::from(record.level()))
            .append(record.args())
            .finish();
    }

    fn flush(&self) {
        Manager::flush(self);
    }
}
