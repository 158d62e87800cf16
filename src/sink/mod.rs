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

//! Sinks that emit completed log records.

use std::fmt;
use std::str::FromStr;

use crate::Channel;
use crate::Config;
use crate::Error;
use crate::ErrorKind;
use crate::record::Record;

mod console;
mod debugger;
pub mod file;
#[cfg(unix)]
mod syslog;

pub use self::console::Console;
pub use self::console::LevelColor;
pub use self::debugger::Debugger;
pub use self::file::File;
pub use self::file::FileBuilder;
#[cfg(unix)]
pub use self::syslog::Syslog;

/// A target that emits log records.
///
/// Implementors must write each record with a single exclusive write, so that lines from
/// concurrent callers never interleave.
pub trait Sink: fmt::Debug + Send + Sync + 'static {
    /// Emit a log record of the given channel.
    fn emit(&self, channel: &Channel, record: &Record) -> Result<(), Error>;

    /// Flush any buffered records.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Sink> From<T> for Box<dyn Sink> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// The sink kinds that can be constructed from a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// `OutputConsole`: colored lines on stdout.
    Console,
    /// `OutputFile`: a size-rotated file.
    File,
    /// `OutputSyslog`: the system log, unix only.
    Syslog,
    /// `OutputDebug`: the platform debug output.
    Debugger,
}

impl SinkKind {
    /// The config name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Console => "OutputConsole",
            SinkKind::File => "OutputFile",
            SinkKind::Syslog => "OutputSyslog",
            SinkKind::Debugger => "OutputDebug",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for kind in [
            SinkKind::Console,
            SinkKind::File,
            SinkKind::Syslog,
            SinkKind::Debugger,
        ] {
            if kind.as_str() == s {
                return Ok(kind);
            }
        }

        Err(Error::new(ErrorKind::Config, "unknown sink kind").with_context("kind", s))
    }
}

/// Construct the sink described by a config entry.
///
/// The config name selects the [`SinkKind`]; its values parametrize the sink.
///
/// # Errors
///
/// Return an error if the kind is unknown or unsupported on this platform, if a value is
/// malformed, or if the sink's resource cannot be acquired.
pub fn build(config: &Config) -> Result<Box<dyn Sink>, Error> {
    let kind = config.name().parse::<SinkKind>()?;
    let sink: Box<dyn Sink> = match kind {
        SinkKind::Console => Console::from_config(config)?.into(),
        SinkKind::File => FileBuilder::from_config(config)?.build()?.into(),
        #[cfg(unix)]
        SinkKind::Syslog => Syslog::from_config(config)?.into(),
        #[cfg(not(unix))]
        SinkKind::Syslog => {
            return Err(Error::new(
                ErrorKind::Config,
                "syslog is not supported on this platform",
            )
            .with_context("kind", kind));
        }
        SinkKind::Debugger => Debugger::default().into(),
    };
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!("OutputFile".parse::<SinkKind>().unwrap(), SinkKind::File);
        assert_eq!("OutputDebug".parse::<SinkKind>().unwrap(), SinkKind::Debugger);

        let err = "OutputBogus".parse::<SinkKind>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.context("kind"), Some("OutputBogus"));
    }

    #[test]
    fn test_build_unknown_kind() {
        let err = build(&Config::new("outputconsole")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
