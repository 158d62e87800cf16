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

//! Sink for writing log records to the system log via the POSIX syslog API.
//!
//! POSIX allows one syslog connection per process. All [`Syslog`] sinks share it: they must
//! agree on identity and facility, and `closelog` runs when the last of them is dropped.

use std::ffi::CString;
use std::ffi::c_int;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Channel;
use crate::Config;
use crate::Error;
use crate::ErrorKind;
use crate::Layout;
use crate::Severity;
use crate::layout::TextLayout;
use crate::record::Record;
use crate::sink::Sink;

/// The identity used when the config does not name one.
pub const DEFAULT_SYSLOG_NAME: &str = "logchannel";

fn severity_to_priority(severity: Severity) -> c_int {
    match severity {
        Severity::Debug => libc::LOG_DEBUG,
        Severity::Info => libc::LOG_INFO,
        Severity::Notice => libc::LOG_NOTICE,
        Severity::Warning => libc::LOG_WARNING,
        Severity::Error => libc::LOG_ERR,
        Severity::Critical => libc::LOG_CRIT,
    }
}

fn parse_facility(name: &str) -> Option<c_int> {
    let facility = match name {
        "user" => libc::LOG_USER,
        "daemon" => libc::LOG_DAEMON,
        "local0" => libc::LOG_LOCAL0,
        "local1" => libc::LOG_LOCAL1,
        "local2" => libc::LOG_LOCAL2,
        "local3" => libc::LOG_LOCAL3,
        "local4" => libc::LOG_LOCAL4,
        "local5" => libc::LOG_LOCAL5,
        "local6" => libc::LOG_LOCAL6,
        "local7" => libc::LOG_LOCAL7,
        _ => return None,
    };
    Some(facility)
}

fn to_c_string(bytes: Vec<u8>) -> CString {
    CString::new(bytes).unwrap_or_else(|err| {
        let mut bytes = err.into_vec();
        bytes.retain(|&b| b != 0);
        // interior NULs were just removed
        CString::new(bytes).unwrap_or_default()
    })
}

struct Connection {
    // openlog keeps a pointer to the identity until closelog
    ident: CString,
    facility: c_int,
    sinks: usize,
}

static CONNECTION: Mutex<Option<Connection>> = Mutex::new(None);

fn connection() -> MutexGuard<'static, Option<Connection>> {
    CONNECTION.lock().unwrap_or_else(|e| e.into_inner())
}

fn acquire(ident: CString, facility: c_int) -> Result<(), Error> {
    let mut connection = connection();
    match connection.as_mut() {
        Some(open) if open.ident == ident && open.facility == facility => {
            open.sinks += 1;
            Ok(())
        }
        Some(open) => Err(
            Error::new(ErrorKind::Config, "syslog is already open with other settings")
                .with_context("open", open.ident.to_string_lossy())
                .with_context("requested", ident.to_string_lossy()),
        ),
        None => {
            // SAFETY: `ident` is NUL-terminated and kept alive in CONNECTION until `closelog`.
            unsafe { libc::openlog(ident.as_ptr(), libc::LOG_CONS, facility) };
            *connection = Some(Connection {
                ident,
                facility,
                sinks: 1,
            });
            Ok(())
        }
    }
}

fn release() {
    let mut connection = connection();
    if let Some(open) = connection.as_mut() {
        open.sinks -= 1;
        if open.sinks == 0 {
            // SAFETY: closelog has no preconditions.
            unsafe { libc::closelog() };
            *connection = None;
        }
    }
}

/// A sink that writes log records to the system log.
///
/// Lines omit the timestamp since syslog stamps records itself.
#[derive(Debug)]
pub struct Syslog {
    ident: String,
    layout: Box<dyn Layout>,
}

impl Syslog {
    /// Open the system log with the given identity and the `user` facility.
    ///
    /// # Errors
    ///
    /// Return a resource error if the identity contains a NUL byte, or a config error if the
    /// system log is already open with another identity or facility.
    pub fn new(ident: &str) -> Result<Self, Error> {
        Self::with_facility(ident, libc::LOG_USER)
    }

    /// Create a syslog sink from a config entry.
    ///
    /// Reads `syslogname` (default [`DEFAULT_SYSLOG_NAME`]) and `facility` (`user`, `daemon` or
    /// `local0` to `local7`; default `user`).
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let ident = config.get_or("syslogname", DEFAULT_SYSLOG_NAME);
        let facility = config.get_or("facility", "user");
        let facility = parse_facility(facility).ok_or_else(|| {
            Error::new(ErrorKind::Lookup, "malformed value")
                .with_context("config", config.name())
                .with_context("key", "facility")
                .with_context("value", facility)
        })?;
        Self::with_facility(ident, facility)
    }

    fn with_facility(ident: &str, facility: c_int) -> Result<Self, Error> {
        let c_ident = CString::new(ident).map_err(|err| {
            Error::new(ErrorKind::Resource, "failed to open syslog")
                .with_context("syslogname", ident.escape_default())
                .with_source(err)
        })?;
        acquire(c_ident, facility)?;
        Ok(Self {
            ident: ident.to_string(),
            layout: Box::new(TextLayout::default().no_timestamp()),
        })
    }

    /// Set the layout for the [`Syslog`] sink.
    ///
    /// Default to [`TextLayout`] without timestamp.
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// The identity passed to `openlog`.
    pub fn ident(&self) -> &str {
        &self.ident
    }
}

impl Sink for Syslog {
    fn emit(&self, _: &Channel, record: &Record) -> Result<(), Error> {
        let message = to_c_string(self.layout.format(record)?);
        let priority = severity_to_priority(record.severity());
        // SAFETY: the format string takes exactly one NUL-terminated string argument.
        unsafe { libc::syslog(priority, c"%s".as_ptr(), message.as_ptr()) };
        Ok(())
    }
}

impl Drop for Syslog {
    fn drop(&mut self) {
        release();
    }
}
