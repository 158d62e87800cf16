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

use crate::Channel;
use crate::Error;
use crate::Layout;
use crate::layout::TextLayout;
use crate::record::Record;
use crate::sink::Sink;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn OutputDebugStringA(output: *const std::ffi::c_char);
}

/// A sink that writes log records to the platform debug output.
///
/// On Windows the lines go to the attached debugger via `OutputDebugStringA`; elsewhere they go
/// to stderr, where test harnesses capture them.
///
/// # Examples
///
/// ```
/// use logchannel::sink::Debugger;
///
/// let debugger = Debugger::default();
/// ```
#[derive(Debug)]
pub struct Debugger {
    layout: Box<dyn Layout>,
}

impl Default for Debugger {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
        }
    }
}

impl Debugger {
    /// Set the layout for the [`Debugger`] sink.
    ///
    /// Default to [`TextLayout`].
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Sink for Debugger {
    #[cfg(windows)]
    fn emit(&self, _: &Channel, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.retain(|&b| b != 0);
        bytes.push(b'\n');
        let text = std::ffi::CString::new(bytes)
            .map_err(|err| Error::new(crate::ErrorKind::Io, "invalid debug output").with_source(err))?;
        // SAFETY: `text` is a valid NUL-terminated string that outlives the call.
        unsafe { OutputDebugStringA(text.as_ptr()) };
        Ok(())
    }

    #[cfg(not(windows))]
    fn emit(&self, _: &Channel, record: &Record) -> Result<(), Error> {
        use std::io::Write;

        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');
        std::io::stderr()
            .lock()
            .write_all(&bytes)
            .map_err(Error::from_io_error)
    }
}
