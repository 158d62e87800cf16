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

use std::fmt::Write;

use crate::Error;
use crate::Layout;
use crate::record::Record;

/// The width the channel name is padded to.
pub const CHANNEL_WIDTH: usize = 12;

/// A layout that formats log records as a fixed-shape text line.
///
/// Output format:
///
/// ```text
/// 2024-08-11 22:44:57.172  main.example DBUG Debug.
/// 2024-08-11 22:44:57.172  main.example INFO Info.
/// 2024-08-11 22:44:57.173  net          WARN connection reset
/// 2024-08-11 22:44:57.173  net          EROR retry budget exhausted
/// ```
///
/// The channel name is left-aligned and padded with spaces to [`CHANNEL_WIDTH`]; longer names
/// are kept whole.
///
/// # Examples
///
/// ```
/// use logchannel::layout::TextLayout;
///
/// let text_layout = TextLayout::default();
/// let syslog_layout = TextLayout::default().no_timestamp();
/// ```
#[derive(Debug, Clone)]
pub struct TextLayout {
    timestamp: bool,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self { timestamp: true }
    }
}

impl TextLayout {
    /// Omit the leading timestamp, for targets that stamp records themselves.
    pub fn no_timestamp(mut self) -> Self {
        self.timestamp = false;
        self
    }

    pub(crate) fn format_line(&self, record: &Record) -> String {
        let mut text = String::with_capacity(40 + record.message().len());

        // SAFETY: write to a string always succeeds
        if self.timestamp {
            write!(&mut text, "{}  ", record.time()).unwrap();
        }

        let channel = record.channel();
        let code = record.severity().as_code();
        let message = record.message();
        write!(
            &mut text,
            "{channel:<width$} {code} {message}",
            width = CHANNEL_WIDTH
        )
        .unwrap();
        text
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        Ok(self.format_line(record).into_bytes())
    }
}
