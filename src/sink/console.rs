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

use std::io::Write;

#[cfg(feature = "colored")]
use colored::Color;
#[cfg(feature = "colored")]
use colored::ColoredString;
#[cfg(feature = "colored")]
use colored::Colorize;

use crate::Channel;
use crate::Config;
use crate::Error;
use crate::Layout;
#[cfg(feature = "colored")]
use crate::Severity;
use crate::layout::TextLayout;
use crate::record::Record;
use crate::sink::Sink;

/// Colors for different severities.
#[cfg(feature = "colored")]
#[derive(Debug, Clone)]
pub struct LevelColor {
    /// Color for debug records.
    pub debug: Color,
    /// Color for info records.
    pub info: Color,
    /// Color for notice records.
    pub notice: Color,
    /// Color for warning records.
    pub warning: Color,
    /// Color for error records.
    pub error: Color,
    /// Color for critical records.
    pub critical: Color,
}

#[cfg(feature = "colored")]
impl Default for LevelColor {
    fn default() -> Self {
        Self {
            debug: Color::Blue,
            info: Color::White,
            notice: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            critical: Color::BrightMagenta,
        }
    }
}

#[cfg(feature = "colored")]
impl LevelColor {
    /// The color of the given severity.
    pub fn color_of(&self, severity: Severity) -> Color {
        match severity {
            Severity::Debug => self.debug,
            Severity::Info => self.info,
            Severity::Notice => self.notice,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
            Severity::Critical => self.critical,
        }
    }

    /// Colorize a whole line by severity.
    pub fn colorize(&self, no_color: bool, severity: Severity, line: String) -> ColoredString {
        if no_color {
            ColoredString::from(line)
        } else {
            ColoredString::from(line).color(self.color_of(severity))
        }
    }
}

/// Colors for different severities; inert without the `colored` feature.
#[cfg(not(feature = "colored"))]
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct LevelColor {}

/// A sink that prints log records to stdout, colored by severity.
///
/// # Examples
///
/// ```
/// use logchannel::sink::Console;
///
/// let console = Console::default();
/// let plain = Console::default().no_color();
/// ```
#[derive(Debug)]
pub struct Console {
    layout: Box<dyn Layout>,
    #[cfg_attr(not(feature = "colored"), allow(dead_code))]
    colors: LevelColor,
    #[cfg_attr(not(feature = "colored"), allow(dead_code))]
    no_color: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
            colors: LevelColor::default(),
            no_color: false,
        }
    }
}

impl Console {
    /// Create a console sink from a config entry.
    ///
    /// Reads the optional boolean key `color` (default `true`).
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let color = config.get_parsed_or("color", true)?;
        let console = Console::default();
        Ok(if color { console } else { console.no_color() })
    }

    /// Set the layout for the [`Console`] sink.
    ///
    /// Default to [`TextLayout`].
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set the colors used for each severity.
    pub fn with_colors(mut self, colors: LevelColor) -> Self {
        self.colors = colors;
        self
    }

    /// Print lines without color codes.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    fn render(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let bytes = self.layout.format(record)?;

        #[cfg(feature = "colored")]
        let mut bytes = {
            let line = String::from_utf8_lossy(&bytes).into_owned();
            let line = self.colors.colorize(self.no_color, record.severity(), line);
            line.to_string().into_bytes()
        };
        #[cfg(not(feature = "colored"))]
        let mut bytes = bytes;

        bytes.push(b'\n');
        Ok(bytes)
    }
}

impl Sink for Console {
    fn emit(&self, _: &Channel, record: &Record) -> Result<(), Error> {
        let bytes = self.render(record)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes).map_err(Error::from_io_error)?;
        stdout.flush().map_err(Error::from_io_error)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        std::io::stdout().flush().map_err(Error::from_io_error)
    }
}
