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

//! Broken-down local timestamps for log lines.

use std::fmt;

use jiff::Zoned;

/// A calendar timestamp in the local time zone, as stamped on every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    /// Year, e.g. `2024`.
    pub year: i16,
    /// Month, `[1, 12]`.
    pub month: i8,
    /// Day of month, `[1, 31]`.
    pub day: i8,
    /// Hour, `[0, 23]`.
    pub hour: i8,
    /// Minute, `[0, 59]`.
    pub minute: i8,
    /// Second, `[0, 59]`.
    pub second: i8,
    /// Millisecond, `[0, 999]`.
    pub millisecond: i16,
    /// Microsecond within the millisecond, `[0, 999]`.
    pub microsecond: i16,
}

impl DateTime {
    /// Capture the current time in the system time zone.
    pub fn now() -> Self {
        Self::from(&Zoned::now())
    }
}

impl From<&Zoned> for DateTime {
    fn from(zoned: &Zoned) -> Self {
        Self {
            year: zoned.year(),
            month: zoned.month(),
            day: zoned.day(),
            hour: zoned.hour(),
            minute: zoned.minute(),
            second: zoned.second(),
            millisecond: zoned.millisecond(),
            microsecond: zoned.microsecond(),
        }
    }
}

/// Renders `YYYY-MM-DD HH:MM:SS.mmm`.
impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond
        )
    }
}
