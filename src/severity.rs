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

//! Severity levels of log records.

use std::fmt;
use std::str::FromStr;

use crate::Error;
use crate::ErrorKind;

/// The code rendered for a raw level outside the enumeration.
pub const UNKNOWN_CODE: &str = "????";

/// An enum representing the available severity levels, from least to most severe.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Severity {
    /// Designates diagnostic information for developers.
    Debug = 0,
    /// Designates useful information.
    Info = 1,
    /// Designates normal but significant conditions.
    Notice = 2,
    /// Designates hazardous situations.
    Warning = 3,
    /// Designates errors.
    Error = 4,
    /// Designates critical conditions.
    Critical = 5,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Info,
        Severity::Notice,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Return the four-letter code of the `Severity`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_code(&self) -> &'static str {
        match self {
            Severity::Debug => "DBUG",
            Severity::Info => "INFO",
            Severity::Notice => "NOTE",
            Severity::Warning => "WARN",
            Severity::Error => "EROR",
            Severity::Critical => "CRIT",
        }
    }

    /// Parse a four-letter code, as produced by [`Severity::as_code`].
    ///
    /// Return `None` for anything else; codes are case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use logchannel::Severity;
    ///
    /// assert_eq!(Severity::from_code("WARN"), Some(Severity::Warning));
    /// assert_eq!(Severity::from_code("warn"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Severity> {
        Severity::ALL.into_iter().find(|s| s.as_code() == code)
    }

    /// Convert a raw level back to a `Severity`.
    pub fn from_u8(raw: u8) -> Option<Severity> {
        Severity::ALL.get(raw as usize).copied()
    }

    /// Return the four-letter code of a raw level, or [`UNKNOWN_CODE`] when it is out of range.
    pub fn code_of(raw: u8) -> &'static str {
        Severity::from_u8(raw).map_or(UNKNOWN_CODE, |s| s.as_code())
    }

    /// Check whether a record of this severity passes the given threshold.
    ///
    /// Admission is inclusive: a threshold of `Warning` admits `Warning` itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use logchannel::Severity;
    ///
    /// assert!(Severity::Warning.admitted(Severity::Warning));
    /// assert!(Severity::Error.admitted(Severity::Warning));
    /// assert!(!Severity::Info.admitted(Severity::Warning));
    /// ```
    pub fn admitted(self, threshold: Severity) -> bool {
        self >= threshold
    }
}

impl fmt::Debug for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_code())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_code())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Severity, Self::Err> {
        Severity::from_code(s).ok_or_else(|| {
            Error::new(ErrorKind::Lookup, "malformed severity code").with_context("code", s)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for severity in Severity::ALL {
            let code = severity.as_code();
            assert_eq!(code.len(), 4);
            assert_eq!(Severity::from_code(code), Some(severity));
            assert_eq!(code.parse::<Severity>().unwrap(), severity);
        }
    }

    #[test]
    fn test_malformed_codes() {
        for code in ["", "????", "info", "INFOS", " INFO", "CRSH"] {
            assert_eq!(Severity::from_code(code), None, "{code:?}");
        }
        let err = "nope".parse::<Severity>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_raw_levels() {
        assert_eq!(Severity::from_u8(2), Some(Severity::Notice));
        assert_eq!(Severity::from_u8(6), None);
        assert_eq!(Severity::code_of(5), "CRIT");
        assert_eq!(Severity::code_of(42), UNKNOWN_CODE);
    }

    #[test]
    fn test_admission_is_inclusive() {
        for threshold in Severity::ALL {
            for severity in Severity::ALL {
                assert_eq!(severity.admitted(threshold), severity >= threshold);
            }
        }
        assert!(Severity::Debug < Severity::Critical);
    }
}
