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

use std::fmt;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;

use crate::Severity;

/// A named severity threshold shared by every logger of the same name.
///
/// Channels are owned by a [`Manager`](crate::Manager) and handed out as `Arc<Channel>`, so a
/// threshold change through any handle is observed by all of them.
pub struct Channel {
    name: String,
    level: AtomicU8,
}

impl Channel {
    pub(crate) fn new(name: impl Into<String>, level: Severity) -> Self {
        Self {
            name: name.into(),
            level: AtomicU8::new(level as u8),
        }
    }

    /// The name of the channel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current minimum severity admitted by the channel.
    pub fn level(&self) -> Severity {
        // only ever stored from a Severity
        Severity::from_u8(self.level.load(Ordering::Relaxed)).unwrap_or(Severity::Debug)
    }

    /// Set the minimum severity admitted by the channel.
    pub fn set_level(&self, level: Severity) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Check whether a record of the given severity passes the live threshold.
    pub fn admits(&self, severity: Severity) -> bool {
        severity.admitted(self.level())
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("level", &self.level())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_is_mutable() {
        let channel = Channel::new("svc.a", Severity::Debug);
        assert_eq!(channel.name(), "svc.a");
        assert!(channel.admits(Severity::Debug));

        channel.set_level(Severity::Warning);
        assert_eq!(channel.level(), Severity::Warning);
        assert!(!channel.admits(Severity::Notice));
        assert!(channel.admits(Severity::Warning));
        assert!(channel.admits(Severity::Critical));
    }
}
