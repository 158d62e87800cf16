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

use std::sync::Arc;

use crate::Channel;
use crate::Manager;
use crate::Severity;
use crate::record::RecordBuilder;

/// A lightweight handle to a named [`Channel`], producing log records.
///
/// Cloning a logger clones the handle, not the channel: every logger of the same name on the
/// same [`Manager`] shares one threshold, and admission is checked against that threshold each
/// time a record is started.
///
/// # Examples
///
/// ```
/// use logchannel::Logger;
/// use logchannel::Severity;
///
/// let logger = Logger::new("main.example");
/// logger.info().append("started");
///
/// let other = Logger::new("main.example");
/// other.set_level(Severity::Warning);
/// assert_eq!(logger.level(), Severity::Warning);
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    manager: Manager,
    channel: Arc<Channel>,
}

impl Logger {
    /// Create a logger on the process-wide [`Manager::global`] registry.
    pub fn new(name: &str) -> Self {
        Manager::global().logger(name)
    }

    pub(crate) fn with_manager(manager: Manager, channel: Arc<Channel>) -> Self {
        Self { manager, channel }
    }

    /// Start a record of the given severity.
    pub fn log(&self, severity: Severity) -> RecordBuilder {
        if self.channel.admits(severity) {
            RecordBuilder::admitted(self.manager.clone(), self.channel.clone(), severity)
        } else {
            RecordBuilder::discarded()
        }
    }

    /// Start a [`Severity::Debug`] record.
    pub fn debug(&self) -> RecordBuilder {
        self.log(Severity::Debug)
    }

    /// Start a [`Severity::Info`] record.
    pub fn info(&self) -> RecordBuilder {
        self.log(Severity::Info)
    }

    /// Start a [`Severity::Notice`] record.
    pub fn notice(&self) -> RecordBuilder {
        self.log(Severity::Notice)
    }

    /// Start a [`Severity::Warning`] record.
    pub fn warning(&self) -> RecordBuilder {
        self.log(Severity::Warning)
    }

    /// Start a [`Severity::Error`] record.
    pub fn error(&self) -> RecordBuilder {
        self.log(Severity::Error)
    }

    /// Start a [`Severity::Critical`] record.
    pub fn critical(&self) -> RecordBuilder {
        self.log(Severity::Critical)
    }

    /// The name of the underlying channel.
    pub fn name(&self) -> &str {
        self.channel.name()
    }

    /// The current threshold of the underlying channel.
    pub fn level(&self) -> Severity {
        self.channel.level()
    }

    /// Set the threshold of the underlying channel, affecting every logger sharing it.
    pub fn set_level(&self, level: Severity) {
        self.channel.set_level(level);
    }

    /// The underlying channel.
    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }
}
