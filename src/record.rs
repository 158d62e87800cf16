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

//! Log records and the builder that produces them.

use std::fmt;
use std::fmt::Write;
use std::sync::Arc;

use crate::Channel;
use crate::Manager;
use crate::Severity;
use crate::time::DateTime;

/// One completed log line, handed to every sink and dropped right after.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    channel: &'a str,
    severity: Severity,
    time: DateTime,
    message: &'a str,
}

impl<'a> Record<'a> {
    /// Create a record directly, bypassing any channel admission check.
    pub fn new(channel: &'a str, severity: Severity, time: DateTime, message: &'a str) -> Self {
        Self {
            channel,
            severity,
            time,
            message,
        }
    }

    /// The name of the channel the record was emitted on.
    pub fn channel(&self) -> &'a str {
        self.channel
    }

    /// The severity of the record.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The time the record was completed.
    pub fn time(&self) -> DateTime {
        self.time
    }

    /// The message body.
    pub fn message(&self) -> &'a str {
        self.message
    }
}

struct Pending {
    manager: Manager,
    channel: Arc<Channel>,
    severity: Severity,
    message: String,
}

/// A chainable builder for one log line.
///
/// Builders are returned by the per-severity methods of [`Logger`](crate::Logger). If the
/// severity was admitted by the channel, the accumulated text is dispatched exactly once: on
/// [`finish`](RecordBuilder::finish), or when the builder is dropped. The timestamp is taken at
/// that moment. A builder that was not admitted discards everything appended to it.
///
/// # Examples
///
/// ```
/// use logchannel::Manager;
///
/// let manager = Manager::new();
/// let logger = manager.logger("main.example");
///
/// logger.info().append("listening on port ").append(8080);
/// logger
///     .debug()
///     .append("flags = 0x")
///     .hex(0x75af0)
///     .append(", id = ")
///     .padded(76035, 8, '0')
///     .finish();
/// ```
pub struct RecordBuilder {
    pending: Option<Pending>,
}

impl RecordBuilder {
    pub(crate) fn admitted(manager: Manager, channel: Arc<Channel>, severity: Severity) -> Self {
        Self {
            pending: Some(Pending {
                manager,
                channel,
                severity,
                message: String::new(),
            }),
        }
    }

    pub(crate) fn discarded() -> Self {
        Self { pending: None }
    }

    /// Whether this builder will produce a record.
    ///
    /// Useful to skip computing expensive values for records that would be discarded anyway.
    pub fn is_admitted(&self) -> bool {
        self.pending.is_some()
    }

    /// Append a value in its `Display` form.
    pub fn append(mut self, value: impl fmt::Display) -> Self {
        if let Some(pending) = &mut self.pending {
            // writing into a String never fails
            let _ = write!(pending.message, "{value}");
        }
        self
    }

    /// Append an integer in lowercase hexadecimal, without any prefix.
    pub fn hex(mut self, value: impl fmt::LowerHex) -> Self {
        if let Some(pending) = &mut self.pending {
            let _ = write!(pending.message, "{value:x}");
        }
        self
    }

    /// Append a value right-aligned to `width` characters, padded on the left with `fill`.
    ///
    /// Values wider than `width` are appended untouched.
    pub fn padded(mut self, value: impl fmt::Display, width: usize, fill: char) -> Self {
        if let Some(pending) = &mut self.pending {
            let text = value.to_string();
            let len = text.chars().count();
            pending
                .message
                .extend(std::iter::repeat_n(fill, width.saturating_sub(len)));
            pending.message.push_str(&text);
        }
        self
    }

    /// Append a floating point value with a fixed number of decimals.
    pub fn float(mut self, value: f64, precision: usize) -> Self {
        if let Some(pending) = &mut self.pending {
            let _ = write!(pending.message, "{value:.precision$}");
        }
        self
    }

    /// Complete the line and dispatch it now.
    pub fn finish(mut self) {
        self.dispatch();
    }

    fn dispatch(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        let record = Record::new(
            pending.channel.name(),
            pending.severity,
            DateTime::now(),
            &pending.message,
        );
        pending.manager.dispatch(&pending.channel, &record);
    }
}

impl Write for RecordBuilder {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(pending) = &mut self.pending {
            pending.message.push_str(s);
        }
        Ok(())
    }
}

impl Drop for RecordBuilder {
    fn drop(&mut self) {
        self.dispatch();
    }
}

impl fmt::Debug for RecordBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pending {
            Some(pending) => f
                .debug_struct("RecordBuilder")
                .field("channel", &pending.channel.name())
                .field("severity", &pending.severity)
                .field("message", &pending.message)
                .finish(),
            None => write!(f, "RecordBuilder {{ discarded }}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::Error;
    use crate::sink::Sink;

    #[derive(Debug, Default)]
    struct Collect(Arc<Mutex<Vec<(String, Severity, String)>>>);

    impl Sink for Collect {
        fn emit(&self, channel: &Channel, record: &Record) -> Result<(), Error> {
            self.0.lock().unwrap().push((
                channel.name().to_string(),
                record.severity(),
                record.message().to_string(),
            ));
            Ok(())
        }
    }

    fn setup() -> (Manager, Arc<Mutex<Vec<(String, Severity, String)>>>) {
        let manager = Manager::new();
        let lines = Arc::new(Mutex::new(vec![]));
        manager.add_sink(Collect(lines.clone()));
        (manager, lines)
    }

    #[test]
    fn test_stream_formatting() {
        let (manager, lines) = setup();
        let logger = manager.logger("fmt");

        logger
            .debug()
            .append("Variable = ")
            .hex(0x75af0)
            .append(" test");
        logger
            .debug()
            .append("Variable = ")
            .padded(76035, 8, '0')
            .append(" test");
        logger.info().append("ratio ~ ").float(1.23456, 2);
        logger.info().padded("toolong", 3, '*');

        let lines = lines.lock().unwrap();
        let messages: Vec<&str> = lines.iter().map(|(_, _, m)| m.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Variable = 75af0 test",
                "Variable = 00076035 test",
                "ratio ~ 1.23",
                "toolong"
            ]
        );
    }

    #[test]
    fn test_dispatch_exactly_once() {
        let (manager, lines) = setup();
        let logger = manager.logger("once");

        let mut builder = logger.notice().append("first");
        write!(builder, " and {}", "second").unwrap();
        builder.finish();
        assert_eq!(lines.lock().unwrap().len(), 1);

        {
            let _scoped = logger.warning().append("scoped");
        }
        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].2, "first and second");
        assert_eq!(lines[1], ("once".to_string(), Severity::Warning, "scoped".to_string()));
    }

    #[test]
    fn test_discarded_builder() {
        let (manager, lines) = setup();
        let logger = manager.logger("quiet");
        logger.set_level(Severity::Error);

        let builder = logger.info().append("dropped");
        assert!(!builder.is_admitted());
        builder.finish();
        assert!(lines.lock().unwrap().is_empty());
    }
}
