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

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::Channel;
use crate::Config;
use crate::Error;
use crate::ErrorKind;
use crate::Logger;
use crate::Severity;
use crate::record::Record;
use crate::sink;
use crate::sink::Sink;

/// The name of the config produced by [`Manager::channel_config`].
pub const CHANNEL_CONFIG_NAME: &str = "ChannelConfig";

static GLOBAL: LazyLock<Manager> = LazyLock::new(Manager::new);

type Sinks = Arc<Vec<Arc<dyn Sink>>>;

/// The registry of channels and active sinks.
///
/// A `Manager` is a cheap handle: clones share the same channels and sinks. Most applications
/// use the process-wide [`Manager::global`] through [`Logger::new`]; independent registries can
/// be created with [`Manager::new`].
///
/// Records dispatched while no sink is configured, before [`configure`](Manager::configure) or
/// after [`terminate`](Manager::terminate), are silently dropped.
///
/// # Examples
///
/// ```
/// use logchannel::ConfigList;
/// use logchannel::Manager;
/// use logchannel::Severity;
///
/// let manager = Manager::new();
/// manager.set_default_level(Severity::Notice);
///
/// let mut configs = ConfigList::new();
/// configs.add_output("OutputConsole");
/// manager.configure(&configs).unwrap();
///
/// let logger = manager.logger("main.example");
/// logger.info().append("filtered out");
/// logger.warning().append("printed");
///
/// manager.get("main.example").set_level(Severity::Debug);
/// logger.info().append("printed too");
///
/// manager.terminate();
/// logger.warning().append("dropped silently");
/// ```
#[derive(Clone)]
pub struct Manager {
    inner: Arc<Inner>,
}

struct Inner {
    channels: RwLock<BTreeMap<String, Arc<Channel>>>,
    sinks: RwLock<Sinks>,
    default_level: AtomicU8,
    failed_writes: AtomicU64,
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("channels", &self.channel_names())
            .field("sinks", &self.sink_count())
            .field("default_level", &self.default_level())
            .finish()
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    /// Create an independent registry with no channels and no sinks.
    ///
    /// New channels start at [`Severity::Debug`] until [`set_default_level`] is called.
    ///
    /// [`set_default_level`]: Manager::set_default_level
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                channels: RwLock::new(BTreeMap::new()),
                sinks: RwLock::new(Arc::new(vec![])),
                default_level: AtomicU8::new(Severity::Debug as u8),
                failed_writes: AtomicU64::new(0),
            }),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Manager {
        &GLOBAL
    }

    /// Set the threshold given to channels created from now on.
    ///
    /// Existing channels keep their threshold.
    pub fn set_default_level(&self, level: Severity) {
        self.inner
            .default_level
            .store(level as u8, Ordering::Relaxed);
    }

    /// The threshold given to newly created channels.
    pub fn default_level(&self) -> Severity {
        Severity::from_u8(self.inner.default_level.load(Ordering::Relaxed))
            .unwrap_or(Severity::Debug)
    }

    /// Return the channel with the given name, creating it at the default level if needed.
    ///
    /// Every call with the same name returns the same channel.
    pub fn get(&self, name: &str) -> Arc<Channel> {
        if let Some(channel) = self.channels().get(name) {
            return channel.clone();
        }

        self.channels_mut()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Channel::new(name, self.default_level())))
            .clone()
    }

    /// Create a logger on the channel with the given name.
    pub fn logger(&self, name: &str) -> Logger {
        Logger::with_manager(self.clone(), self.get(name))
    }

    /// The names of all channels, sorted.
    pub fn channel_names(&self) -> Vec<String> {
        self.channels().keys().cloned().collect()
    }

    /// Construct one sink per config entry and append them to the active sinks.
    ///
    /// Entries are processed in order, and a failing entry does not prevent the following ones
    /// from being constructed. Calling `configure` again adds more sinks.
    ///
    /// # Errors
    ///
    /// If a single entry fails, return its error. If several fail, return a
    /// [`ErrorKind::Config`] error with one source per failed entry.
    pub fn configure(&self, configs: &[Config]) -> Result<(), Error> {
        let mut failures = vec![];
        for (index, config) in configs.iter().enumerate() {
            match sink::build(config) {
                Ok(sink) => self.add_sink(sink),
                Err(err) => failures.push(err.with_context("entry", index)),
            }
        }

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            n => Err(failures.into_iter().fold(
                Error::new(ErrorKind::Config, "failed to configure sinks")
                    .with_context("failed", n)
                    .with_context("total", configs.len()),
                Error::with_source,
            )),
        }
    }

    /// Append a sink to the active sinks.
    pub fn add_sink(&self, sink: impl Into<Box<dyn Sink>>) {
        let sink: Arc<dyn Sink> = Arc::from(sink.into());
        let mut sinks = self.sinks_mut();
        Arc::make_mut(&mut sinks).push(sink);
    }

    /// The number of active sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks().len()
    }

    /// Flush and release every active sink.
    ///
    /// Channels are kept, so loggers remain usable; their records are dropped until sinks are
    /// configured again. Calling `terminate` more than once is harmless.
    pub fn terminate(&self) {
        let sinks = std::mem::take(&mut *self.sinks_mut());
        for sink in sinks.iter() {
            if let Err(err) = sink.flush() {
                self.report(err);
            }
        }
    }

    /// Emit a record to every active sink, in registration order.
    ///
    /// Failures of one sink are counted and reported on stderr; they never reach the caller and
    /// never prevent the following sinks from running.
    pub fn dispatch(&self, channel: &Channel, record: &Record) {
        let sinks = self.sinks().clone();
        for sink in sinks.iter() {
            match std::panic::catch_unwind(AssertUnwindSafe(|| sink.emit(channel, record))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => self.report(err),
                Err(_) => self.report(Error::new(ErrorKind::Io, "sink panicked")),
            }
        }
    }

    /// Flush every active sink.
    pub fn flush(&self) {
        let sinks = self.sinks().clone();
        for sink in sinks.iter() {
            if let Err(err) = sink.flush() {
                self.report(err);
            }
        }
    }

    /// The number of sink failures since the manager was created.
    pub fn failed_writes(&self) -> u64 {
        self.inner.failed_writes.load(Ordering::Relaxed)
    }

    /// Export the threshold of every channel.
    ///
    /// The config is named [`CHANNEL_CONFIG_NAME`] and maps channel names to severity codes.
    pub fn channel_config(&self) -> Config {
        self.channels()
            .iter()
            .fold(Config::new(CHANNEL_CONFIG_NAME), |config, (name, channel)| {
                config.with_value(name, channel.level().as_code())
            })
    }

    /// Import channel thresholds, creating channels as needed.
    ///
    /// # Errors
    ///
    /// Entries with unknown severity codes are skipped and reported as one
    /// [`ErrorKind::Lookup`] error, after all valid entries are applied.
    pub fn set_channel_config(&self, config: &Config) -> Result<(), Error> {
        let mut malformed = vec![];
        for (name, code) in config.values() {
            match Severity::from_code(code) {
                Some(level) => self.get(name).set_level(level),
                None => malformed.push(format!("{name}={code}")),
            }
        }

        if malformed.is_empty() {
            Ok(())
        } else {
            Err(
                Error::new(ErrorKind::Lookup, "malformed channel severity")
                    .with_context("config", config.name())
                    .with_context("entries", malformed.join(", ")),
            )
        }
    }

    fn report(&self, err: Error) {
        self.inner.failed_writes.fetch_add(1, Ordering::Relaxed);
        let _ = writeln!(std::io::stderr(), "failed to emit log record: {err}");
    }

    fn channels(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<Channel>>> {
        self.inner.channels.read().unwrap_or_else(|e| e.into_inner())
    }

    fn channels_mut(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<Channel>>> {
        self.inner.channels.write().unwrap_or_else(|e| e.into_inner())
    }

    fn sinks(&self) -> RwLockReadGuard<'_, Sinks> {
        self.inner.sinks.read().unwrap_or_else(|e| e.into_inner())
    }

    fn sinks_mut(&self) -> RwLockWriteGuard<'_, Sinks> {
        self.inner.sinks.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[derive(Debug, Default)]
    struct Count(Arc<AtomicUsize>);

    impl Sink for Count {
        fn emit(&self, _: &Channel, _: &Record) -> Result<(), Error> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl Sink for Failing {
        fn emit(&self, _: &Channel, _: &Record) -> Result<(), Error> {
            Err(Error::new(ErrorKind::Io, "disk full"))
        }
    }

    #[derive(Debug)]
    struct Panicking;

    impl Sink for Panicking {
        fn emit(&self, _: &Channel, _: &Record) -> Result<(), Error> {
            panic!("broken sink")
        }
    }

    #[test]
    fn test_default_level_is_not_retroactive() {
        let manager = Manager::new();
        let early = manager.get("early");
        manager.set_default_level(Severity::Error);
        let late = manager.get("late");

        assert_eq!(early.level(), Severity::Debug);
        assert_eq!(late.level(), Severity::Error);
        assert_eq!(manager.default_level(), Severity::Error);
    }

    #[test]
    fn test_get_returns_same_channel() {
        let manager = Manager::new();
        let a = manager.get("x");
        let b = manager.get("x");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(manager.channel_names(), ["x"]);
    }

    #[test]
    fn test_failing_sinks_are_isolated() {
        let manager = Manager::new();
        let count = Arc::new(AtomicUsize::new(0));
        manager.add_sink(Failing);
        manager.add_sink(Panicking);
        manager.add_sink(Count(count.clone()));

        let logger = manager.logger("svc");
        logger.error().append("one");
        logger.error().append("two");

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(manager.failed_writes(), 4);
    }

    #[test]
    fn test_terminate_twice() {
        let manager = Manager::new();
        let count = Arc::new(AtomicUsize::new(0));
        manager.add_sink(Count(count.clone()));
        let logger = manager.logger("svc");
        logger.info().append("before");

        manager.terminate();
        assert_eq!(manager.sink_count(), 0);
        manager.terminate();
        assert_eq!(manager.sink_count(), 0);

        logger.info().append("after");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(manager.channel_names(), ["svc"]);
    }

    #[test]
    fn test_channel_config_skips_malformed() {
        let manager = Manager::new();
        let config = Config::new(CHANNEL_CONFIG_NAME)
            .with_value("a", "WARN")
            .with_value("b", "loud");

        let err = manager.set_channel_config(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(err.context("entries"), Some("b=loud"));
        assert_eq!(manager.get("a").level(), Severity::Warning);
        assert_eq!(manager.channel_names(), ["a"]);
    }
}
