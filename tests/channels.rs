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
use std::sync::Mutex;
use std::thread;

use logchannel::CHANNEL_CONFIG_NAME;
use logchannel::Channel;
use logchannel::Config;
use logchannel::ConfigList;
use logchannel::Error;
use logchannel::ErrorKind;
use logchannel::Manager;
use logchannel::Record;
use logchannel::Severity;
use logchannel::Sink;

#[derive(Debug, Clone, Default)]
struct Collect(Arc<Mutex<Vec<String>>>);

impl Collect {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Sink for Collect {
    fn emit(&self, channel: &Channel, record: &Record) -> Result<(), Error> {
        assert_eq!(channel.name(), record.channel());
        self.0.lock().unwrap().push(format!(
            "{} {} {}",
            record.channel(),
            record.severity(),
            record.message()
        ));
        Ok(())
    }
}

#[test]
fn test_threshold_is_read_at_record_time() {
    let manager = Manager::new();
    let sink = Collect::default();
    manager.add_sink(sink.clone());

    let logger = manager.logger("svc.a");
    let copy = logger.clone();
    logger.set_level(Severity::Warning);

    logger.info().append("dropped");
    copy.error().append("kept ").append(1);

    manager.get("svc.a").set_level(Severity::Debug);
    copy.debug().append("kept ").append(2);

    assert_eq!(sink.lines(), ["svc.a EROR kept 1", "svc.a DBUG kept 2"]);
}

#[test]
fn test_loggers_share_channel_by_name() {
    let manager = Manager::new();
    let a = manager.logger("shared");
    let b = manager.logger("shared");
    assert!(Arc::ptr_eq(a.channel(), b.channel()));

    a.set_level(Severity::Critical);
    assert_eq!(b.level(), Severity::Critical);
}

#[test]
fn test_logging_without_sinks_is_silent() {
    let manager = Manager::new();
    let logger = manager.logger("early");
    logger.critical().append("nobody listens");

    let sink = Collect::default();
    manager.add_sink(sink.clone());
    manager.terminate();
    manager.terminate();
    logger.critical().append("nobody listens either");

    assert!(sink.lines().is_empty());
    assert_eq!(manager.failed_writes(), 0);
}

#[test]
fn test_configure_keeps_valid_entries() {
    let manager = Manager::new();

    let mut configs = ConfigList::new();
    configs
        .add_output("OutputConsole")
        .set_option("color", "false")
        .add_output("OutputBogus")
        .add_output("OutputDebug");

    let err = manager.configure(&configs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.context("entry"), Some("1"));
    assert_eq!(manager.sink_count(), 2);

    configs.add_output("OutputUnknown");
    configs.add_output("OutputFile").set_option("max_size", "huge");
    let err = manager.configure(&configs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.context("failed"), Some("3"));
    assert_eq!(err.sources().len(), 3);
    assert_eq!(manager.sink_count(), 4);

    manager.terminate();
}

#[test]
fn test_channel_config_round_trip() {
    let source = Manager::new();
    source.set_default_level(Severity::Notice);
    source.get("db");
    source.get("net").set_level(Severity::Error);

    let config = source.channel_config();
    assert_eq!(config.name(), CHANNEL_CONFIG_NAME);
    assert_eq!(config.get("db"), Some("NOTE"));
    assert_eq!(config.get("net"), Some("EROR"));

    let target = Manager::new();
    target.set_channel_config(&config).unwrap();
    assert_eq!(target.channel_names(), ["db", "net"]);
    assert_eq!(target.get("db").level(), Severity::Notice);
    assert_eq!(target.get("net").level(), Severity::Error);
    assert_eq!(target.channel_config(), config);

    let update = Config::new(CHANNEL_CONFIG_NAME).with_value("db", "DBUG");
    target.set_channel_config(&update).unwrap();
    assert_eq!(target.get("db").level(), Severity::Debug);
    assert_eq!(target.get("net").level(), Severity::Error);
}

#[test]
fn test_concurrent_logging() {
    let manager = Manager::new();
    let sink = Collect::default();
    manager.add_sink(sink.clone());

    let handles = (0..8)
        .map(|i| {
            let logger = manager.logger(&format!("worker.{i}"));
            thread::spawn(move || {
                for n in 0..100 {
                    logger.info().append("line ").append(n);
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = sink.lines();
    assert_eq!(lines.len(), 800);
    for i in 0..8 {
        let prefix = format!("worker.{i} INFO line ");
        let mine = lines
            .iter()
            .filter_map(|line| line.strip_prefix(&prefix))
            .map(|n| n.parse::<u32>().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(mine, (0..100).collect::<Vec<_>>());
    }
    assert_eq!(manager.channel_names().len(), 8);
}

#[test]
fn test_concurrent_channel_creation() {
    let manager = Manager::new();

    let handles = (0..16)
        .map(|_| {
            let manager = manager.clone();
            thread::spawn(move || manager.logger("svc"))
        })
        .collect::<Vec<_>>();
    let loggers = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect::<Vec<_>>();

    let first = loggers[0].channel();
    assert!(loggers.iter().all(|l| Arc::ptr_eq(first, l.channel())));
    assert_eq!(manager.channel_names(), ["svc"]);
}
