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

//! A lightweight logging facility built around named channels.
//!
//! # Overview
//!
//! Every [`Logger`] writes to a named [`Channel`] that carries its own severity threshold.
//! Records admitted by their channel are timestamped and handed to every configured [`Sink`]:
//! the console, a size-rotated file, the system log, or an attached debugger. Channels and sinks
//! live in a [`Manager`]; most programs use the process-wide [`Manager::global`].
//!
//! # Examples
//!
//! ```
//! use logchannel::ConfigList;
//! use logchannel::Logger;
//! use logchannel::Manager;
//! use logchannel::Severity;
//!
//! let mut configs = ConfigList::new();
//! configs
//!     .add_output("OutputConsole")
//!     .set_option("color", "false");
//! Manager::global().configure(&configs).unwrap();
//!
//! let logger = Logger::new("main.example");
//! logger.set_level(Severity::Info);
//! logger.debug().append("not admitted");
//! logger.notice().append("listening on port ").append(8080);
//! logger.info().append("mask ").hex(255u32).append(" ratio ").float(2.0 / 3.0, 3);
//!
//! Manager::global().terminate();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod layout;
pub mod sink;

mod channel;
mod config;
mod error;
mod logger;
mod manager;
mod record;
mod severity;
mod time;

pub use channel::Channel;
pub use config::Config;
pub use config::ConfigList;
pub use error::Error;
pub use error::ErrorKind;
pub use layout::Layout;
pub use logger::Logger;
pub use manager::CHANNEL_CONFIG_NAME;
pub use manager::Manager;
pub use record::Record;
pub use record::RecordBuilder;
pub use severity::Severity;
pub use sink::Sink;
pub use time::DateTime;
