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

//! Sink for writing log records to a size-rotated file.
//!
//! # Example
//!
//!```
//! use logchannel::Manager;
//! use logchannel::sink::FileBuilder;
//!
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("app.log");
//! # let old_path = dir.path().join("app.old.log");
//! let file = FileBuilder::new(path)
//!     .backup_filename(old_path)
//!     .max_size(10_000)
//!     .build()
//!     .unwrap();
//!
//! let manager = Manager::new();
//! manager.add_sink(file);
//! manager.logger("main").info().append("This line will be written to app.log.");
//! ```

pub use self::append::File;
pub use self::append::FileBuilder;
pub use self::rotating::DEFAULT_FILENAME;
pub use self::rotating::DEFAULT_FILENAME_OLD;
pub use self::rotating::DEFAULT_MAX_SIZE;
pub use self::rotating::DEFAULT_MAX_STARTUP_SIZE;
pub use self::rotating::RotatingFileWriter;
pub use self::rotating::RotatingFileWriterBuilder;

mod append;
mod rotating;
