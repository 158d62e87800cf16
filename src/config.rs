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

//! String key-value configuration consumed by sink construction.

use std::collections::BTreeMap;
use std::ops::Deref;
use std::ops::DerefMut;
use std::str::FromStr;

use crate::Error;
use crate::ErrorKind;

/// A named set of string values.
///
/// When passed to [`Manager::configure`](crate::Manager::configure), the name selects the sink
/// kind and the values parametrize it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    name: String,
    values: BTreeMap<String, String>,
}

impl Config {
    /// Create an empty config with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Set a value, replacing any previous one, and return the config.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_value(key, value);
        self
    }

    /// The name of this config.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All values, ordered by key.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Set a value, replacing any previous one.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Get a value, or `default` when the key is not set.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Get a value that must be set.
    ///
    /// # Errors
    ///
    /// Return a [`ErrorKind::Lookup`] error if the key is not set.
    pub fn require(&self, key: &str) -> Result<&str, Error> {
        self.get(key).ok_or_else(|| {
            Error::new(ErrorKind::Lookup, "missing required value")
                .with_context("config", &self.name)
                .with_context("key", key)
        })
    }

    /// Parse a value, or return `default` when the key is not set.
    ///
    /// # Errors
    ///
    /// Return a [`ErrorKind::Lookup`] error if the value is set but cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use logchannel::Config;
    ///
    /// let config = Config::new("OutputFile").with_value("max_size", "10000");
    /// assert_eq!(config.get_parsed_or("max_size", 1024u64).unwrap(), 10000);
    /// assert_eq!(config.get_parsed_or("max_startup_size", 0u64).unwrap(), 0);
    /// ```
    pub fn get_parsed_or<T>(&self, key: &str, default: T) -> Result<T, Error>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value.trim().parse().map_err(|err| {
                Error::new(ErrorKind::Lookup, "malformed value")
                    .with_context("config", &self.name)
                    .with_context("key", key)
                    .with_context("value", value)
                    .with_source(err)
            }),
        }
    }
}

/// An ordered list of configs, one per sink to construct.
///
/// # Examples
///
/// ```
/// use logchannel::ConfigList;
///
/// let mut configs = ConfigList::new();
/// configs.add_output("OutputConsole");
/// configs.add_output("OutputFile");
/// configs.set_option("filename", "log.txt");
/// configs.set_option("max_size", "10000");
///
/// assert_eq!(configs.len(), 2);
/// assert_eq!(configs[1].get("filename"), Some("log.txt"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConfigList(Vec<Config>);

impl ConfigList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self(vec![])
    }

    /// Append a new, empty config for the given sink kind.
    pub fn add_output(&mut self, kind: impl Into<String>) -> &mut Self {
        self.0.push(Config::new(kind));
        self
    }

    /// Set a value on the most recently added config.
    ///
    /// Does nothing if the list is empty.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        if let Some(config) = self.0.last_mut() {
            config.set_value(key, value);
        }
        self
    }
}

impl Deref for ConfigList {
    type Target = Vec<Config>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Config>> for ConfigList {
    fn from(configs: Vec<Config>) -> Self {
        Self(configs)
    }
}

impl FromIterator<Config> for ConfigList {
    fn from_iter<I: IntoIterator<Item = Config>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors() {
        let config = Config::new("OutputFile").with_value("max_size", "ten");

        let err = config.require("filename").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(err.context("key"), Some("filename"));

        let err = config.get_parsed_or("max_size", 0u64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(err.context("value"), Some("ten"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::new("OutputFile").with_value("filename", "app.log");
        assert_eq!(config.get_or("filename", "log.txt"), "app.log");
        assert_eq!(config.get_or("filename_old", "log.old.txt"), "log.old.txt");
        assert_eq!(config.require("filename").unwrap(), "app.log");
    }

    #[test]
    fn test_set_option_without_output() {
        let mut configs = ConfigList::new();
        configs.set_option("filename", "ignored.txt");
        assert!(configs.is_empty());

        configs.add_output("OutputConsole").set_option("color", "false");
        assert_eq!(configs[0].get("color"), Some("false"));
    }
}
