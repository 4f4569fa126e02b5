//! Severity levels and the shared level-name table
//!
//! Severities are plain integers: higher is more severe. The well-known
//! constants are pre-registered, and applications may attach names to any
//! other integer with [`register_level`]. Integers without a registered
//! name render as `LVL<n>`.

use super::registry::logging_state;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Integer severity; higher is more severe
///
/// Serializes as its integer value and deserializes from either an
/// integer or a level name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Level(i32);

impl Level {
    pub const CRITICAL: Level = Level(50);
    pub const ERROR: Level = Level(40);
    pub const WARNING: Level = Level(30);
    pub const INFO: Level = Level(20);
    pub const DEBUG: Level = Level(10);
    pub const TRACE: Level = Level(5);
    /// Defer to the process-wide default threshold
    pub const NOTSET: Level = Level(0);

    #[must_use]
    pub const fn new(value: i32) -> Self {
        Level(value)
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_set(self) -> bool {
        self.0 != 0
    }

    /// This level if set, otherwise `default`
    #[inline]
    #[must_use]
    pub const fn or_default(self, default: Level) -> Level {
        if self.is_set() {
            self
        } else {
            default
        }
    }

    /// Registered name, or `LVL<n>` when none exists
    #[must_use]
    pub fn name(self) -> String {
        level_name(self)
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Level(value)
    }
}

impl From<Level> for i32 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    /// Accepts an integer, a registered name (case-insensitive) or `WARN`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<i32>() {
            return Ok(Level(value));
        }
        if trimmed.eq_ignore_ascii_case("WARN") {
            return Ok(Level::WARNING);
        }
        level_for_name(trimmed).ok_or_else(|| format!("Invalid log level: '{}'", s))
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Value(i32),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Value(value) => Ok(Level(value)),
            Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Names the process starts with
pub(crate) fn builtin_level_names() -> HashMap<i32, String> {
    [
        (Level::CRITICAL, "CRITICAL"),
        (Level::ERROR, "ERROR"),
        (Level::WARNING, "WARNING"),
        (Level::INFO, "INFO"),
        (Level::DEBUG, "DEBUG"),
        (Level::TRACE, "TRACE"),
    ]
    .into_iter()
    .map(|(level, name)| (level.value(), name.to_string()))
    .collect()
}

/// Insert or overwrite the name of a severity
///
/// # Examples
///
/// ```
/// use micro_logging::{level_name, register_level, Level};
///
/// register_level(Level::new(25), "NOTICE");
/// assert_eq!(level_name(Level::new(25)), "NOTICE");
/// assert_eq!(level_name(Level::new(26)), "LVL26");
/// ```
pub fn register_level(level: impl Into<Level>, name: impl Into<String>) {
    logging_state()
        .level_names
        .write()
        .insert(level.into().value(), name.into());
}

/// Name registered for `level`, or a synthesized `LVL<n>` label
pub fn level_name(level: impl Into<Level>) -> String {
    let level = level.into();
    logging_state()
        .level_names
        .read()
        .get(&level.value())
        .cloned()
        .unwrap_or_else(|| format!("LVL{}", level.value()))
}

/// Reverse lookup, case-insensitive
///
/// When several severities share the name, the lowest one is returned.
pub fn level_for_name(name: &str) -> Option<Level> {
    logging_state()
        .level_names
        .read()
        .iter()
        .filter(|(_, registered)| registered.eq_ignore_ascii_case(name))
        .map(|(value, _)| *value)
        .min()
        .map(Level)
}
