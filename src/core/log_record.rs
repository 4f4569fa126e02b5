//! Log record structure

use super::log_level::{level_name, Level};
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Module tag used when the caller does not supply one
pub const UNKNOWN_MODULE: &str = "<?>";

/// Positional argument captured for deferred interpolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl LogValue {
    /// Quoted form used by the `%r` conversion
    #[must_use]
    pub fn repr(&self) -> String {
        match self {
            LogValue::Str(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }

    /// Integer view for `%d`, `%x`, `%o` and `%c`; floats truncate toward zero
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            LogValue::Int(i) => Some(i128::from(*i)),
            LogValue::UInt(u) => Some(i128::from(*u)),
            LogValue::Float(f) if f.is_finite() => Some(f.trunc() as i128),
            LogValue::Bool(b) => Some(i128::from(*b)),
            _ => None,
        }
    }

    /// Float view for `%f`, `%e` and `%g`
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LogValue::Int(i) => Some(*i as f64),
            LogValue::UInt(u) => Some(*u as f64),
            LogValue::Float(f) => Some(*f),
            LogValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            LogValue::Str(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            LogValue::Str(_) => "str",
            LogValue::Int(_) | LogValue::UInt(_) => "int",
            LogValue::Float(_) => "float",
            LogValue::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Str(s) => write!(f, "{}", s),
            LogValue::Int(i) => write!(f, "{}", i),
            LogValue::UInt(u) => write!(f, "{}", u),
            LogValue::Float(fl) => write!(f, "{}", fl),
            LogValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::Str(s)
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::Str(s.to_string())
    }
}

impl From<&String> for LogValue {
    fn from(s: &String) -> Self {
        LogValue::Str(s.clone())
    }
}

impl From<char> for LogValue {
    fn from(c: char) -> Self {
        LogValue::Str(c.to_string())
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        LogValue::Bool(b)
    }
}

impl From<f32> for LogValue {
    fn from(f: f32) -> Self {
        LogValue::Float(f64::from(f))
    }
}

impl From<f64> for LogValue {
    fn from(f: f64) -> Self {
        LogValue::Float(f)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for LogValue {
            fn from(i: $t) -> Self {
                LogValue::Int(i as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for LogValue {
            fn from(u: $t) -> Self {
                LogValue::UInt(u as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

/// Structured description of an error: its message and `source()` chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    pub message: String,
    pub causes: Vec<String>,
}

impl ExceptionInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Capture `error` and every error reachable through `source()`
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut current = error.source();
        while let Some(cause) = current {
            causes.push(cause.to_string());
            current = cause.source();
        }
        Self {
            message: error.to_string(),
            causes,
        }
    }

    /// Multi-line rendering: the message followed by a `Caused by:` list
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.message.clone();
        if !self.causes.is_empty() {
            out.push_str("\nCaused by:");
            for (idx, cause) in self.causes.iter().enumerate() {
                out.push_str(&format!("\n    {}: {}", idx, cause));
            }
        }
        out
    }
}

/// Snapshot of one accepted log event
///
/// Built once by the logger and shared by reference with every handler.
/// The rendered message is never stored here; formatters compute it into
/// their own field set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    name: String,
    level: Level,
    levelname: String,
    created: DateTime<Utc>,
    message_template: String,
    args: Vec<LogValue>,
    exception_info: Option<ExceptionInfo>,
    module: String,
}

impl LogRecord {
    pub fn new(
        name: impl Into<String>,
        level: Level,
        message_template: impl Into<String>,
        args: Vec<LogValue>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            levelname: level_name(level),
            created: Utc::now(),
            message_template: message_template.into(),
            args,
            exception_info: None,
            module: UNKNOWN_MODULE.to_string(),
        }
    }

    /// Set the module tag; `None` keeps the `<?>` placeholder
    #[must_use]
    pub fn with_module(mut self, module: Option<&str>) -> Self {
        if let Some(module) = module {
            self.module = module.to_string();
        }
        self
    }

    #[must_use]
    pub fn with_exception(mut self, exception_info: ExceptionInfo) -> Self {
        self.exception_info = Some(exception_info);
        self
    }

    #[must_use]
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn levelname(&self) -> &str {
        &self.levelname
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Seconds since the Unix epoch, with fractional part
    pub fn created_secs(&self) -> f64 {
        self.created.timestamp() as f64 + f64::from(self.created.nanosecond()) / 1e9
    }

    /// Millisecond portion of `created`
    pub fn msecs(&self) -> f64 {
        f64::from(self.created.nanosecond() % 1_000_000_000) / 1e6
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    pub fn args(&self) -> &[LogValue] {
        &self.args
    }

    pub fn exception_info(&self) -> Option<&ExceptionInfo> {
        self.exception_info.as_ref()
    }

    pub fn module(&self) -> &str {
        &self.module
    }
}
