//! Record rendering
//!
//! A [`Formatter`] turns a [`LogRecord`] into one line of text. It
//! interpolates the message template with the record's arguments, renders
//! the timestamp only when the format string asks for it, appends
//! exception text, and finally substitutes the resulting field set into
//! its format string.

use super::error::{LoggerError, Result};
use super::log_record::{ExceptionInfo, LogRecord, LogValue};
use super::template::{interpolate_positional, BraceTemplate, PercentTemplate};
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Default date layout: year, month, day, hour, minute, second
pub const DEFAULT_DATE_FORMAT: &str = "{0}-{1}-{2} {3}:{4}:{5}";

/// Fields a format string may reference
pub const RECORD_FIELDS: [&str; 9] = [
    "name",
    "levelno",
    "levelname",
    "message",
    "msg",
    "asctime",
    "created",
    "msecs",
    "module",
];

const TIME_FIELD: &str = "asctime";

/// Placeholder syntax of a format string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    /// `%(field)s`
    #[default]
    #[serde(rename = "%")]
    Percent,
    /// `{field}`
    #[serde(rename = "{")]
    Brace,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Percent => "%",
            Style::Brace => "{",
        }
    }

    fn default_format(&self) -> &'static str {
        match self {
            Style::Percent => "%(message)s",
            Style::Brace => "{message}",
        }
    }
}

impl FromStr for Style {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "%" => Ok(Style::Percent),
            "{" => Ok(Style::Brace),
            _ => Err(LoggerError::config(
                "Formatter",
                format!("Style must be one of: %, {{ (got '{}')", s),
            )),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broken-down calendar time fed to the date layout
///
/// Slots are addressable by position (`{0}`..`{7}`) or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Monday is 0
    pub weekday: u32,
    /// January 1st is 1
    pub yearday: u32,
}

impl TimeParts {
    /// 1970-01-01 00:00:00, a Thursday
    pub const EPOCH: TimeParts = TimeParts {
        year: 1970,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
        weekday: 3,
        yearday: 1,
    };

    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        Self {
            year: datetime.year(),
            month: datetime.month(),
            day: datetime.day(),
            hour: datetime.hour(),
            minute: datetime.minute(),
            second: datetime.second(),
            weekday: datetime.weekday().num_days_from_monday(),
            yearday: datetime.ordinal(),
        }
    }

    fn slot(&self, key: &str) -> Option<LogValue> {
        let value = match key {
            "0" | "year" => return Some(self.year.into()),
            "1" | "month" => self.month,
            "2" | "day" => self.day,
            "3" | "hour" => self.hour,
            "4" | "minute" => self.minute,
            "5" | "second" => self.second,
            "6" | "weekday" => self.weekday,
            "7" | "yearday" => self.yearday,
            _ => return None,
        };
        Some(value.into())
    }
}

/// Converts a record timestamp into calendar fields
pub type TimeConverter = Arc<dyn Fn(&DateTime<Utc>) -> TimeParts + Send + Sync>;

/// Calendar fields in the host's local time zone
pub fn local_time(created: &DateTime<Utc>) -> TimeParts {
    TimeParts::from_datetime(&created.with_timezone(&Local))
}

pub fn utc_time(created: &DateTime<Utc>) -> TimeParts {
    TimeParts::from_datetime(created)
}

/// Renders structured exception payloads attached to records
pub trait ExceptionRenderer: Send + Sync {
    fn format_exception(&self, info: &ExceptionInfo) -> String;
}

/// Message followed by the `Caused by:` chain
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainRenderer;

impl ExceptionRenderer for ChainRenderer {
    fn format_exception(&self, info: &ExceptionInfo) -> String {
        info.render()
    }
}

#[derive(Debug, Clone)]
enum CompiledFormat {
    Percent(PercentTemplate),
    Brace(BraceTemplate),
}

impl CompiledFormat {
    fn keys(&self) -> Vec<&str> {
        match self {
            CompiledFormat::Percent(template) => template.keys().collect(),
            CompiledFormat::Brace(template) => template.keys().collect(),
        }
    }
}

#[derive(Clone)]
pub struct Formatter {
    fmt: String,
    datefmt: String,
    style: Style,
    compiled: CompiledFormat,
    date_layout: BraceTemplate,
    uses_time: bool,
    converter: TimeConverter,
    exception_renderer: Option<Arc<dyn ExceptionRenderer>>,
}

impl Formatter {
    /// Build a formatter, validating both templates up front
    ///
    /// `fmt` defaults to the bare message, `datefmt` to
    /// [`DEFAULT_DATE_FORMAT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use micro_logging::{Formatter, Level, LogRecord, Style};
    ///
    /// let formatter = Formatter::new(Some("{name}: {message}"), None, Style::Brace).unwrap();
    /// let record = LogRecord::new("svc", Level::INFO, "ready", vec![]);
    /// assert_eq!(formatter.format(&record).unwrap(), "svc: ready");
    ///
    /// assert!(Formatter::new(Some("%(nmae)s"), None, Style::Percent).is_err());
    /// ```
    pub fn new(fmt: Option<&str>, datefmt: Option<&str>, style: Style) -> Result<Self> {
        let fmt = fmt.unwrap_or_else(|| style.default_format()).to_string();
        let datefmt = datefmt.unwrap_or(DEFAULT_DATE_FORMAT).to_string();

        let compiled = match style {
            Style::Percent => PercentTemplate::parse(&fmt).map(CompiledFormat::Percent),
            Style::Brace => BraceTemplate::parse(&fmt).map(CompiledFormat::Brace),
        }
        .map_err(|e| LoggerError::config("Formatter", format!("format string '{}': {}", fmt, e)))?;

        if let Some(unknown) = compiled
            .keys()
            .into_iter()
            .find(|key| !RECORD_FIELDS.contains(key))
        {
            return Err(LoggerError::config(
                "Formatter",
                format!("unknown field '{}' in format string '{}'", unknown, fmt),
            ));
        }

        let date_layout = BraceTemplate::parse(&datefmt).map_err(|e| {
            LoggerError::config("Formatter", format!("date format '{}': {}", datefmt, e))
        })?;
        if let Some(unknown) = date_layout
            .keys()
            .find(|key| TimeParts::EPOCH.slot(key).is_none())
        {
            return Err(LoggerError::config(
                "Formatter",
                format!("unknown slot '{}' in date format '{}'", unknown, datefmt),
            ));
        }

        let uses_time = compiled.keys().contains(&TIME_FIELD);

        Ok(Self {
            fmt,
            datefmt,
            style,
            compiled,
            date_layout,
            uses_time,
            converter: Arc::new(local_time),
            exception_renderer: None,
        })
    }

    /// Like [`Formatter::new`] with the style given as `"%"` or `"{"`
    pub fn with_style_name(fmt: Option<&str>, datefmt: Option<&str>, style: &str) -> Result<Self> {
        Self::new(fmt, datefmt, style.parse()?)
    }

    /// Replace the time conversion function (defaults to [`local_time`])
    #[must_use]
    pub fn with_converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(&DateTime<Utc>) -> TimeParts + Send + Sync + 'static,
    {
        self.converter = Arc::new(converter);
        self
    }

    #[must_use]
    pub fn with_exception_renderer<R>(mut self, renderer: R) -> Self
    where
        R: ExceptionRenderer + 'static,
    {
        self.exception_renderer = Some(Arc::new(renderer));
        self
    }

    pub fn fmt(&self) -> &str {
        &self.fmt
    }

    pub fn datefmt(&self) -> &str {
        &self.datefmt
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Whether the format string references `asctime`
    pub fn uses_time(&self) -> bool {
        self.uses_time
    }

    /// Render `record` to a single string without line terminator
    pub fn format(&self, record: &LogRecord) -> Result<String> {
        let mut message = self.format_message(record)?;

        let asctime = if self.uses_time {
            Some(self.format_time(record)?)
        } else {
            None
        };

        if let Some(info) = record.exception_info() {
            let exc_text = self.format_exception(info)?;
            message.push('\n');
            message.push_str(&exc_text);
        }

        let lookup = |key: &str| -> Option<LogValue> {
            match key {
                "name" => Some(record.name().into()),
                "levelno" => Some(record.level().value().into()),
                "levelname" => Some(record.levelname().into()),
                "message" => Some(message.as_str().into()),
                "msg" => Some(record.message_template().into()),
                "asctime" => asctime.as_deref().map(LogValue::from),
                "created" => Some(record.created_secs().into()),
                "msecs" => Some(record.msecs().into()),
                "module" => Some(record.module().into()),
                _ => None,
            }
        };

        match &self.compiled {
            CompiledFormat::Percent(template) => template.render(lookup),
            CompiledFormat::Brace(template) => template.render(lookup),
        }
        .map_err(|e| LoggerError::formatter(self.style.as_str(), e))
    }

    /// Interpolate the record's template with its arguments
    ///
    /// A template logged without arguments is used verbatim.
    pub fn format_message(&self, record: &LogRecord) -> Result<String> {
        if record.args().is_empty() {
            return Ok(record.message_template().to_string());
        }
        interpolate_positional(record.message_template(), record.args())
            .map_err(|e| LoggerError::formatter("%", format!("{} in '{}'", e, record.message_template())))
    }

    /// Render the record timestamp through the converter and date layout
    pub fn format_time(&self, record: &LogRecord) -> Result<String> {
        let parts = (self.converter)(&record.created());
        self.date_layout
            .render(|key| parts.slot(key))
            .map_err(|e| LoggerError::formatter("date", e))
    }

    /// Fails with `NotImplemented` unless an [`ExceptionRenderer`] is attached
    pub fn format_exception(&self, info: &ExceptionInfo) -> Result<String> {
        self.exception_renderer
            .as_ref()
            .map(|renderer| renderer.format_exception(info))
            .ok_or_else(|| LoggerError::not_implemented("format_exception", "Formatter"))
    }
}

impl Default for Formatter {
    /// Bare message, default date layout
    fn default() -> Self {
        Self {
            fmt: Style::Percent.default_format().to_string(),
            datefmt: DEFAULT_DATE_FORMAT.to_string(),
            style: Style::Percent,
            compiled: CompiledFormat::Percent(PercentTemplate::single_field("message")),
            date_layout: BraceTemplate::default_date_layout(),
            uses_time: false,
            converter: Arc::new(local_time),
            exception_renderer: None,
        }
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("fmt", &self.fmt)
            .field("datefmt", &self.datefmt)
            .field("style", &self.style)
            .field("uses_time", &self.uses_time)
            .field("exception_renderer", &self.exception_renderer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::Level;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fixed_datetime() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123)
    }

    fn record(template: &str, args: Vec<LogValue>) -> LogRecord {
        LogRecord::new("svc", Level::INFO, template, args).with_created(fixed_datetime())
    }

    #[test]
    fn test_default_is_bare_message() {
        let formatter = Formatter::default();
        assert_eq!(formatter.fmt(), "%(message)s");
        assert!(!formatter.uses_time());
        let out = formatter
            .format(&record("%s=%d", vec!["x".into(), 5.into()]))
            .unwrap();
        assert_eq!(out, "x=5");
    }

    #[test]
    fn test_percent_round_trip() {
        let formatter =
            Formatter::new(Some("%(levelname)s:%(message)s"), None, Style::Percent).unwrap();
        let out = formatter
            .format(&record("%s=%d", vec!["x".into(), 5.into()]))
            .unwrap();
        assert!(out.ends_with("x=5"));
        assert_eq!(out, "INFO:x=5");
    }

    #[test]
    fn test_brace_style() {
        let formatter = Formatter::new(Some("{name}: {message}"), None, Style::Brace).unwrap();
        assert_eq!(formatter.format(&record("ready", vec![])).unwrap(), "svc: ready");
    }

    #[test]
    fn test_brace_style_still_interpolates_message_with_percent() {
        let formatter = Formatter::new(Some("[{levelname:<5}] {message}"), None, Style::Brace)
            .unwrap();
        let out = formatter
            .format(&record("took %dms", vec![12.into()]))
            .unwrap();
        assert_eq!(out, "[INFO ] took 12ms");
    }

    #[test]
    fn test_unknown_style_rejected_at_construction() {
        let err = Formatter::with_style_name(None, None, "$").unwrap_err();
        assert!(err.is_configuration());
        assert!(Formatter::with_style_name(None, None, "{").is_ok());
    }

    #[test]
    fn test_unknown_field_rejected_at_construction() {
        let err = Formatter::new(Some("%(levelnam)s"), None, Style::Percent).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("levelnam"));

        let err = Formatter::new(Some("{mesage}"), None, Style::Brace).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_huge_width_rejected_at_construction() {
        let err = Formatter::new(
            Some("%(message)99999999999999999999999s"),
            None,
            Style::Percent,
        )
        .unwrap_err();
        assert!(err.is_configuration());

        let err = Formatter::new(Some("{message:9999999999}"), None, Style::Brace).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_huge_width_in_message_is_render_error() {
        let formatter = Formatter::default();
        let record = LogRecord::new("svc", Level::INFO, "%9999999999s", vec!["x".into()]);
        let err = formatter.format(&record).unwrap_err();
        assert!(matches!(err, LoggerError::Render { .. }));
    }

    #[test]
    fn test_malformed_format_rejected() {
        assert!(Formatter::new(Some("%(message)"), None, Style::Percent).is_err());
        assert!(Formatter::new(Some("{message"), None, Style::Brace).is_err());
        assert!(Formatter::new(None, Some("{0}-{9}"), Style::Percent).is_err());
    }

    #[test]
    fn test_uses_time() {
        let without = Formatter::new(Some("%(message)s"), None, Style::Percent).unwrap();
        assert!(!without.uses_time());

        let with = Formatter::new(Some("%(asctime)s %(message)s"), None, Style::Percent).unwrap();
        assert!(with.uses_time());

        let brace = Formatter::new(Some("{asctime} {message}"), None, Style::Brace).unwrap();
        assert!(brace.uses_time());
    }

    #[test]
    fn test_converter_not_called_without_time_field() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let formatter = Formatter::new(Some("%(name)s %(message)s"), None, Style::Percent)
            .unwrap()
            .with_converter(move |created| {
                counter.fetch_add(1, Ordering::SeqCst);
                utc_time(created)
            });

        formatter.format(&record("one", vec![])).unwrap();
        formatter.format(&record("two", vec![])).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_converter_called_with_time_field() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let formatter = Formatter::new(Some("%(asctime)s %(message)s"), None, Style::Percent)
            .unwrap()
            .with_converter(move |created| {
                counter.fetch_add(1, Ordering::SeqCst);
                utc_time(created)
            });

        let out = formatter.format(&record("up", vec![])).unwrap();
        assert_eq!(out, "2025-1-8 10:30:45 up");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_named_date_layout() {
        let formatter = Formatter::new(
            Some("{asctime}|{message}"),
            Some("{year}/{month:02}/{day:02}T{hour:02}:{minute:02}:{second:02}"),
            Style::Brace,
        )
        .unwrap()
        .with_converter(utc_time);
        let out = formatter.format(&record("up", vec![])).unwrap();
        assert_eq!(out, "2025/01/08T10:30:45|up");
    }

    #[test]
    fn test_numeric_fields() {
        let formatter = Formatter::new(
            Some("%(levelno)d %(msecs)03d %(module)s"),
            None,
            Style::Percent,
        )
        .unwrap();
        let rec = record("x", vec![]).with_module(Some("net"));
        assert_eq!(formatter.format(&rec).unwrap(), "20 123 net");
    }

    #[test]
    fn test_msg_field_is_raw_template() {
        let formatter = Formatter::new(Some("%(msg)s | %(message)s"), None, Style::Percent).unwrap();
        let out = formatter
            .format(&record("hello %s", vec!["bob".into()]))
            .unwrap();
        assert_eq!(out, "hello %s | hello bob");
    }

    #[test]
    fn test_template_without_args_used_verbatim() {
        let formatter = Formatter::default();
        assert_eq!(formatter.format(&record("100% done", vec![])).unwrap(), "100% done");
    }

    #[test]
    fn test_argument_mismatch_fails_at_format_time() {
        let formatter = Formatter::default();
        let err = formatter
            .format(&record("%s and %s", vec!["one".into()]))
            .unwrap_err();
        assert!(matches!(err, LoggerError::Render { .. }));
    }

    #[test]
    fn test_exception_without_renderer_fails_loudly() {
        let formatter = Formatter::default();
        let rec = record("boom", vec![]).with_exception(ExceptionInfo::new("disk full"));
        let err = formatter.format(&rec).unwrap_err();
        assert!(matches!(err, LoggerError::NotImplemented { .. }));
    }

    #[test]
    fn test_exception_text_assigned_once() {
        let formatter = Formatter::default().with_exception_renderer(ChainRenderer);
        let rec = record("boom", vec![]).with_exception(ExceptionInfo {
            message: "disk full".to_string(),
            causes: vec!["write failed".to_string()],
        });
        let expected = "boom\ndisk full\nCaused by:\n    0: write failed";
        assert_eq!(formatter.format(&rec).unwrap(), expected);
        // Rendering the same record again must not accumulate text
        assert_eq!(formatter.format(&rec).unwrap(), expected);
    }

    #[test]
    fn test_unregistered_level_renders_synthesized_name() {
        let formatter = Formatter::new(Some("%(levelname)s %(message)s"), None, Style::Percent)
            .unwrap();
        let rec = LogRecord::new("svc", Level::new(23), "odd", vec![]);
        assert_eq!(formatter.format(&rec).unwrap(), "LVL23 odd");
    }

    #[test]
    fn test_style_serde() {
        let style: Style = serde_json::from_str("\"{\"").unwrap();
        assert_eq!(style, Style::Brace);
        assert_eq!(serde_json::to_string(&Style::Percent).unwrap(), "\"%\"");
    }
}
