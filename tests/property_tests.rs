//! Property-based tests for micro_logging using proptest

use micro_logging::prelude::*;
use micro_logging::RECORD_FIELDS;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

struct Capture(Arc<Mutex<Vec<String>>>);

impl Sink for Capture {
    fn emit(&mut self, line: &str) -> Result<()> {
        self.0.lock().push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "capture"
    }
}

fn record(template: &str, args: Vec<LogValue>) -> LogRecord {
    LogRecord::new("prop", Level::INFO, template, args)
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Ordering of levels follows their integer value
    #[test]
    fn test_level_ordering(a in any::<i32>(), b in any::<i32>()) {
        let (la, lb) = (Level::new(a), Level::new(b));
        prop_assert_eq!(la <= lb, a <= b);
        prop_assert_eq!(la.cmp(&lb), a.cmp(&b));
    }

    /// A set level is its own effective threshold, NOTSET defers
    #[test]
    fn test_or_default(value in any::<i32>(), default in any::<i32>()) {
        let expected = if value == 0 { default } else { value };
        prop_assert_eq!(
            Level::new(value).or_default(Level::new(default)).value(),
            expected
        );
    }

    /// Values without a registered name render as LVL<n>
    #[test]
    fn test_unregistered_level_names(value in 1000..100_000i32) {
        prop_assert_eq!(Level::new(value).name(), format!("LVL{}", value));
    }

    /// Integers parse back to the same level
    #[test]
    fn test_level_parse_integer(value in any::<i32>()) {
        let parsed: Level = value.to_string().parse().unwrap();
        prop_assert_eq!(parsed, Level::new(value));
    }
}

// ============================================================================
// Filtering Tests
// ============================================================================

proptest! {
    /// A record reaches a handler iff it passes both thresholds
    #[test]
    fn test_threshold_filtering(
        logger_level in 1..60i32,
        handler_level in 1..60i32,
        event_levels in prop::collection::vec(0..60i32, 0..40),
    ) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::new("prop.filter");
        logger.set_level(Level::new(logger_level));
        logger.add_handler(Arc::new(
            Handler::new(Capture(Arc::clone(&lines)))
                .with_level(Level::new(handler_level))
                .with_formatter(
                    Formatter::new(Some("%(levelno)d"), None, Style::Percent).unwrap(),
                ),
        ));

        for level in &event_levels {
            logger.log(Level::new(*level), "event", &[]);
        }

        let expected: Vec<String> = event_levels
            .iter()
            .filter(|level| **level >= logger_level && **level >= handler_level)
            .map(|level| format!("{}\n", level))
            .collect();
        let passed_logger = event_levels.iter().filter(|l| **l >= logger_level).count() as u64;

        prop_assert_eq!(&*lines.lock(), &expected);
        prop_assert_eq!(logger.metrics().records_emitted(), passed_logger);
        prop_assert_eq!(
            logger.metrics().records_filtered(),
            event_levels.len() as u64 - passed_logger
        );
    }
}

// ============================================================================
// Formatting Tests
// ============================================================================

proptest! {
    /// Templates without arguments are used verbatim, % signs included
    #[test]
    fn test_template_without_args_is_verbatim(template in ".*") {
        let formatter = Formatter::default();
        prop_assert_eq!(formatter.format(&record(&template, vec![])).unwrap(), template);
    }

    /// %d matches Rust's integer Display
    #[test]
    fn test_percent_d(value in any::<i64>()) {
        let formatter = Formatter::default();
        let rendered = formatter.format(&record("n=%d", vec![value.into()])).unwrap();
        prop_assert_eq!(rendered, format!("n={}", value));
    }

    /// Width pads on the left, the minus flag pads on the right
    #[test]
    fn test_percent_width(word in "[a-z]{0,12}", width in 0usize..20) {
        let formatter = Formatter::default();
        let right = formatter
            .format(&record(&format!("%{}s", width), vec![word.as_str().into()]))
            .unwrap();
        let left = formatter
            .format(&record(&format!("%-{}s", width), vec![word.as_str().into()]))
            .unwrap();
        prop_assert_eq!(right, format!("{:>width$}", word, width = width));
        prop_assert_eq!(left, format!("{:<width$}", word, width = width));
    }

    /// %x and %X agree with Rust's hex formatting for non-negative values
    #[test]
    fn test_percent_hex(value in 0u32..u32::MAX) {
        let formatter = Formatter::default();
        let rendered = formatter
            .format(&record("%x/%X/%#x", vec![value.into(), value.into(), value.into()]))
            .unwrap();
        prop_assert_eq!(rendered, format!("{:x}/{:X}/{:#x}", value, value, value));
    }

    /// Argument count must match the placeholder count exactly
    #[test]
    fn test_argument_count_mismatch(placeholders in 0usize..6, args in 0usize..6) {
        prop_assume!(args > 0 && placeholders != args);
        let template = vec!["%s"; placeholders].join(" ");
        let values: Vec<LogValue> = (0..args).map(|i| (i as i64).into()).collect();
        let result = Formatter::default().format(&record(&template, values));
        prop_assert!(result.is_err());
    }

    /// Percent and brace styles render the same fields identically
    #[test]
    fn test_styles_agree(name in "[a-z][a-z.]{0,10}", message in "[^%{}]{0,30}") {
        let percent = Formatter::new(
            Some("%(name)s:%(levelname)s:%(message)s"),
            None,
            Style::Percent,
        )
        .unwrap();
        let brace = Formatter::new(Some("{name}:{levelname}:{message}"), None, Style::Brace).unwrap();
        let rec = LogRecord::new(name.as_str(), Level::WARNING, message.as_str(), vec![]);
        prop_assert_eq!(percent.format(&rec).unwrap(), brace.format(&rec).unwrap());
    }
}

// ============================================================================
// Format String Validation Tests
// ============================================================================

proptest! {
    /// Any field outside the record attribute set is rejected
    #[test]
    fn test_unknown_fields_rejected(field in "[a-z]{1,10}") {
        prop_assume!(!RECORD_FIELDS.contains(&field.as_str()));
        let percent = Formatter::new(Some(&format!("%({})s", field)), None, Style::Percent);
        let brace = Formatter::new(Some(&format!("{{{}}}", field)), None, Style::Brace);
        prop_assert!(percent.unwrap_err().is_configuration());
        prop_assert!(brace.unwrap_err().is_configuration());
    }
}
