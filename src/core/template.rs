//! Template engines used by the formatter
//!
//! Two families of placeholders are understood:
//! - printf style: `%s`, `%5.2f`, `%(levelname)-8s`, with `%%` as an escape
//! - brace style: `{name}`, `{levelno:>3}`, `{message!r}`, with `{{`/`}}`
//!
//! Templates are parsed once into pieces so that unknown conversions and
//! malformed placeholders are reported when a formatter is built, not on
//! every record.

use super::log_record::LogValue;
use std::iter::Peekable;
use std::str::Chars;

const PRINTF_CONVERSIONS: &str = "srdiufFeEgGxXoc";
const BRACE_TYPES: &str = "sdfFeEgGxXo";
/// Upper bound for both width and precision
pub(crate) const MAX_FIELD_WIDTH: usize = 4096;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    alt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PrintfSpec {
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PercentPiece {
    Literal(String),
    Named(String, PrintfSpec),
    Positional(PrintfSpec),
}

/// Parsed `%(field)s` template
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PercentTemplate {
    pieces: Vec<PercentPiece>,
}

impl PercentTemplate {
    /// `%(key)s`
    pub(crate) fn single_field(key: &str) -> Self {
        Self {
            pieces: vec![PercentPiece::Named(
                key.to_string(),
                PrintfSpec {
                    flags: Flags::default(),
                    width: None,
                    precision: None,
                    conversion: 's',
                },
            )],
        }
    }

    pub(crate) fn parse(template: &str) -> Result<Self, String> {
        let pieces = tokenize_percent(template)?;
        if pieces
            .iter()
            .any(|piece| matches!(piece, PercentPiece::Positional(_)))
        {
            return Err("format requires a mapping".to_string());
        }
        Ok(Self { pieces })
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.pieces.iter().filter_map(|piece| match piece {
            PercentPiece::Named(key, _) => Some(key.as_str()),
            _ => None,
        })
    }

    pub(crate) fn render<F>(&self, lookup: F) -> Result<String, String>
    where
        F: Fn(&str) -> Option<LogValue>,
    {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                PercentPiece::Literal(text) => out.push_str(text),
                PercentPiece::Named(key, spec) => {
                    let value = lookup(key).ok_or_else(|| format!("unknown field '{}'", key))?;
                    out.push_str(&render_printf(spec, &value)?);
                }
                PercentPiece::Positional(_) => {
                    return Err("format requires a mapping".to_string());
                }
            }
        }
        Ok(out)
    }
}

/// Substitute `args` into a positional printf template
pub(crate) fn interpolate_positional(template: &str, args: &[LogValue]) -> Result<String, String> {
    let mut out = String::new();
    let mut remaining = args.iter();
    for piece in tokenize_percent(template)? {
        match piece {
            PercentPiece::Literal(text) => out.push_str(&text),
            PercentPiece::Positional(spec) => {
                let value = remaining
                    .next()
                    .ok_or_else(|| "not enough arguments for format string".to_string())?;
                out.push_str(&render_printf(&spec, value)?);
            }
            PercentPiece::Named(..) => return Err("format requires a mapping".to_string()),
        }
    }
    if remaining.next().is_some() {
        return Err("not all arguments converted during string formatting".to_string());
    }
    Ok(out)
}

fn tokenize_percent(template: &str) -> Result<Vec<PercentPiece>, String> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            literal.push('%');
            continue;
        }
        if !literal.is_empty() {
            pieces.push(PercentPiece::Literal(std::mem::take(&mut literal)));
        }
        if chars.peek() == Some(&'(') {
            chars.next();
            let mut key = String::new();
            let mut depth = 1;
            loop {
                match chars.next() {
                    Some('(') => {
                        depth += 1;
                        key.push('(');
                    }
                    Some(')') => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                        key.push(')');
                    }
                    Some(ch) => key.push(ch),
                    None => return Err("incomplete format key".to_string()),
                }
            }
            pieces.push(PercentPiece::Named(key, parse_printf_spec(&mut chars)?));
        } else {
            pieces.push(PercentPiece::Positional(parse_printf_spec(&mut chars)?));
        }
    }
    if !literal.is_empty() {
        pieces.push(PercentPiece::Literal(literal));
    }
    Ok(pieces)
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> Result<Option<usize>, String> {
    let mut number: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        let next = number
            .unwrap_or(0)
            .checked_mul(10)
            .and_then(|n| n.checked_add(digit as usize))
            .filter(|n| *n <= MAX_FIELD_WIDTH)
            .ok_or_else(|| format!("width or precision above {}", MAX_FIELD_WIDTH))?;
        number = Some(next);
        chars.next();
    }
    Ok(number)
}

fn parse_printf_spec(chars: &mut Peekable<Chars<'_>>) -> Result<PrintfSpec, String> {
    let mut flags = Flags::default();
    while let Some(&c) = chars.peek() {
        match c {
            '-' => flags.left = true,
            '0' => flags.zero = true,
            '+' => flags.plus = true,
            ' ' => flags.space = true,
            '#' => flags.alt = true,
            _ => break,
        }
        chars.next();
    }
    let width = take_number(chars)?;
    let precision = if chars.peek() == Some(&'.') {
        chars.next();
        Some(take_number(chars)?.unwrap_or(0))
    } else {
        None
    };
    // Length modifiers carry no meaning here
    while matches!(chars.peek(), Some('h' | 'l' | 'L')) {
        chars.next();
    }
    match chars.next() {
        Some(conversion) if PRINTF_CONVERSIONS.contains(conversion) => Ok(PrintfSpec {
            flags,
            width,
            precision,
            conversion,
        }),
        Some(other) => Err(format!("unsupported format character '{}'", other)),
        None => Err("incomplete format".to_string()),
    }
}

fn render_printf(spec: &PrintfSpec, value: &LogValue) -> Result<String, String> {
    let numeric = !matches!(spec.conversion, 's' | 'r' | 'c');
    let mut body = convert(spec.conversion, spec.precision, spec.flags.alt, value)?;
    if numeric {
        body = apply_sign(body, spec.flags.plus, spec.flags.space);
    }

    let width = spec.width.unwrap_or(0);
    let len = body.chars().count();
    if len >= width {
        return Ok(body);
    }
    let fill = width - len;
    Ok(if spec.flags.left {
        format!("{}{}", body, " ".repeat(fill))
    } else if spec.flags.zero && numeric && is_finite_body(&body) {
        zero_pad(&body, fill)
    } else {
        format!("{}{}", " ".repeat(fill), body)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BraceSpec {
    fill: char,
    align: Option<char>,
    sign: Option<char>,
    alt: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
    kind: Option<char>,
}

impl Default for BraceSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: None,
            sign: None,
            alt: false,
            zero: false,
            width: None,
            precision: None,
            kind: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BracePiece {
    Literal(String),
    Field {
        key: String,
        repr: bool,
        spec: BraceSpec,
    },
}

/// Parsed `{field}` template
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BraceTemplate {
    pieces: Vec<BracePiece>,
}

impl BraceTemplate {
    /// `{0}-{1}-{2} {3}:{4}:{5}`
    pub(crate) fn default_date_layout() -> Self {
        let field = |key: &str| BracePiece::Field {
            key: key.to_string(),
            repr: false,
            spec: BraceSpec::default(),
        };
        let literal = |text: &str| BracePiece::Literal(text.to_string());
        Self {
            pieces: vec![
                field("0"),
                literal("-"),
                field("1"),
                literal("-"),
                field("2"),
                literal(" "),
                field("3"),
                literal(":"),
                field("4"),
                literal(":"),
                field("5"),
            ],
        }
    }

    pub(crate) fn parse(template: &str) -> Result<Self, String> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    if !literal.is_empty() {
                        pieces.push(BracePiece::Literal(std::mem::take(&mut literal)));
                    }
                    let mut inner = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => {
                                return Err("nested replacement fields are not supported".to_string())
                            }
                            Some(ch) => inner.push(ch),
                            None => return Err("expected '}' before end of string".to_string()),
                        }
                    }
                    pieces.push(parse_brace_field(&inner)?);
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err("Single '}' encountered in format string".to_string()),
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            pieces.push(BracePiece::Literal(literal));
        }
        Ok(Self { pieces })
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        self.pieces.iter().filter_map(|piece| match piece {
            BracePiece::Field { key, .. } => Some(key.as_str()),
            BracePiece::Literal(_) => None,
        })
    }

    pub(crate) fn render<F>(&self, lookup: F) -> Result<String, String>
    where
        F: Fn(&str) -> Option<LogValue>,
    {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                BracePiece::Literal(text) => out.push_str(text),
                BracePiece::Field { key, repr, spec } => {
                    let value = lookup(key).ok_or_else(|| format!("unknown field '{}'", key))?;
                    out.push_str(&render_brace(spec, &value, *repr)?);
                }
            }
        }
        Ok(out)
    }
}

fn parse_brace_field(inner: &str) -> Result<BracePiece, String> {
    let (head, spec) = match inner.split_once(':') {
        Some((head, spec)) => (head, parse_brace_spec(spec)?),
        None => (inner, BraceSpec::default()),
    };
    let (key, repr) = match head.split_once('!') {
        Some((key, "r")) | Some((key, "a")) => (key, true),
        Some((key, "s")) => (key, false),
        Some((_, other)) => return Err(format!("Unknown conversion specifier {}", other)),
        None => (head, false),
    };
    if key.is_empty() {
        return Err("empty field name; automatic numbering is not supported".to_string());
    }
    Ok(BracePiece::Field {
        key: key.to_string(),
        repr,
        spec,
    })
}

fn is_align(c: char) -> bool {
    matches!(c, '<' | '>' | '^' | '=')
}

fn parse_brace_spec(spec: &str) -> Result<BraceSpec, String> {
    let chars: Vec<char> = spec.chars().collect();
    let mut out = BraceSpec::default();
    let mut i = 0;

    if chars.len() >= 2 && is_align(chars[1]) {
        out.fill = chars[0];
        out.align = Some(chars[1]);
        i = 2;
    } else if !chars.is_empty() && is_align(chars[0]) {
        out.align = Some(chars[0]);
        i = 1;
    }
    if i < chars.len() && matches!(chars[i], '+' | '-' | ' ') {
        out.sign = Some(chars[i]);
        i += 1;
    }
    if i < chars.len() && chars[i] == '#' {
        out.alt = true;
        i += 1;
    }
    if i < chars.len() && chars[i] == '0' {
        out.zero = true;
        i += 1;
    }
    let digits = |i: &mut usize| -> Result<Option<usize>, String> {
        let start = *i;
        while *i < chars.len() && chars[*i].is_ascii_digit() {
            *i += 1;
        }
        if start == *i {
            return Ok(None);
        }
        chars[start..*i]
            .iter()
            .collect::<String>()
            .parse::<usize>()
            .ok()
            .filter(|n| *n <= MAX_FIELD_WIDTH)
            .map(Some)
            .ok_or_else(|| format!("width or precision above {}", MAX_FIELD_WIDTH))
    };
    out.width = digits(&mut i)?;
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        out.precision =
            Some(digits(&mut i)?.ok_or_else(|| "Format specifier missing precision".to_string())?);
    }
    if i < chars.len() && BRACE_TYPES.contains(chars[i]) {
        out.kind = Some(chars[i]);
        i += 1;
    }
    if i != chars.len() {
        return Err(format!("Invalid format specifier '{}'", spec));
    }
    Ok(out)
}

fn render_brace(spec: &BraceSpec, value: &LogValue, repr: bool) -> Result<String, String> {
    let value = if repr {
        LogValue::Str(value.repr())
    } else {
        value.clone()
    };
    let numeric = match spec.kind {
        Some('s') => false,
        Some(_) => true,
        None => !matches!(value, LogValue::Str(_)),
    };

    let mut body = match (spec.kind, &value) {
        (None, LogValue::Float(f)) if spec.precision.is_some() => {
            general(*f, spec.precision, spec.alt, false)
        }
        (None, other) | (Some('s'), other) => truncate(other.to_string(), spec.precision),
        (Some(kind), other) => convert(kind, spec.precision, spec.alt, other)?,
    };
    if numeric {
        body = apply_sign(body, spec.sign == Some('+'), spec.sign == Some(' '));
    }

    let width = spec.width.unwrap_or(0);
    let len = body.chars().count();
    if len >= width {
        return Ok(body);
    }
    let fill = width - len;
    let (fill_char, align) = match spec.align {
        Some(align) => (spec.fill, align),
        None if spec.zero && numeric => ('0', '='),
        None if numeric => (' ', '>'),
        None => (' ', '<'),
    };
    let pad = |n: usize| fill_char.to_string().repeat(n);
    Ok(match align {
        '<' => format!("{}{}", body, pad(fill)),
        '^' => format!("{}{}{}", pad(fill / 2), body, pad(fill - fill / 2)),
        '=' if fill_char == '0' => zero_pad(&body, fill),
        '=' => {
            let split = sign_len(&body);
            format!("{}{}{}", &body[..split], pad(fill), &body[split..])
        }
        _ => format!("{}{}", pad(fill), body),
    })
}

fn convert(
    conversion: char,
    precision: Option<usize>,
    alt: bool,
    value: &LogValue,
) -> Result<String, String> {
    match conversion {
        's' => Ok(truncate(value.to_string(), precision)),
        'r' => Ok(truncate(value.repr(), precision)),
        'c' => match value {
            LogValue::Str(s) if s.chars().count() == 1 => Ok(s.clone()),
            other => other
                .as_i128()
                .and_then(|i| u32::try_from(i).ok())
                .and_then(char::from_u32)
                .map(String::from)
                .ok_or_else(|| "%c requires int or char".to_string()),
        },
        'd' | 'i' | 'u' => Ok(integer(value, conversion)?.to_string()),
        'x' | 'X' | 'o' => {
            let i = integer(value, conversion)?;
            let magnitude = i.unsigned_abs();
            let digits = match conversion {
                'x' => format!("{:x}", magnitude),
                'X' => format!("{:X}", magnitude),
                _ => format!("{:o}", magnitude),
            };
            let prefix = match (alt, conversion) {
                (false, _) => "",
                (true, 'x') => "0x",
                (true, 'X') => "0X",
                (true, _) => "0o",
            };
            let sign = if i < 0 { "-" } else { "" };
            Ok(format!("{}{}{}", sign, prefix, digits))
        }
        'f' | 'F' => {
            let f = float(value, conversion)?;
            Ok(non_finite(f, conversion == 'F').unwrap_or_else(|| {
                let p = precision.unwrap_or(6);
                let mut body = format!("{:.*}", p, f);
                if alt && p == 0 {
                    body.push('.');
                }
                body
            }))
        }
        'e' | 'E' => {
            let f = float(value, conversion)?;
            Ok(non_finite(f, conversion == 'E')
                .unwrap_or_else(|| exponent(f, precision.unwrap_or(6), conversion == 'E')))
        }
        'g' | 'G' => {
            let f = float(value, conversion)?;
            Ok(non_finite(f, conversion == 'G')
                .unwrap_or_else(|| general(f, precision, alt, conversion == 'G')))
        }
        other => Err(format!("unsupported format character '{}'", other)),
    }
}

fn integer(value: &LogValue, conversion: char) -> Result<i128, String> {
    value.as_i128().ok_or_else(|| {
        format!(
            "%{} format: a number is required, not {}",
            conversion,
            value.type_name()
        )
    })
}

fn float(value: &LogValue, conversion: char) -> Result<f64, String> {
    value.as_f64().ok_or_else(|| {
        format!(
            "%{} format: a real number is required, not {}",
            conversion,
            value.type_name()
        )
    })
}

fn non_finite(f: f64, upper: bool) -> Option<String> {
    let text = if f.is_nan() {
        "nan"
    } else if f == f64::INFINITY {
        "inf"
    } else if f == f64::NEG_INFINITY {
        "-inf"
    } else {
        return None;
    };
    Some(if upper {
        text.to_uppercase()
    } else {
        text.to_string()
    })
}

fn exponent(f: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, f);
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    format!(
        "{}{}{}{:02}",
        mantissa,
        if upper { 'E' } else { 'e' },
        if exp < 0 { '-' } else { '+' },
        exp.abs()
    )
}

fn general(f: f64, precision: Option<usize>, alt: bool, upper: bool) -> String {
    let p = precision.unwrap_or(6).max(1);
    if f == 0.0 {
        return if alt {
            format!("{:.*}", p - 1, 0.0)
        } else {
            "0".to_string()
        };
    }
    let sci = format!("{:.*e}", p - 1, f);
    let exp: i32 = sci
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    let body = if exp < -4 || exp >= p as i32 {
        exponent(f, p - 1, upper)
    } else {
        format!("{:.*}", (p as i32 - 1 - exp) as usize, f)
    };
    if alt {
        body
    } else {
        strip_trailing_zeros(&body)
    }
}

fn strip_trailing_zeros(body: &str) -> String {
    let trim = |mantissa: &str| -> String {
        if mantissa.contains('.') {
            mantissa
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        } else {
            mantissa.to_string()
        }
    };
    match body.find(['e', 'E']) {
        Some(idx) => format!("{}{}", trim(&body[..idx]), &body[idx..]),
        None => trim(body),
    }
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(p) => text.chars().take(p).collect(),
        None => text,
    }
}

fn apply_sign(body: String, plus: bool, space: bool) -> String {
    if body.starts_with('-') {
        body
    } else if plus {
        format!("+{}", body)
    } else if space {
        format!(" {}", body)
    } else {
        body
    }
}

fn sign_len(body: &str) -> usize {
    usize::from(body.starts_with(['-', '+', ' ']))
}

fn is_finite_body(body: &str) -> bool {
    !body.contains("inf") && !body.contains("nan") && !body.contains("INF") && !body.contains("NAN")
}

fn zero_pad(body: &str, fill: usize) -> String {
    let sign = sign_len(body);
    let rest = &body[sign..];
    let prefix = if rest.starts_with("0x") || rest.starts_with("0X") || rest.starts_with("0o") {
        2
    } else {
        0
    };
    let split = sign + prefix;
    format!("{}{}{}", &body[..split], "0".repeat(fill), &body[split..])
}
