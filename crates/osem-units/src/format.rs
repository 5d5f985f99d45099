// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! printf-style value formats.
//!
//! Station configurations carry Python-style format strings such as
//! `%.1f` or `%03.0f hPa`. A [`FormatSpec`] holds exactly one numeric
//! conversion plus optional literal text around it:
//!
//! ```text
//! [prefix] % [flags -+ 0#] [width] [.precision] (f|F|d|i|e|E|g|G) [suffix]
//! ```
//!
//! `%%` is a literal percent sign anywhere in the literal text.

use crate::error::UnitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest accepted width or precision.
pub const MAX_FIELD_LEN: usize = 64;

/// Formats a measurement value for transport.
pub trait ValueFormat {
    /// Render `value` as a string.
    fn format_value(&self, value: f64) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Fixed { upper: bool },
    Integer,
    Exponent { upper: bool },
    General { upper: bool },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
}

/// Parsed printf-style format with one numeric conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormatSpec {
    source: String,
    prefix: String,
    suffix: String,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
}

impl FormatSpec {
    /// `%.<precision>f`
    pub fn fixed(precision: usize) -> Self {
        Self {
            source: format!("%.{}f", precision),
            prefix: String::new(),
            suffix: String::new(),
            flags: Flags::default(),
            width: None,
            precision: Some(precision),
            conversion: Conversion::Fixed { upper: false },
        }
    }

    /// Parse a printf-style format string.
    pub fn parse(spec: &str) -> Result<Self, UnitError> {
        let invalid = |reason: &str| UnitError::InvalidFormat {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut parsed: Option<(Flags, Option<usize>, Option<usize>, Conversion)> = None;
        let mut chars = spec.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                if parsed.is_some() {
                    suffix.push(c);
                } else {
                    prefix.push(c);
                }
                continue;
            }

            if chars.peek() == Some(&'%') {
                chars.next();
                if parsed.is_some() {
                    suffix.push('%');
                } else {
                    prefix.push('%');
                }
                continue;
            }

            if parsed.is_some() {
                return Err(invalid("more than one conversion"));
            }

            let mut flags = Flags::default();
            while let Some(&f) = chars.peek() {
                match f {
                    '-' => flags.left = true,
                    '+' => flags.plus = true,
                    ' ' => flags.space = true,
                    '0' => flags.zero = true,
                    '#' => flags.alternate = true,
                    _ => break,
                }
                chars.next();
            }

            let width = take_number(&mut chars);

            let precision = if chars.peek() == Some(&'.') {
                chars.next();
                Some(take_number(&mut chars).unwrap_or(0))
            } else {
                None
            };

            if width.is_some_and(|w| w > MAX_FIELD_LEN) {
                return Err(invalid(&format!("width exceeds {}", MAX_FIELD_LEN)));
            }
            if precision.is_some_and(|p| p > MAX_FIELD_LEN) {
                return Err(invalid(&format!("precision exceeds {}", MAX_FIELD_LEN)));
            }

            let conversion = match chars.next() {
                Some('f') => Conversion::Fixed { upper: false },
                Some('F') => Conversion::Fixed { upper: true },
                Some('d') | Some('i') => Conversion::Integer,
                Some('e') => Conversion::Exponent { upper: false },
                Some('E') => Conversion::Exponent { upper: true },
                Some('g') => Conversion::General { upper: false },
                Some('G') => Conversion::General { upper: true },
                Some(other) => {
                    return Err(invalid(&format!("unsupported conversion '{}'", other)))
                }
                None => return Err(invalid("incomplete conversion")),
            };

            parsed = Some((flags, width, precision, conversion));
        }

        let (flags, width, precision, conversion) =
            parsed.ok_or_else(|| invalid("no numeric conversion"))?;

        Ok(Self {
            source: spec.to_string(),
            prefix,
            suffix,
            flags,
            width,
            precision,
            conversion,
        })
    }

    /// The format string this spec was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn render_magnitude(&self, magnitude: f64) -> String {
        if magnitude.is_nan() {
            return self.case("nan");
        }
        if magnitude.is_infinite() {
            return self.case("inf");
        }

        match self.conversion {
            Conversion::Fixed { .. } => {
                let precision = self.precision.unwrap_or(6);
                let mut out = format!("{:.*}", precision, magnitude);
                if precision == 0 && self.flags.alternate {
                    out.push('.');
                }
                out
            }
            Conversion::Integer => {
                let digits = format!("{:.0}", magnitude.trunc());
                match self.precision {
                    Some(min) if digits.len() < min => {
                        format!("{}{}", "0".repeat(min - digits.len()), digits)
                    }
                    _ => digits,
                }
            }
            Conversion::Exponent { .. } => {
                let out = exponent_form(magnitude, self.precision.unwrap_or(6));
                self.case(&out)
            }
            Conversion::General { .. } => {
                let out = general_form(magnitude, self.precision.unwrap_or(6), self.flags.alternate);
                self.case(&out)
            }
        }
    }

    fn case(&self, s: &str) -> String {
        let upper = match self.conversion {
            Conversion::Fixed { upper }
            | Conversion::Exponent { upper }
            | Conversion::General { upper } => upper,
            Conversion::Integer => false,
        };
        if upper {
            s.to_ascii_uppercase()
        } else {
            s.to_string()
        }
    }
}

impl ValueFormat for FormatSpec {
    fn format_value(&self, value: f64) -> String {
        let body = self.render_magnitude(value.abs());
        let sign = if value.is_sign_negative() && !value.is_nan() {
            "-"
        } else if self.flags.plus {
            "+"
        } else if self.flags.space {
            " "
        } else {
            ""
        };

        let len = sign.chars().count() + body.chars().count();
        let padded = match self.width {
            Some(width) if width > len => {
                let pad = width - len;
                if self.flags.left {
                    format!("{}{}{}", sign, body, " ".repeat(pad))
                } else if self.flags.zero && value.is_finite() {
                    format!("{}{}{}", sign, "0".repeat(pad), body)
                } else {
                    format!("{}{}{}", " ".repeat(pad), sign, body)
                }
            }
            _ => format!("{}{}", sign, body),
        };

        format!("{}{}{}", self.prefix, padded, self.suffix)
    }
}

/// Read a decimal field. Overlong numbers saturate instead of wrapping.
fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(&c) = chars.peek() {
        let Some(digit) = c.to_digit(10) else {
            break;
        };
        let current = value.unwrap_or(0);
        value = Some(current.saturating_mul(10).saturating_add(digit as usize));
        chars.next();
    }
    value
}

/// Split Rust's `{:e}` output into mantissa and exponent.
fn split_exponent(magnitude: f64, precision: usize) -> (String, i32) {
    let raw = format!("{:.*e}", precision, magnitude);
    match raw.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (raw, 0),
    }
}

/// C-style exponent notation: `1.500000e+03`.
fn exponent_form(magnitude: f64, precision: usize) -> String {
    let (mantissa, exp) = split_exponent(magnitude, precision);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.abs())
}

/// C-style `%g`: shortest of fixed/exponent at `precision` significant
/// digits, trailing zeros removed unless `alternate`.
fn general_form(magnitude: f64, precision: usize, alternate: bool) -> String {
    let significant = precision.max(1);
    let exp = if magnitude == 0.0 {
        0
    } else {
        split_exponent(magnitude, significant - 1).1
    };

    if exp >= -4 && exp < significant as i32 {
        let decimals = (significant as i32 - 1 - exp).max(0) as usize;
        let out = format!("{:.*}", decimals, magnitude);
        if alternate {
            out
        } else {
            strip_trailing_zeros(&out)
        }
    } else {
        let (mantissa, exp) = split_exponent(magnitude, significant - 1);
        let mantissa = if alternate {
            mantissa
        } else {
            strip_trailing_zeros(&mantissa)
        };
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    }
}

fn strip_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for FormatSpec {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FormatSpec {
    type Error = UnitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<FormatSpec> for String {
    fn from(spec: FormatSpec) -> Self {
        spec.source
    }
}
