use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Errors returned when parsing a resource quantity string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity must not be empty")]
    Empty,
    #[error("invalid quantity '{0}'")]
    Invalid(String),
    #[error("unknown suffix '{suffix}' in quantity '{input}'")]
    UnknownSuffix { input: String, suffix: String },
    #[error("quantity '{0}' is out of range")]
    OutOfRange(String),
}

/// How a quantity was written, and how it is rendered back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// `k`, `M`, `G`, ... and `m`/`u`/`n` fractions.
    #[default]
    DecimalSI,
    /// `Ki`, `Mi`, `Gi`, ...
    BinarySI,
    /// `1e3`, `5E-3`, ...
    DecimalExponent,
}

/// A Kubernetes resource quantity (`"256Mi"`, `"500m"`, `"2"`).
///
/// The value is held in milli-units, which is exact for CPU millicores and
/// memory bytes alike. Equality and ordering only look at the value, never
/// at the format it was written in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quantity {
    millis: i64,
    format: Format,
}

const BINARY_SUFFIXES: &[(&str, u32)] = &[
    ("Ki", 1),
    ("Mi", 2),
    ("Gi", 3),
    ("Ti", 4),
    ("Pi", 5),
    ("Ei", 6),
];

const DECIMAL_SUFFIXES: &[(&str, i32)] = &[
    ("n", -9),
    ("u", -6),
    ("m", -3),
    ("", 0),
    ("k", 3),
    ("M", 6),
    ("G", 9),
    ("T", 12),
    ("P", 15),
    ("E", 18),
];

impl Quantity {
    pub const fn zero() -> Self {
        Self {
            millis: 0,
            format: Format::DecimalSI,
        }
    }

    pub const fn from_millis(millis: i64, format: Format) -> Self {
        Self { millis, format }
    }

    /// Build a quantity from a whole number of base units (bytes, cores).
    pub fn from_value(value: i64, format: Format) -> Self {
        Self {
            millis: value.saturating_mul(1000),
            format,
        }
    }

    /// Exact value in milli-units.
    pub fn milli_value(&self) -> i64 {
        self.millis
    }

    /// Value in base units, rounded up to the next integer.
    pub fn value(&self) -> i64 {
        let q = self.millis / 1000;
        if self.millis % 1000 > 0 { q + 1 } else { q }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn is_zero(&self) -> bool {
        self.millis == 0
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

// Arithmetic keeps the left-hand format and saturates instead of wrapping.

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity {
            millis: self.millis.saturating_add(rhs.millis),
            format: self.format,
        }
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        if self.millis == 0 && self.format != rhs.format {
            self.format = rhs.format;
        }
        self.millis = self.millis.saturating_add(rhs.millis);
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity {
            millis: self.millis.saturating_sub(rhs.millis),
            format: self.format,
        }
    }
}

fn ceil_div(n: i128, d: i128) -> i128 {
    let q = n / d;
    if n % d > 0 { q + 1 } else { q }
}

fn pow10(exp: u32, input: &str) -> Result<i128, QuantityError> {
    10i128
        .checked_pow(exp)
        .ok_or_else(|| QuantityError::OutOfRange(input.to_string()))
}

/// Split `"-1.5Gi"` into `("-1.5", "Gi")`.
fn split_number(s: &str) -> (&str, &str) {
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '+' || c == '-'))))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s.split_at(end)
}

enum Scale {
    Binary(u32),
    Decimal(i32),
}

fn parse_suffix(input: &str, suffix: &str) -> Result<(Scale, Format), QuantityError> {
    if let Some(&(_, power)) = BINARY_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok((Scale::Binary(power), Format::BinarySI));
    }
    if let Some(&(_, exp)) = DECIMAL_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Ok((Scale::Decimal(exp), Format::DecimalSI));
    }
    if suffix.len() > 1
        && (suffix.starts_with('e') || suffix.starts_with('E'))
        && let Ok(exp) = suffix[1..].parse::<i32>()
    {
        return Ok((Scale::Decimal(exp), Format::DecimalExponent));
    }
    Err(QuantityError::UnknownSuffix {
        input: input.to_string(),
        suffix: suffix.to_string(),
    })
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let s = input.trim();
        if s.is_empty() {
            return Err(QuantityError::Empty);
        }

        let (number, suffix) = split_number(s);
        let (negative, digits) = match number.as_bytes().first() {
            Some(b'-') => (true, &number[1..]),
            Some(b'+') => (false, &number[1..]),
            _ => (false, number),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(QuantityError::Invalid(input.to_string()));
        }
        if whole.len() + fraction.len() > 30 {
            return Err(QuantityError::OutOfRange(input.to_string()));
        }

        let mut mantissa: i128 = 0;
        for c in whole.chars().chain(fraction.chars()) {
            let digit = c
                .to_digit(10)
                .ok_or_else(|| QuantityError::Invalid(input.to_string()))?;
            mantissa = mantissa * 10 + digit as i128;
        }

        let (scale, format) = parse_suffix(input, suffix)?;
        let out_of_range = || QuantityError::OutOfRange(input.to_string());
        let frac_len = fraction.len() as i32;
        let (multiplier, exp10) = match scale {
            Scale::Binary(power) => (1i128 << (10 * power), Some(3 - frac_len)),
            Scale::Decimal(exp) => (
                1i128,
                exp.checked_add(3).and_then(|e| e.checked_sub(frac_len)),
            ),
        };
        let exp10 = exp10.ok_or_else(out_of_range)?;

        let scaled = mantissa.checked_mul(multiplier).ok_or_else(out_of_range)?;
        let millis = if scaled == 0 {
            0
        } else if exp10 >= 0 {
            scaled
                .checked_mul(pow10(exp10.unsigned_abs(), input)?)
                .ok_or_else(out_of_range)?
        } else if exp10 < -38 {
            // Anything non-zero this small still rounds up to 1m.
            1
        } else {
            ceil_div(scaled, pow10(exp10.unsigned_abs(), input)?)
        };
        let millis = if negative { -millis } else { millis };
        let millis = i64::try_from(millis).map_err(|_| out_of_range())?;

        Ok(Quantity { millis, format })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis == 0 {
            return write!(f, "0");
        }
        if self.millis % 1000 != 0 {
            return write!(f, "{}m", self.millis);
        }
        let value = self.millis / 1000;
        match self.format {
            Format::BinarySI => {
                for (suffix, power) in BINARY_SUFFIXES.iter().rev() {
                    let unit = 1i64 << (10 * power);
                    if value % unit == 0 {
                        return write!(f, "{}{}", value / unit, suffix);
                    }
                }
                write!(f, "{}", value)
            }
            Format::DecimalSI => {
                for (suffix, exp) in DECIMAL_SUFFIXES.iter().rev().filter(|(_, e)| *e > 0) {
                    let unit = 10i64.pow(*exp as u32);
                    if value % unit == 0 {
                        return write!(f, "{}{}", value / unit, suffix);
                    }
                }
                write!(f, "{}", value)
            }
            Format::DecimalExponent => {
                for exp in [18u32, 15, 12, 9, 6, 3] {
                    let unit = 10i64.pow(exp);
                    if value % unit == 0 {
                        return write!(f, "{}e{}", value / unit, exp);
                    }
                }
                write!(f, "{}", value)
            }
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct QuantityVisitor;

impl Visitor<'_> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a resource quantity such as \"256Mi\", \"500m\" or 2")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
        Ok(Quantity::from_value(v, Format::DecimalSI))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(QuantityError::OutOfRange(v.to_string())))?;
        Ok(Quantity::from_value(v, Format::DecimalSI))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
        v.to_string().parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}
