//! Lenient numeric coercion ("parse or zero").
//!
//! Cost forms hand over whatever the user typed. Nothing here ever fails:
//! anything that does not start with a number reads as zero, and a number
//! followed by junk keeps its numeric prefix (`"12kg"` reads as `12`).

use core::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Parse the leading decimal number of `input`, or return zero.
pub fn parse_or_zero(input: &str) -> Decimal {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < len && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_part = &s[int_start..pos];

    let mut frac_part = "";
    if pos < len && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_part = &s[frac_start..frac_end];
        pos = frac_end;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return Decimal::ZERO;
    }

    let mut exponent = None;
    if pos < len && matches!(bytes[pos], b'e' | b'E') {
        let mut e = pos + 1;
        if e < len && matches!(bytes[e], b'+' | b'-') {
            e += 1;
        }
        let digits_start = e;
        while e < len && bytes[e].is_ascii_digit() {
            e += 1;
        }
        if e > digits_start {
            exponent = Some(&s[pos + 1..e]);
        }
    }

    let mantissa = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
    );

    let Ok(mut value) = Decimal::from_str(&mantissa) else {
        return Decimal::ZERO;
    };
    if let Some(exp) = exponent {
        value = match scale_by_exponent(value, exp) {
            Some(v) => v,
            None => return Decimal::ZERO,
        };
    }
    value.normalize()
}

/// Apply a textual base-10 exponent; `None` when the result is not representable.
fn scale_by_exponent(mut value: Decimal, exp: &str) -> Option<Decimal> {
    let exp: i32 = exp.parse().ok()?;
    // Beyond 28 digits a Decimal either overflows or rounds to zero.
    if exp.unsigned_abs() > 28 {
        return if exp < 0 { Some(Decimal::ZERO) } else { None };
    }
    for _ in 0..exp.unsigned_abs() {
        value = if exp > 0 {
            value.checked_mul(Decimal::TEN)?
        } else {
            value.checked_div(Decimal::TEN)?
        };
    }
    Some(value)
}

/// Convert a float to a decimal; `NaN`, infinities and out-of-range values become zero.
pub fn coerce_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Clamp negatives to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Round to cents for display and persistence. Internal sums stay unrounded.
pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `serde` helpers that apply parse-or-zero while decoding form rows.
///
/// Use with `#[serde(default, deserialize_with = "...")]` so missing fields
/// read as zero / empty too.
pub mod lenient {
    use super::*;
    use core::fmt;
    use serde::de::{self, Deserializer, Visitor};

    /// Decode a number, numeric string, empty string, bool or `null` as a [`Decimal`].
    pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalVisitor)
    }

    /// Decode a string, number, bool or `null` as text (bools and `null` read as empty).
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TextVisitor)
    }

    /// Decode a checkbox value: a bool, `"true"`/`"yes"`/`"on"`/`"1"`, or a non-zero number.
    ///
    /// Anything else, `null` included, reads as `false`.
    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlagVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number, a numeric string or null")
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            Ok(coerce_f64(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            Ok(parse_or_zero(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }

        fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Decimal, D::Error> {
            decimal(d)
        }
    }

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, a number or null")
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<String, D::Error> {
            text(d)
        }
    }

    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a bool, a number, a string or null")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<bool, E> {
            Ok(v.is_finite() && v != 0.0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            Ok(matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1"
            ))
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<bool, D::Error> {
            flag(d)
        }
    }
}
