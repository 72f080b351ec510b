//! Amounts in English words, as printed on receipts ("net pay in words").

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use workshop_core::numeric::{coerce_f64, round_for_display};

/// Currency name appended to every amount.
pub const DEFAULT_CURRENCY: &str = "Birr";

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

// Decimal tops out just under 8 × 10^28, so octillions are enough.
const SCALES: [&str; 10] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
    "sextillion",
    "septillion",
    "octillion",
];

fn below_hundred(n: u32) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    let tens = TENS[(n / 10) as usize];
    match n % 10 {
        0 => tens.to_string(),
        ones => format!("{tens}-{}", ONES[ones as usize]),
    }
}

fn below_thousand(n: u32) -> String {
    let hundreds = n / 100;
    let rest = n % 100;
    match (hundreds, rest) {
        (0, rest) => below_hundred(rest),
        (h, 0) => format!("{} hundred", ONES[h as usize]),
        (h, rest) => format!("{} hundred and {}", ONES[h as usize], below_hundred(rest)),
    }
}

/// Lower-case British English words for a whole number.
///
/// `404 → "four hundred and four"`, `1005 → "one thousand and five"`.
pub fn number_to_words(n: u128) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut chunks = Vec::new();
    let mut rest = n;
    while rest > 0 {
        chunks.push((rest % 1000) as u32);
        rest /= 1000;
    }

    let mut parts = Vec::new();
    for (scale, &chunk) in chunks.iter().enumerate().rev() {
        if chunk == 0 {
            continue;
        }
        if scale == 0 && chunk < 100 && n >= 1000 {
            parts.push("and".to_string());
        }
        let words = below_thousand(chunk);
        match SCALES[scale] {
            "" => parts.push(words),
            name => parts.push(format!("{words} {name}")),
        }
    }
    parts.join(" ")
}

/// Integer value of a non-negative, already truncated decimal.
fn integral_part(value: Decimal) -> u128 {
    let mut value = value;
    value.rescale(0);
    value.mantissa().unsigned_abs()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Words for an amount in the default currency.
///
/// `404.25 → "Four hundred and four and twenty-five Cents Birr"`, `0 → "Zero Birr"`.
pub fn amount_to_words(amount: Decimal) -> String {
    amount_to_words_in(amount, DEFAULT_CURRENCY)
}

/// Like [`amount_to_words`] for a float.
///
/// `NaN`, infinities and finite values beyond the `Decimal` range (about
/// ±7.9 × 10^28) all read as zero, so they print as "Zero Birr" with no sign.
pub fn amount_to_words_f64(amount: f64) -> String {
    amount_to_words(coerce_f64(amount))
}

/// Words for an amount followed by `currency`.
///
/// The amount is rounded to cents first. Cents are spelled out only when
/// non-zero. Negative amounts are prefixed with "minus".
pub fn amount_to_words_in(amount: Decimal, currency: &str) -> String {
    let rounded = round_for_display(amount.abs());
    let whole = rounded.trunc();
    let cents = ((rounded - whole) * Decimal::ONE_HUNDRED)
        .to_u32()
        .unwrap_or(0);
    let whole = integral_part(whole);

    let mut words = number_to_words(whole);
    if cents > 0 {
        words = format!("{words} and {} Cents", number_to_words(u128::from(cents)));
    }
    if amount.is_sign_negative() && (whole > 0 || cents > 0) {
        words = format!("minus {words}");
    }

    format!("{} {currency}", capitalize(&words))
}
