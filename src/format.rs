use chrono::NaiveDateTime;
use rand::Rng;
use serde::Deserialize;

const RECEIPT_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const RECEIPT_LEN: usize = 8;

/// Shown wherever an odds value has no meaningful conversion.
pub const NO_ODDS: &str = "—";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    Decimal,
    American,
    Fractional,
}

impl OddsFormat {
    pub fn all() -> &'static [(Self, &'static str)] {
        &[
            (Self::Decimal, "Decimal (1.75)"),
            (Self::American, "American (-133, +150)"),
            (Self::Fractional, "Fractional (3/4)"),
        ]
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::American => "american",
            Self::Fractional => "fractional",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().iter().map(|(f, _)| *f).find(|f| f.tag() == tag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Gbp,
    Usd,
    Eur,
}

impl Currency {
    pub const DEFAULT: Currency = Currency::Gbp;

    pub fn all() -> &'static [Currency] {
        &[Currency::Gbp, Currency::Usd, Currency::Eur]
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Gbp => "GBP",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Gbp => "£",
            Self::Usd => "$",
            Self::Eur => "€",
        }
    }

    /// Unknown codes degrade to [`Currency::DEFAULT`].
    pub fn from_code(code: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
            .unwrap_or(Self::DEFAULT)
    }

    /// `£1,234.56` style, minus sign ahead of the symbol.
    /// Non-finite amounts render as [`NO_ODDS`].
    pub fn format(self, amount: f64) -> String {
        if !amount.is_finite() {
            return NO_ODDS.into();
        }
        let fixed = format!("{:.2}", amount.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
        format!("{}{}{}.{}", sign, self.symbol(), group_thousands(whole), cents)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_currency(amount: f64, currency_code: &str) -> String {
    Currency::from_code(currency_code).format(amount)
}

/// Day/month/year, e.g. `07/03/2026`.
pub fn format_date(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// 24-hour clock, e.g. `19:45`.
pub fn format_time(at: &NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}

/// US short date, e.g. `3/7/26`.
pub fn format_date_us(at: &NaiveDateTime) -> String {
    at.format("%-m/%-d/%y").to_string()
}

/// US 12-hour clock, e.g. `7:45 PM`.
pub fn format_time_us(at: &NaiveDateTime) -> String {
    at.format("%-I:%M %p").to_string()
}

pub fn format_odds(decimal_odds: f64, format: OddsFormat) -> String {
    match format {
        OddsFormat::Decimal => format_decimal(decimal_odds),
        OddsFormat::American => format_american(decimal_odds),
        OddsFormat::Fractional => format_fractional(decimal_odds),
    }
}

pub fn format_decimal(d: f64) -> String {
    if !d.is_finite() {
        return NO_ODDS.into();
    }
    format!("{:.2}", d)
}

pub fn format_american(d: f64) -> String {
    // Anything at or below evens-of-nothing has no American price.
    if !d.is_finite() || d <= 1.0 {
        return NO_ODDS.into();
    }
    let b = d - 1.0;
    if d >= 2.0 {
        let n = (b * 100.0).round() as i64;
        format!("+{}", n)
    } else {
        let n = (-100.0 / b).round() as i64;
        format!("{}", n)
    }
}

pub fn format_fractional(d: f64) -> String {
    if !d.is_finite() || d <= 1.0 {
        return NO_ODDS.into();
    }
    let (num, den) = approx_fraction(d - 1.0, 100, 32);
    format!("{}/{}", num, den)
}

/// Continued-fraction approximation of `x` with denominator at most `max_den`.
fn approx_fraction(x: f64, max_den: i64, max_iter: u32) -> (i64, i64) {
    let mut rest = x;
    let mut a = rest.floor();
    let (mut h0, mut k0): (i64, i64) = (1, 0);
    let (mut h1, mut k1): (i64, i64) = (a as i64, 1);
    for _ in 0..max_iter {
        let frac = rest - a;
        if frac.abs() < 1e-9 {
            break;
        }
        rest = 1.0 / frac;
        a = rest.floor();
        let h2 = h0 + (a as i64) * h1;
        let k2 = k0 + (a as i64) * k1;
        if k2 > max_den {
            break;
        }
        h0 = h1;
        k0 = k1;
        h1 = h2;
        k1 = k2;
    }
    (h1, k1)
}

pub fn generate_receipt_number() -> String {
    receipt_number_from(&mut rand::thread_rng())
}

pub fn receipt_number_from<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..RECEIPT_LEN)
        .map(|_| RECEIPT_ALPHABET[rng.gen_range(0..RECEIPT_ALPHABET.len())] as char)
        .collect()
}

/// `bet365` → `bet365`, `My Book` → `my-book`.
pub fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
