use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

/// Canonical team key.
///
/// Devices send `team_number` either as a JSON number or a string; every form
/// of the same integer (`7`, `"7"`, `7.0`, `"7.0"`, `"007"`) collapses to one
/// `Number`. Text that is not numeric at all is kept verbatim as `Name`.
/// Numbers order numerically at any width and come before every name; names
/// order lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TeamId {
    Number(Integer),
    Name(String),
}

/// Arbitrary-width decimal integer: sign plus digits without leading zeros.
/// Zero is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    negative: bool,
    digits: String,
}

impl Integer {
    fn new(negative: bool, digits: &str) -> Self {
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Self {
                negative: false,
                digits: "0".to_string(),
            };
        }
        Self {
            negative,
            digits: digits.to_string(),
        }
    }

    /// Parses `[+-]?[0-9]+`.
    fn parse(text: &str) -> Option<Self> {
        let (negative, digits) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::new(negative, digits))
    }

    /// Exact integer value of an integral, finite float.
    fn from_f64(f: f64) -> Option<Self> {
        if !f.is_finite() || f.fract() != 0.0 {
            return None;
        }
        Some(Self::new(f < 0.0, &format!("{:.0}", f.abs())))
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&self.digits)
    }
}

impl TeamId {
    /// Canonicalise a textual id. Integer text and integral float text become
    /// `Number`; non-numeric text becomes `Name`. Returns `None` for blank
    /// input and for numeric text with a fractional part.
    pub fn from_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Some(n) = Integer::parse(text) {
            return Some(TeamId::Number(n));
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Integer::from_f64(f).map(TeamId::Number),
            _ => Some(TeamId::Name(text.to_string())),
        }
    }

    /// Canonicalise a JSON number. Integral floats collapse to their integer;
    /// anything fractional is rejected.
    pub fn from_number(n: &serde_json::Number) -> Option<Self> {
        if n.is_i64() || n.is_u64() {
            return Integer::parse(&n.to_string()).map(TeamId::Number);
        }
        Integer::from_f64(n.as_f64()?).map(TeamId::Number)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamId::Number(n) => fmt::Display::fmt(n, f),
            TeamId::Name(s) => f.write_str(s),
        }
    }
}

impl Serialize for TeamId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<i64> for TeamId {
    fn from(n: i64) -> Self {
        TeamId::Number(Integer::new(n < 0, &n.unsigned_abs().to_string()))
    }
}
