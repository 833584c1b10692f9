use super::Formatted;
use super::parser::{self, MaskParseError};
use crate::text_edit;

/// Right-aligned fixed-point money mask, e.g. `R$ 1.234,50`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyFormat {
    symbol: String,
    thousands: char,
    radix: char,
    scale: u32,
    max_minor: u64,
}

impl CurrencyFormat {
    /// Separators must differ and neither they nor the symbol may contain
    /// digits, or the rendered text would not read back as the same amount.
    pub fn new(
        symbol: impl Into<String>,
        thousands: char,
        radix: char,
        scale: u32,
        max: f64,
    ) -> Result<Self, MaskParseError> {
        let symbol = symbol.into();
        parser::check_currency(symbol.as_str(), thousands, radix, scale, max)?;
        Ok(Self::unchecked(symbol, thousands, radix, scale, max))
    }

    /// Brazilian real: `R$ 9.999,99`, capped at 999.999.999,99.
    pub fn brl() -> Self {
        Self::unchecked("R$ ".to_string(), '.', ',', 2, 999_999_999.99)
    }

    fn unchecked(symbol: String, thousands: char, radix: char, scale: u32, max: f64) -> Self {
        let mut format = Self {
            symbol,
            thousands,
            radix,
            scale,
            max_minor: u64::MAX,
        };
        format.max_minor = format.to_minor(max);
        format
    }

    /// Number of digits the field accepts before it is full.
    pub fn capacity(&self) -> usize {
        digit_count(self.max_minor)
    }

    /// Reads the digits of `raw` as minor units: `"12345"` is `123,45`.
    /// Leading zeros are not significant and the field stops taking digits
    /// once the maximum would be exceeded.
    pub fn format(&self, raw: &str) -> Formatted {
        let mut digits: Vec<u8> = raw
            .chars()
            .filter_map(|ch| ch.to_digit(10))
            .map(|digit| digit as u8)
            .skip_while(|digit| *digit == 0)
            .take(self.capacity())
            .collect();

        while !digits.is_empty() && minor_from_digits(&digits) > self.max_minor {
            digits.pop();
        }

        if digits.is_empty() {
            return Formatted::default();
        }

        let significant = digits.len();
        let mut formatted = self.render_minor(minor_from_digits(&digits));
        formatted.significant_count = significant;
        formatted.complete = true;
        formatted
    }

    /// Renders an externally supplied amount canonically. Negative or
    /// non-finite amounts render as zero; large ones clamp to the maximum.
    pub fn render_amount(&self, amount: f64) -> Formatted {
        let minor = self.to_minor(amount);
        let mut formatted = self.render_minor(minor);
        formatted.significant_count = if minor == 0 { 0 } else { digit_count(minor) };
        formatted.complete = true;
        formatted
    }

    /// Accepts both `1234.5` and `R$ 1.234,50` shapes.
    pub fn parse_amount(&self, text: &str) -> Option<f64> {
        let body = text.trim();
        let body = body.strip_prefix(self.symbol.trim_end()).unwrap_or(body).trim();
        if body.is_empty() {
            return None;
        }

        let normalized: String = if body.contains(self.radix) {
            body.chars()
                .filter(|ch| *ch != self.thousands)
                .map(|ch| if ch == self.radix { '.' } else { ch })
                .collect()
        } else {
            body.to_string()
        };

        normalized.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    /// Numeric value of a rendered field, `0.0` when it does not parse.
    pub fn value_of(&self, text: &str) -> f64 {
        let body = text.trim();
        let body = body.strip_prefix(self.symbol.trim_end()).unwrap_or(body);
        let normalized: String = body
            .trim()
            .chars()
            .filter(|ch| *ch != self.thousands)
            .map(|ch| if ch == self.radix { '.' } else { ch })
            .collect();

        normalized
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }

    pub fn unmask(&self, text: &str) -> String {
        text.chars()
            .filter(char::is_ascii_digit)
            .skip_while(|ch| *ch == '0')
            .collect()
    }

    fn unit(&self) -> u64 {
        10u64.saturating_pow(self.scale)
    }

    fn to_minor(&self, amount: f64) -> u64 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0;
        }
        let minor = (amount * self.unit() as f64).round();
        if minor >= self.max_minor as f64 {
            return self.max_minor;
        }
        minor as u64
    }

    fn render_minor(&self, minor: u64) -> Formatted {
        let unit = self.unit();
        let integer = (minor / unit).to_string();
        let fraction = minor % unit;

        let mut text = self.symbol.clone();
        let grouped_len = integer.len();
        for (idx, ch) in integer.chars().enumerate() {
            if idx > 0 && (grouped_len - idx) % 3 == 0 {
                text.push(self.thousands);
            }
            text.push(ch);
        }
        if self.scale > 0 {
            text.push(self.radix);
            text.push_str(format!("{:0width$}", fraction, width = self.scale as usize).as_str());
        }

        let slot_starts = text
            .chars()
            .enumerate()
            .skip(text_edit::char_count(self.symbol.as_str()))
            .filter(|(_, ch)| ch.is_ascii_digit())
            .map(|(pos, _)| pos)
            .collect();

        Formatted {
            text,
            significant_count: 0,
            complete: false,
            slot_starts,
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::brl()
    }
}

fn minor_from_digits(digits: &[u8]) -> u64 {
    digits
        .iter()
        .fold(0u64, |acc, digit| acc.saturating_mul(10).saturating_add(*digit as u64))
}

fn digit_count(mut value: u64) -> usize {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}
