//! Pure display helpers: currency, dates, short strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_SLUG: &str = "item";
const ELLIPSIS: char = '…';
// 2^64, the first f64 above the u64 range.
const MAX_MINOR_UNITS: f64 = 18_446_744_073_709_551_616.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    pub symbol: String,
    pub position: SymbolPosition,
    /// Put a space between the symbol and the amount.
    pub spaced: bool,
    pub decimals: u32,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            position: SymbolPosition::Before,
            spaced: false,
            decimals: 2,
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

/// `1234.5` → `$1,234.50` with the default format.
///
/// Amounts whose scaled value does not fit a `u64` are clamped to
/// `u64::MAX` minor units; non-finite amounts format as zero.
pub fn format_currency(amount: f64, format: &CurrencyFormat) -> String {
    let decimals = format.decimals.min(9);
    let scale = 10u64.pow(decimals);
    let scaled = if amount.is_finite() {
        let minor_units = (amount.abs() * scale as f64).round();
        if minor_units >= MAX_MINOR_UNITS {
            u64::MAX
        } else {
            minor_units as u64
        }
    } else {
        0
    };
    let whole = scaled / scale;
    let fraction = scaled % scale;

    let mut number = group_thousands(whole, &format.thousands_separator);
    if decimals > 0 {
        number.push_str(&format.decimal_separator);
        number.push_str(&format!("{fraction:0width$}", width = decimals as usize));
    }

    let gap = if format.spaced { " " } else { "" };
    let body = match format.position {
        SymbolPosition::Before => format!("{}{gap}{number}", format.symbol),
        SymbolPosition::After => format!("{number}{gap}{}", format.symbol),
    };
    if amount < 0.0 && scaled > 0 {
        format!("-{body}")
    } else {
        body
    }
}

fn group_thousands(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// `Jan 5, 2026`
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// `Jan 5, 2026 14:03`
pub fn format_date_time(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %H:%M").to_string()
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

/// Cut `text` to at most `max_chars` characters, ending in `…` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(max_chars - 1).collect();
    cut.truncate(cut.trim_end().len());
    cut.push(ELLIPSIS);
    cut
}

pub fn slugify(input: &str) -> String {
    let mut slug = String::new();
    let mut previous_dash = false;

    for ch in input.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            previous_dash = false;
            continue;
        }
        if !slug.is_empty() && !previous_dash {
            slug.push('-');
            previous_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        slug
    }
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `pluralize(1, "item", "items")` → `1 item`
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    let noun = if count == 1 { singular } else { plural };
    format!("{count} {noun}")
}
