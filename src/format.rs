//! Number and currency formatting for the price and converter panels
//!
//! Output follows en-US conventions: comma thousands separators, a dot
//! decimal separator and the currency sign in front of the amount.

/// Direction indicator of a percent change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
}

impl ChangeDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            ChangeDirection::Up => "▲",
            ChangeDirection::Down => "▼",
        }
    }
}

/// A rendered percent change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceChange {
    pub direction: ChangeDirection,
    pub text: String,
}

/// Formats `value` with thousands separators, keeping between `min_fraction`
/// and `max_fraction` decimal places.
pub fn format_grouped(value: f64, min_fraction: usize, max_fraction: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let max_fraction = max_fraction.max(min_fraction);
    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (fixed.as_str(), ""),
    };

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_fraction {
        frac.push('0');
    }

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Sign placed before amounts of the given ISO currency code
fn currency_prefix(code: &str) -> String {
    let code = code.to_ascii_uppercase();
    let sign = match code.as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "CN¥",
        "KRW" => "₩",
        "INR" => "₹",
        "BRL" => "R$",
        "AUD" => "A$",
        "CAD" => "CA$",
        _ => return format!("{}\u{a0}", code),
    };
    sign.to_string()
}

/// Number of decimals used for a price: cheap assets get sub-unit precision
pub fn price_decimals(price: f64) -> usize {
    if price < 1.0 {
        6
    } else {
        2
    }
}

/// Formats a price as currency text, e.g. `$43,250.50` or `$0.000012`
pub fn format_price(price: f64, currency: &str) -> String {
    let decimals = price_decimals(price);
    let number = format_grouped(price.abs(), decimals, decimals);
    let sign = if price < 0.0 { "-" } else { "" };
    format!("{}{}{}", sign, currency_prefix(currency), number)
}

/// Formats a 24h change with explicit sign and direction
pub fn format_change(change: f64) -> PriceChange {
    // -0.0 would otherwise print as "-0.00"
    let change = if change == 0.0 { 0.0 } else { change };
    let direction = if change >= 0.0 {
        ChangeDirection::Up
    } else {
        ChangeDirection::Down
    };
    let sign = if change >= 0.0 { "+" } else { "" };

    PriceChange {
        direction,
        text: format!("{}{:.2}%", sign, change),
    }
}

/// Formats a conversion result: crypto destinations keep up to 8 decimals
pub fn format_conversion_result(result: f64, destination_is_crypto: bool) -> String {
    if destination_is_crypto {
        format_grouped(result, 2, 8)
    } else {
        format_grouped(result, 2, 2)
    }
}

/// Formats a unit rate with 2 to 6 decimals
pub fn format_rate(rate: f64) -> String {
    format_grouped(rate, 2, 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimals_of(text: &str) -> usize {
        text.rsplit_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
    }

    #[test]
    fn test_format_price_large_and_small() {
        assert_eq!(format_price(43250.5, "usd"), "$43,250.50");
        assert_eq!(format_price(1.0, "usd"), "$1.00");
        assert_eq!(format_price(0.5, "usd"), "$0.500000");
        assert_eq!(format_price(0.00001234, "eur"), "€0.000012");
        assert_eq!(format_price(1234567.891, "gbp"), "£1,234,567.89");
    }

    #[test]
    fn test_format_price_decimal_places() {
        for price in [1.0, 1.5, 99.999_1, 2500.0, 64_123.456, 1e9] {
            assert_eq!(decimals_of(&format_price(price, "usd")), 2, "{price}");
        }
        for price in [0.999, 0.5, 0.1, 0.000_123, 0.000_001] {
            assert_eq!(decimals_of(&format_price(price, "usd")), 6, "{price}");
        }
    }

    #[test]
    fn test_format_price_unknown_currency_uses_code() {
        assert_eq!(format_price(92.5, "rub"), "RUB\u{a0}92.50");
    }

    #[test]
    fn test_format_change() {
        let up = format_change(2.5);
        assert_eq!(up.direction, ChangeDirection::Up);
        assert_eq!(up.text, "+2.50%");

        let down = format_change(-1.234);
        assert_eq!(down.direction, ChangeDirection::Down);
        assert_eq!(down.text, "-1.23%");

        let flat = format_change(-0.0);
        assert_eq!(flat.direction, ChangeDirection::Up);
        assert_eq!(flat.text, "+0.00%");
    }

    #[test]
    fn test_format_grouped_trims_to_minimum() {
        assert_eq!(format_grouped(0.5, 2, 8), "0.50");
        assert_eq!(format_grouped(0.00001542, 2, 8), "0.00001542");
        assert_eq!(format_grouped(64000.0, 2, 8), "64,000.00");
        assert_eq!(format_grouped(-1500.25, 2, 2), "-1,500.25");
        assert_eq!(format_grouped(123.0, 0, 0), "123");
    }

    #[test]
    fn test_conversion_result_precision() {
        assert_eq!(format_conversion_result(0.0000154321, true), "0.00001543");
        assert_eq!(format_conversion_result(64000.123, false), "64,000.12");
        assert_eq!(format_rate(0.0000154321), "0.000015");
        assert_eq!(format_rate(64000.0), "64,000.00");
    }
}
