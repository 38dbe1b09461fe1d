//! Money amount parsing
//!
//! Invoices arrive with amounts in free text ("10EUR", "10€", "1.234,56");
//! this normalizes them into `Decimal`.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a money amount out of free text.
///
/// Commas are treated as decimal/grouping dots, the leading run of digits
/// and dots is taken, and every dot except the last is dropped as a
/// grouping separator. Trailing currency text is ignored. Returns `None`
/// when no amount can be extracted.
pub fn parse_money(raw: &str) -> Option<Decimal> {
    let normalized = raw.replace(',', ".");
    let digits: String = normalized
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if digits.is_empty() {
        return None;
    }

    let parts: Vec<&str> = digits.split('.').collect();
    let candidate = if parts.len() > 1 {
        format!("{}.{}", parts[..parts.len() - 1].concat(), parts[parts.len() - 1])
    } else {
        digits
    };

    Decimal::from_str(&candidate).ok()
}
