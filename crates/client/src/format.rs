//! Display helpers shared by the views.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// `$1,234.50 USD`
pub fn money(amount: f64, currency: &str) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{:02} {currency}", cents % 100)
}

pub fn date(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}

/// Short id shown in tables.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(money(1234.5, "USD"), "$1,234.50 USD");
        assert_eq!(money(1_000_000.0, "MXN"), "$1,000,000.00 MXN");
        assert_eq!(money(12.0, "USD"), "$12.00 USD");
        assert_eq!(money(-3.456, "USD"), "-$3.46 USD");
    }

    #[test]
    fn short_ids() {
        assert_eq!(short_id("3f2b9c1e-aaaa"), "3f2b9c1e");
        assert_eq!(short_id("abc"), "abc");
    }
}
