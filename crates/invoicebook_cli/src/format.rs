//! Display formatting for amounts and dates.

use chrono::{DateTime, NaiveDate, Utc};

/// Formats an amount as US dollars, e.g. `$1,234.50`.
pub fn format_usd(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (index, digit) in dollars.chars().enumerate() {
        if index > 0 && (dollars.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// `Jan 5, 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    format_date(timestamp.date_naive())
}

#[cfg(test)]
mod tests {
    use super::{format_date, format_usd};
    use chrono::NaiveDate;

    #[test]
    fn usd_groups_thousands_and_rounds_cents() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(500.0), "$500.00");
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_usd(19.999), "$20.00");
        assert_eq!(format_usd(-42.1), "-$42.10");
    }

    #[test]
    fn date_uses_short_month() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 5, 2024");
    }
}
