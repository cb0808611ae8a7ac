//! Lenient (de)serializers for the backend's JSON quirks.
//!
//! Monetary fields arrive either as JSON numbers or as decimal strings
//! (`"1500.00"`), and several timestamps are naive ISO strings that the
//! backend means as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn parse_amount<E: de::Error>(raw: NumberOrText) -> Result<f64, E> {
    match raw {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("invalid amount: {s:?}"))),
    }
}

/// Parse a backend timestamp. Accepts RFC 3339 and naive ISO 8601 (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// `f64` amount that may be encoded as a number or a decimal string.
pub mod amount {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        parse_amount(NumberOrText::deserialize(d)?)
    }

    pub fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(*value)
    }
}

/// Optional variant of [`amount`]. Pair with `#[serde(default)]`.
pub mod option_amount {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Option::<NumberOrText>::deserialize(d)?
            .map(parse_amount)
            .transpose()
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_some(v),
            None => s.serialize_none(),
        }
    }
}

pub mod timestamp {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}")))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }
}

/// Optional variant of [`timestamp`]. Pair with `#[serde(default)]`.
pub mod option_timestamp {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}"))),
            None => Ok(None),
        }
    }

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_some(&v.to_rfc3339()),
            None => s.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Money {
        #[serde(with = "amount")]
        total: f64,
        #[serde(default, with = "option_amount")]
        discount: Option<f64>,
    }

    #[test]
    fn amounts_accept_numbers_and_decimal_strings() {
        let m: Money = serde_json::from_str(r#"{"total": "1500.50", "discount": 20}"#).unwrap();
        assert_eq!(m.total, 1500.5);
        assert_eq!(m.discount, Some(20.0));

        let m: Money = serde_json::from_str(r#"{"total": 12}"#).unwrap();
        assert_eq!(m.total, 12.0);
        assert_eq!(m.discount, None);
    }

    #[test]
    fn amounts_reject_garbage() {
        assert!(serde_json::from_str::<Money>(r#"{"total": "lots"}"#).is_err());
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let ts = parse_timestamp("2025-03-01T10:15:30.123456").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2025, 3, 1));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (10, 15, 30));

        let plain = parse_timestamp("2025-03-01T10:15:30").unwrap();
        assert_eq!(plain.second(), 30);
    }

    #[test]
    fn offset_timestamps_are_normalized() {
        let ts = parse_timestamp("2025-03-01T10:00:00-06:00").unwrap();
        assert_eq!(ts.hour(), 16);
        assert!(parse_timestamp("yesterday").is_none());
    }
}
