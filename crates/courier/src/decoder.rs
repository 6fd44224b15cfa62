//! Decoding of response bodies into typed values

use std::cell::RefCell;
use std::fmt::Debug;

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// How date literals are read by [`date`]-annotated fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateDecoding {
    /// RFC 3339 / ISO 8601 strings
    #[default]
    Iso8601,
    /// Numeric seconds since the Unix epoch
    SecondsSinceEpoch,
    /// Numeric milliseconds since the Unix epoch
    MillisecondsSinceEpoch,
    /// Strings in a `chrono` format, interpreted as UTC
    Formatted(String),
}

/// Turns body bytes into a value of the requested type
pub trait Decoder: Send + Sync + Debug {
    /// Decode `bytes` as `T`
    fn parse<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError>;
}

/// JSON [`Decoder`] backed by `serde_json`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonDecoder {
    date_decoding: DateDecoding,
}

impl JsonDecoder {
    /// Decoder reading dates with `date_decoding`
    pub fn new(date_decoding: DateDecoding) -> Self {
        Self { date_decoding }
    }

    /// Configured date strategy
    pub fn date_decoding(&self) -> &DateDecoding {
        &self.date_decoding
    }
}

impl Decoder for JsonDecoder {
    fn parse<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        let _scope = DateScope::enter(self.date_decoding.clone());
        serde_json::from_slice(bytes).map_err(DecodeError::from)
    }
}

thread_local! {
    static DATE_DECODING: RefCell<Option<DateDecoding>> = const { RefCell::new(None) };
}

/// Makes a strategy visible to [`date`] for the lifetime of the guard
struct DateScope {
    previous: Option<DateDecoding>,
}

impl DateScope {
    fn enter(strategy: DateDecoding) -> Self {
        let previous = DATE_DECODING.with(|cell| cell.replace(Some(strategy)));
        Self { previous }
    }
}

impl Drop for DateScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        DATE_DECODING.with(|cell| *cell.borrow_mut() = previous);
    }
}

fn current_date_decoding() -> DateDecoding {
    DATE_DECODING.with(|cell| cell.borrow().clone().unwrap_or_default())
}

/// Serde helpers for `chrono::DateTime<Utc>` fields
///
/// Used as `#[serde(with = "courier::decoder::date")]`. Inside
/// [`JsonDecoder::parse`] the decoder's [`DateDecoding`] applies, elsewhere
/// ISO 8601.
pub mod date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{current_date_decoding, DateDecoding};

    #[derive(Deserialize, Serialize)]
    #[serde(untagged)]
    enum DateLiteral {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    /// Serialize a date with the active strategy
    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        to_literal(date, &current_date_decoding()).serialize(serializer)
    }

    /// Deserialize a date with the active strategy
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let literal = DateLiteral::deserialize(deserializer)?;
        from_literal(literal, &current_date_decoding()).map_err(serde::de::Error::custom)
    }

    /// Same as the parent module for `Option<DateTime<Utc>>`
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        use super::{from_literal, to_literal, DateLiteral};
        use crate::decoder::current_date_decoding;

        /// Serialize an optional date
        pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            date.as_ref()
                .map(|date| to_literal(date, &current_date_decoding()))
                .serialize(serializer)
        }

        /// Deserialize an optional date, `null` becomes `None`
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<DateLiteral>::deserialize(deserializer)?
                .map(|literal| from_literal(literal, &current_date_decoding()))
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }

    fn to_literal(date: &DateTime<Utc>, strategy: &DateDecoding) -> DateLiteral {
        match strategy {
            DateDecoding::Iso8601 => DateLiteral::Text(date.to_rfc3339()),
            DateDecoding::SecondsSinceEpoch => DateLiteral::Integer(date.timestamp()),
            DateDecoding::MillisecondsSinceEpoch => DateLiteral::Integer(date.timestamp_millis()),
            DateDecoding::Formatted(format) => DateLiteral::Text(date.format(format).to_string()),
        }
    }

    fn from_literal(literal: DateLiteral, strategy: &DateDecoding) -> Result<DateTime<Utc>, String> {
        match (strategy, literal) {
            (DateDecoding::Iso8601, DateLiteral::Text(text)) => DateTime::parse_from_rfc3339(&text)
                .map(|date| date.with_timezone(&Utc))
                .map_err(|e| format!("Invalid ISO 8601 date {}: {}", text, e)),
            (DateDecoding::SecondsSinceEpoch, DateLiteral::Integer(secs)) => {
                from_fractional_secs(secs as f64)
            }
            (DateDecoding::SecondsSinceEpoch, DateLiteral::Float(secs)) => from_fractional_secs(secs),
            (DateDecoding::MillisecondsSinceEpoch, DateLiteral::Integer(millis)) => {
                DateTime::from_timestamp_millis(millis)
                    .ok_or_else(|| format!("Timestamp out of range: {}", millis))
            }
            (DateDecoding::MillisecondsSinceEpoch, DateLiteral::Float(millis)) => {
                from_fractional_secs(millis / 1000.0)
            }
            (DateDecoding::Formatted(format), DateLiteral::Text(text)) => {
                NaiveDateTime::parse_from_str(&text, format)
                    .or_else(|_| {
                        NaiveDate::parse_from_str(&text, format)
                            .map(|date| date.and_time(chrono::NaiveTime::MIN))
                    })
                    .map(|naive| naive.and_utc())
                    .map_err(|e| format!("Date {} does not match {}: {}", text, format, e))
            }
            (strategy, _) => Err(format!("Unexpected date literal for {:?}", strategy)),
        }
    }

    fn from_fractional_secs(secs: f64) -> Result<DateTime<Utc>, String> {
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
        DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
            .ok_or_else(|| format!("Timestamp out of range: {}", secs))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Model {
        name: String,
        age: i32,
        is_done: bool,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Event {
        #[serde(with = "crate::decoder::date")]
        at: DateTime<Utc>,
        #[serde(default, with = "crate::decoder::date::option")]
        until: Option<DateTime<Utc>>,
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 15, 12, 0, 0)
            .single()
            .expect("Valid date")
    }

    #[test]
    fn test_parse_valid_data() {
        let data = br#"{"name":"Gordon","age":10,"isDone": true}"#;
        let model: Model = JsonDecoder::default().parse(data).expect("Valid JSON");
        assert_eq!(
            model,
            Model {
                name: "Gordon".to_string(),
                age: 10,
                is_done: true
            }
        );
    }

    #[test]
    fn test_parse_invalid_data() {
        let result: Result<Model, _> = JsonDecoder::default().parse(b"invalid");
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_parse_round_trip() {
        let model = Model {
            name: "Alyx".to_string(),
            age: 22,
            is_done: false,
        };
        let bytes = serde_json::to_vec(&model).expect("Serializable");
        let parsed: Model = JsonDecoder::default().parse(&bytes).expect("Round trip");
        assert_eq!(parsed, model);
    }

    #[test]
    fn test_iso8601_dates() {
        let event: Event = JsonDecoder::default()
            .parse(br#"{"at":"2024-11-15T12:00:00Z","until":null}"#)
            .expect("ISO date");
        assert_eq!(event.at, noon());
        assert_eq!(event.until, None);
    }

    #[test]
    fn test_seconds_since_epoch() {
        let decoder = JsonDecoder::new(DateDecoding::SecondsSinceEpoch);
        let json = format!(r#"{{"at":{},"until":{}.5}}"#, noon().timestamp(), noon().timestamp());
        let event: Event = decoder.parse(json.as_bytes()).expect("Epoch seconds");

        assert_eq!(event.at, noon());
        assert_eq!(
            event.until.map(|d| d.timestamp_millis()),
            Some(noon().timestamp_millis() + 500)
        );
    }

    #[test]
    fn test_milliseconds_since_epoch() {
        let decoder = JsonDecoder::new(DateDecoding::MillisecondsSinceEpoch);
        let json = format!(r#"{{"at":{}}}"#, noon().timestamp_millis());
        let event: Event = decoder.parse(json.as_bytes()).expect("Epoch millis");
        assert_eq!(event.at, noon());
    }

    #[test]
    fn test_formatted_dates() {
        let decoder = JsonDecoder::new(DateDecoding::Formatted("%d/%m/%Y %H:%M".to_string()));
        let event: Event = decoder
            .parse(br#"{"at":"15/11/2024 12:00"}"#)
            .expect("Formatted date");
        assert_eq!(event.at, noon());

        let day_only = JsonDecoder::new(DateDecoding::Formatted("%Y-%m-%d".to_string()));
        let event: Event = day_only
            .parse(br#"{"at":"2024-11-15"}"#)
            .expect("Date without time");
        assert_eq!(event.at, noon() - chrono::Duration::hours(12));
    }

    #[test]
    fn test_wrong_literal_for_strategy() {
        let decoder = JsonDecoder::new(DateDecoding::SecondsSinceEpoch);
        let result: Result<Event, _> = decoder.parse(br#"{"at":"2024-11-15T12:00:00Z"}"#);
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_strategy_is_scoped_to_parse() {
        let decoder = JsonDecoder::new(DateDecoding::SecondsSinceEpoch);
        let _: Event = decoder.parse(br#"{"at":0}"#).expect("Epoch seconds");

        // Outside a parse call the default strategy applies again
        assert_eq!(current_date_decoding(), DateDecoding::Iso8601);
    }
}
