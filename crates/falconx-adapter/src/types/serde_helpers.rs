/*
[INPUT]:  Loosely typed JSON numbers and timestamps from the exchange
[OUTPUT]: Decimal and DateTime (de)serializers shared by request/response types
[POS]:    Data layer - serde adapters
[UPDATE]: When the exchange changes numeric or time encodings
*/

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

fn decimal_from_value<E: serde::de::Error>(value: &Value) -> Result<Option<Decimal>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) if raw.trim().is_empty() => Ok(None),
        Value::String(raw) => Decimal::from_str(raw.trim()).map(Some).map_err(E::custom),
        Value::Number(number) => {
            let raw = number.to_string();
            Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .map(Some)
                .map_err(E::custom)
        }
        _ => Err(E::custom("invalid decimal value")),
    }
}

/// Accept a decimal sent as a string or a number
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decimal_from_value(&value)?.ok_or_else(|| serde::de::Error::custom("missing decimal value"))
}

/// Accept a decimal sent as a string, a number, null or an empty string
pub fn deserialize_decimal_option<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decimal_from_value(&value)
}

pub fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn serialize_decimal_option<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(value) => serializer.serialize_str(&value.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Emit a decimal as a JSON number for fields the exchange reads as floats
pub fn serialize_decimal_option_as_number<S>(
    value: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.and_then(|value| value.to_f64()) {
        Some(number) => serializer.serialize_f64(number),
        None => serializer.serialize_none(),
    }
}

pub fn serialize_decimal_vec_as_number<S>(values: &[Decimal], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let numbers: Vec<f64> = values
        .iter()
        .map(|value| {
            value.to_f64().ok_or_else(|| {
                <S::Error as serde::ser::Error>::custom(format!("{value} out of f64 range"))
            })
        })
        .collect::<Result<_, S::Error>>()?;
    numbers.serialize(serializer)
}

/// Treat `null` as the type's default (e.g. an empty warnings list)
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 with whole seconds, the form the exchange accepts for time bounds
pub fn serialize_rfc3339<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "deserialize_decimal")]
        required: Decimal,
        #[serde(default, deserialize_with = "deserialize_decimal_option")]
        optional: Option<Decimal>,
    }

    #[test]
    fn test_decimal_accepts_string_and_number() {
        let from_str: Sample =
            serde_json::from_value(json!({"required": "12650.5", "optional": 3})).unwrap();
        assert_eq!(from_str.required, Decimal::from_str("12650.5").unwrap());
        assert_eq!(from_str.optional, Some(Decimal::from(3)));

        let from_num: Sample = serde_json::from_value(json!({"required": 8545.12})).unwrap();
        assert_eq!(from_num.required, Decimal::from_str("8545.12").unwrap());
        assert_eq!(from_num.optional, None);
    }

    #[test]
    fn test_decimal_option_null_and_empty() {
        let null: Sample =
            serde_json::from_value(json!({"required": "1", "optional": null})).unwrap();
        assert_eq!(null.optional, None);

        let empty: Sample =
            serde_json::from_value(json!({"required": "1", "optional": ""})).unwrap();
        assert_eq!(empty.optional, None);
    }

    #[test]
    fn test_required_decimal_rejects_null_and_garbage() {
        assert!(serde_json::from_value::<Sample>(json!({"required": null})).is_err());
        assert!(serde_json::from_value::<Sample>(json!({"required": "abc"})).is_err());
        assert!(serde_json::from_value::<Sample>(json!({"required": true})).is_err());
    }
}
