//! Mapping a plist [`Value`] onto JSON.
//!
//! JSON has no date, binary or non-finite number types, so those are
//! rendered as RFC 3339 strings, standard base64 strings and `null`
//! respectively. Dictionary key order is preserved.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Number};

use crate::value::{Value, format_date};

/// Converts a plist value tree into a `serde_json::Value`.
///
/// # Examples
///
/// ```rust
/// use darwin_plist::{json::to_json_value, xml::value_from_str};
///
/// let value = value_from_str("<plist><dict><key>n</key><integer>7</integer></dict></plist>")?;
/// assert_eq!(to_json_value(&value), serde_json::json!({"n": 7}));
/// # Ok::<(), darwin_plist::PlistError>(())
/// ```
pub fn to_json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(n) => serde_json::Value::Number(Number::from(*n)),
        Value::Real(x) => Number::from_f64(*x)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Data(bytes) => serde_json::Value::String(STANDARD.encode(bytes)),
        Value::Date(date) => serde_json::Value::String(format_date(date)),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json_value).collect()),
        Value::Dictionary(dict) => serde_json::Value::Object(
            dict.iter()
                .map(|(key, value)| (key.clone(), to_json_value(value)))
                .collect::<Map<String, serde_json::Value>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(to_json_value(&Value::from("rsc")), json!("rsc"));
        assert_eq!(to_json_value(&Value::Integer(-3)), json!(-3));
        assert_eq!(to_json_value(&Value::Real(0.5)), json!(0.5));
        assert_eq!(to_json_value(&Value::Boolean(true)), json!(true));
    }

    #[test]
    fn test_non_finite_real_is_null() {
        assert_eq!(to_json_value(&Value::Real(f64::NAN)), json!(null));
        assert_eq!(to_json_value(&Value::Real(f64::INFINITY)), json!(null));
    }

    #[test]
    fn test_data_and_date_become_strings() {
        assert_eq!(
            to_json_value(&Value::Data(b"hello".to_vec())),
            json!("aGVsbG8=")
        );
        let date = Utc.with_ymd_and_hms(2011, 11, 27, 15, 0, 0).unwrap();
        assert_eq!(
            to_json_value(&Value::Date(date)),
            json!("2011-11-27T15:00:00Z")
        );
    }

    #[test]
    fn test_dictionary_keeps_key_order() {
        let mut dict = crate::Dictionary::new();
        dict.insert("zeta".to_string(), Value::from(1));
        dict.insert("alpha".to_string(), Value::Array(vec![Value::from(false)]));
        let json = to_json_value(&Value::Dictionary(dict));

        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
        assert_eq!(json["alpha"], json!([false]));
    }
}
