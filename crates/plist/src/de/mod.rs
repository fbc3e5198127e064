//! Binding a [`Value`] tree into a destination type.
//!
//! [`ValueDeserializer`] is a `serde::Deserializer` that walks the
//! destination's shape in lock-step with the value tree:
//!
//! - scalars require the matching plist kind; integers are assigned with a
//!   truncating `as` cast, and integers widen into float destinations
//! - sequences require an `<array>` (or `<data>`, one element per byte)
//! - structs and maps require a `<dict>`
//!
//! Struct fields bind to the dictionary key serde resolved for them: the
//! `#[serde(rename = "...")]` value when present, otherwise the field's own
//! identifier, compared exactly. Keys without a field are ignored. A field
//! whose key is absent is never offered to the destination, so serde's own
//! missing-field rules apply: `Option` fields become `None`, and fields (or
//! structs) marked `#[serde(default)]` take their `Default` value.

use serde::de::{
    self, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess,
    Visitor,
};
use tracing::trace;

use crate::error::{PlistError, Result};
use crate::options::DecodeOptions;
use crate::value::{Dictionary, Value, format_date};

/// Deserializer that consumes an owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
    options: DecodeOptions,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        Self::with_options(value, DecodeOptions::default())
    }

    pub fn with_options(value: Value, options: DecodeOptions) -> Self {
        Self { value, options }
    }
}

impl<'de> IntoDeserializer<'de, PlistError> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

fn visit_array<'de, V>(items: Vec<Value>, options: DecodeOptions, visitor: V) -> Result<V::Value>
where
    V: Visitor<'de>,
{
    let len = items.len();
    let mut seq = ArrayAccess::new(items, options);
    let value = visitor.visit_seq(&mut seq)?;
    if seq.iter.len() == 0 {
        Ok(value)
    } else {
        Err(de::Error::invalid_length(len, &"fewer elements in array"))
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                match self.value {
                    // Narrowing assignment truncates.
                    Value::Integer(n) => visitor.$visit(n as $ty),
                    other => Err(other.invalid_type(&visitor)),
                }
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = PlistError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let options = self.options;
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Integer(n) => visitor.visit_i64(n),
            Value::Real(x) => visitor.visit_f64(x),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::Data(bytes) => visitor.visit_byte_buf(bytes),
            Value::Date(date) => visitor.visit_string(format_date(&date)),
            Value::Array(items) => visit_array(items, options, visitor),
            Value::Dictionary(dict) => visitor.visit_map(DictAccess::new(dict, options)),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Boolean(b) => visitor.visit_bool(b),
            other => Err(other.invalid_type(&visitor)),
        }
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Real(x) => visitor.visit_f32(x as f32),
            Value::Integer(n) => visitor.visit_f32(n as f32),
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Real(x) => visitor.visit_f64(x),
            Value::Integer(n) => visitor.visit_f64(n as f64),
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Date(date) => visitor.visit_string(format_date(&date)),
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Data(bytes) => visitor.visit_byte_buf(bytes),
            Value::String(s) => visitor.visit_string(s),
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        // plist has no null; a value that is present is always Some
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(PlistError::InvalidDestination(
            "`()` has no plist representation".to_string(),
        ))
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(PlistError::InvalidDestination(format!(
            "unit struct `{}` has no plist representation",
            name
        )))
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let options = self.options;
        match self.value {
            Value::Array(items) => visit_array(items, options, visitor),
            Value::Data(bytes) => {
                let items = bytes.into_iter().map(|b| Value::Integer(i64::from(b))).collect();
                visit_array(items, options, visitor)
            }
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let options = self.options;
        match self.value {
            Value::Dictionary(dict) => visitor.visit_map(DictAccess::new(dict, options)),
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let options = self.options;
        match self.value {
            Value::Dictionary(dict) => {
                for key in dict.keys().filter(|key| !fields.contains(&key.as_str())) {
                    trace!(key = %key, destination = name, "no field for key, ignoring");
                }
                visitor.visit_map(DictAccess::new(dict, options))
            }
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let options = self.options;
        match self.value {
            Value::String(variant) => {
                let variant: de::value::StringDeserializer<PlistError> =
                    variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            Value::Dictionary(dict) => {
                let mut entries = dict.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, value)), None) => visitor.visit_enum(VariantDeserializer {
                        variant,
                        value,
                        options,
                    }),
                    _ => Err(de::Error::invalid_type(
                        de::Unexpected::Map,
                        &"a dict with exactly one key",
                    )),
                }
            }
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            other => Err(other.invalid_type(&visitor)),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        drop(self);
        visitor.visit_unit()
    }
}

/// SeqAccess over the elements of an `<array>`.
struct ArrayAccess {
    iter: std::vec::IntoIter<Value>,
    index: usize,
    options: DecodeOptions,
}

impl ArrayAccess {
    fn new(items: Vec<Value>, options: DecodeOptions) -> Self {
        Self {
            iter: items.into_iter(),
            index: 0,
            options,
        }
    }
}

impl<'de> SeqAccess<'de> for ArrayAccess {
    type Error = PlistError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        let Some(value) = self.iter.next() else {
            return Ok(None);
        };
        let index = self.index;
        self.index += 1;
        seed.deserialize(ValueDeserializer::with_options(value, self.options))
            .map(Some)
            .map_err(|err| err.at_index(index))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// MapAccess over the entries of a `<dict>`.
struct DictAccess {
    entries: indexmap::map::IntoIter<String, Value>,
    /// Entry whose value the next call to `next_value_seed` binds.
    pending: Option<(String, Value)>,
    options: DecodeOptions,
}

impl DictAccess {
    fn new(dict: Dictionary, options: DecodeOptions) -> Self {
        Self {
            entries: dict.into_iter(),
            pending: None,
            options,
        }
    }
}

impl<'de> MapAccess<'de> for DictAccess {
    type Error = PlistError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.entries.next() else {
            return Ok(None);
        };
        let result = seed
            .deserialize(de::value::StrDeserializer::<PlistError>::new(&key))
            .map_err(|err| err.at_key(key.as_str()));
        self.pending = Some((key, value));
        result.map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        match self.pending.take() {
            Some((key, value)) => seed
                .deserialize(ValueDeserializer::with_options(value, self.options))
                .map_err(|err| err.at_key(key)),
            None => Err(PlistError::Custom(
                "dict value requested before its key".to_string(),
            )),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// EnumAccess for a single-entry `<dict>` naming an enum variant.
struct VariantDeserializer {
    variant: String,
    value: Value,
    options: DecodeOptions,
}

impl<'de> EnumAccess<'de> for VariantDeserializer {
    type Error = PlistError;
    type Variant = ValueDeserializer;

    fn variant_seed<S>(self, seed: S) -> Result<(S::Value, ValueDeserializer)>
    where
        S: DeserializeSeed<'de>,
    {
        let variant =
            seed.deserialize(de::value::StrDeserializer::<PlistError>::new(&self.variant))?;
        Ok((
            variant,
            ValueDeserializer::with_options(self.value, self.options),
        ))
    }
}

impl<'de> VariantAccess<'de> for ValueDeserializer {
    type Error = PlistError;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_struct(self, "", fields, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn dict(entries: &[(&str, Value)]) -> Value {
        Value::Dictionary(
            entries
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_absent_keys_follow_serde_defaults() {
        #[derive(Debug, Deserialize)]
        struct Partial {
            present: i64,
            #[serde(default)]
            absent: Vec<String>,
            maybe: Option<bool>,
        }

        let value = dict(&[("present", Value::from(7))]);
        let partial = Partial::deserialize(ValueDeserializer::new(value)).unwrap();
        assert_eq!(partial.present, 7);
        assert!(partial.absent.is_empty());
        assert_eq!(partial.maybe, None);
    }

    #[test]
    fn test_integer_truncates_into_narrow_destination() {
        let n = u8::deserialize(ValueDeserializer::new(Value::Integer(300))).unwrap();
        assert_eq!(n, 44);
        let n = i16::deserialize(ValueDeserializer::new(Value::Integer(-1))).unwrap();
        assert_eq!(n, -1);
    }

    #[test]
    fn test_integer_widens_into_float() {
        let x = f64::deserialize(ValueDeserializer::new(Value::Integer(3))).unwrap();
        assert_eq!(x, 3.0);
    }

    #[test]
    fn test_real_into_integer_is_type_mismatch() {
        let err = i64::deserialize(ValueDeserializer::new(Value::Real(1.5))).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_tuple_rejects_extra_elements() {
        let value = Value::Array(vec![Value::from(1), Value::from(2), Value::from(3)]);
        let err = <(i64, i64)>::deserialize(ValueDeserializer::new(value)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_unit_is_invalid_destination() {
        let err = <()>::deserialize(ValueDeserializer::new(Value::from(true))).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidDestination);
    }

    #[test]
    fn test_dynamic_value_round_trips_tree() {
        let tree = dict(&[
            ("name", Value::from("rsc")),
            ("data", Value::Data(vec![0, 1, 2])),
            ("items", Value::Array(vec![Value::from(1.5), Value::from(false)])),
        ]);
        let value = Value::deserialize(ValueDeserializer::new(tree.clone())).unwrap();
        assert_eq!(value, tree);
    }
}
