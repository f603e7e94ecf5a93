//! Checked conversion into the canonical universe.
//!
//! `serde_json::to_value` is too forgiving for identity work: it coerces
//! non-finite floats to null and stringifies integer mapping keys, so a
//! `NaN` would silently share a persisted key with a genuine null. This
//! module serializes directly into a canonical value and rejects anything
//! the universe cannot represent:
//!
//! - non-finite floats (`NaN`, infinities),
//! - mapping keys that are not strings (no stringification),
//! - integers outside the i64/u64 range.
//!
//! Everything else follows the usual JSON data model: unit and `None`
//! become null, unit enum variants become their name as a string, newtype
//! and struct variants become single-entry mappings, bytes become integer
//! sequences.

use serde::ser::{self, Impossible, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::HashError;

/// Convert any serializable value into the canonical universe, rejecting
/// out-of-universe input with [`HashError::UnsupportedType`].
pub fn to_canonical_value<T: Serialize>(value: &T) -> Result<Value, HashError> {
    value.serialize(ValueSerializer)
}

fn unsupported(reason: impl Into<String>) -> HashError {
    HashError::UnsupportedType {
        reason: reason.into(),
    }
}

fn key_must_be_string() -> HashError {
    unsupported("mapping key must be a string")
}

// ============================================================================
// VALUE SERIALIZER
// ============================================================================

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = HashError;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = VariantSeqSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = VariantMapSerializer;

    fn serialize_bool(self, v: bool) -> Result<Value, HashError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, HashError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, HashError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, HashError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, HashError> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, HashError> {
        if let Ok(i) = i64::try_from(v) {
            return self.serialize_i64(i);
        }
        if let Ok(u) = u64::try_from(v) {
            return self.serialize_u64(u);
        }
        Err(unsupported(format!("integer out of range: {v}")))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, HashError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, HashError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, HashError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, HashError> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, HashError> {
        match u64::try_from(v) {
            Ok(u) => self.serialize_u64(u),
            Err(_) => Err(unsupported(format!("integer out of range: {v}"))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value, HashError> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, HashError> {
        if !v.is_finite() {
            return Err(unsupported(format!("non-finite float: {v}")));
        }
        Number::from_f64(v)
            .map(Value::Number)
            .ok_or_else(|| unsupported(format!("unrepresentable float: {v}")))
    }

    fn serialize_char(self, v: char) -> Result<Value, HashError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, HashError> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, HashError> {
        Ok(Value::Array(v.iter().map(|&b| Value::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Value, HashError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, HashError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, HashError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, HashError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, HashError> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, HashError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, HashError> {
        let mut entries = Map::new();
        entries.insert(variant.to_owned(), value.serialize(ValueSerializer)?);
        Ok(Value::Object(entries))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, HashError> {
        Ok(SeqSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, HashError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, HashError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, HashError> {
        Ok(VariantSeqSerializer {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, HashError> {
        Ok(MapSerializer {
            entries: Map::new(),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, HashError> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, HashError> {
        Ok(VariantMapSerializer {
            variant,
            entries: Map::new(),
        })
    }
}

// ============================================================================
// COMPOSITE SERIALIZERS
// ============================================================================

struct SeqSerializer {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = HashError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), HashError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, HashError> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = HashError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), HashError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, HashError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = HashError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), HashError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, HashError> {
        ser::SerializeSeq::end(self)
    }
}

struct VariantSeqSerializer {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for VariantSeqSerializer {
    type Ok = Value;
    type Error = HashError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), HashError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, HashError> {
        let mut entries = Map::new();
        entries.insert(self.variant.to_owned(), Value::Array(self.items));
        Ok(Value::Object(entries))
    }
}

struct MapSerializer {
    entries: Map<String, Value>,
    next_key: Option<String>,
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = HashError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), HashError> {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), HashError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| unsupported("mapping value serialized before its key"))?;
        self.entries.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, HashError> {
        Ok(Value::Object(self.entries))
    }
}

impl ser::SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = HashError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), HashError> {
        self.entries
            .insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, HashError> {
        Ok(Value::Object(self.entries))
    }
}

struct VariantMapSerializer {
    variant: &'static str,
    entries: Map<String, Value>,
}

impl ser::SerializeStructVariant for VariantMapSerializer {
    type Ok = Value;
    type Error = HashError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), HashError> {
        self.entries
            .insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, HashError> {
        let mut outer = Map::new();
        outer.insert(self.variant.to_owned(), Value::Object(self.entries));
        Ok(Value::Object(outer))
    }
}

// ============================================================================
// MAP KEY SERIALIZER
// ============================================================================

/// Accepts only naturally string-shaped keys. Numeric, boolean, and
/// composite keys are rejected rather than stringified: `{1: "x"}` and
/// `{"1": "x"}` must never share an identity.
struct MapKeySerializer;

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = HashError;

    type SerializeSeq = Impossible<String, HashError>;
    type SerializeTuple = Impossible<String, HashError>;
    type SerializeTupleStruct = Impossible<String, HashError>;
    type SerializeTupleVariant = Impossible<String, HashError>;
    type SerializeMap = Impossible<String, HashError>;
    type SerializeStruct = Impossible<String, HashError>;
    type SerializeStructVariant = Impossible<String, HashError>;

    fn serialize_str(self, v: &str) -> Result<String, HashError> {
        Ok(v.to_owned())
    }

    fn serialize_char(self, v: char) -> Result<String, HashError> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, HashError> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, HashError> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_i8(self, _v: i8) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_i16(self, _v: i16) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_i32(self, _v: i32) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_i64(self, _v: i64) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_i128(self, _v: i128) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_u8(self, _v: u8) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_u16(self, _v: u16) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_u32(self, _v: u32) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_u64(self, _v: u64) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_u128(self, _v: u128) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_f64(self, _v: f64) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_none(self) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_unit(self) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, HashError> {
        Err(key_must_be_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, HashError> {
        Err(key_must_be_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
