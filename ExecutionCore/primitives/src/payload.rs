//! Call payload decoding.
//!
//! Every entry point receives a single opaque payload. It must be a JSON
//! object; required string fields are extracted by name in declared order
//! and the first failing field determines the error. Unknown fields are
//! ignored. Decoding is pure: it never touches contract state.

use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::types::{FIELD_KEY, FIELD_MSG};

/// String fields extracted from a payload, in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFields {
    fields: Vec<(&'static str, String)>,
}

impl DecodedFields {
    /// Borrow a decoded field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Move a decoded field out.
    pub fn take(&mut self, name: &str) -> Option<String> {
        let idx = self.fields.iter().position(|(n, _)| *n == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse `payload` and extract every field in `required`.
pub fn decode_fields(
    payload: &[u8],
    required: &[&'static str],
) -> Result<DecodedFields, DecodeError> {
    let object = parse_object(payload)?;

    let mut fields = Vec::with_capacity(required.len());
    for &name in required {
        match object.get(name) {
            None => return Err(DecodeError::FieldMissing(name.to_string())),
            Some(Value::String(s)) => fields.push((name, s.clone())),
            Some(_) => return Err(DecodeError::FieldTypeMismatch(name.to_string())),
        }
    }
    Ok(DecodedFields { fields })
}

fn parse_object(payload: &[u8]) -> Result<Map<String, Value>, DecodeError> {
    let value: Value = serde_json::from_slice(payload)
        .map_err(|e| DecodeError::MalformedPayload(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::MalformedPayload(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decoded `CreateMsg` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMsgRequest {
    pub key: String,
    pub msg: String,
}

impl CreateMsgRequest {
    /// Decode requiring `msg` then `key`.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let mut fields = decode_fields(payload, &[FIELD_MSG, FIELD_KEY])?;
        let msg = fields
            .take(FIELD_MSG)
            .ok_or_else(|| DecodeError::FieldMissing(FIELD_MSG.to_string()))?;
        let key = fields
            .take(FIELD_KEY)
            .ok_or_else(|| DecodeError::FieldMissing(FIELD_KEY.to_string()))?;
        Ok(Self { key, msg })
    }
}

/// Decoded `GetMsg` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetMsgRequest {
    pub key: String,
}

impl GetMsgRequest {
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let mut fields = decode_fields(payload, &[FIELD_KEY])?;
        let key = fields
            .take(FIELD_KEY)
            .ok_or_else(|| DecodeError::FieldMissing(FIELD_KEY.to_string()))?;
        Ok(Self { key })
    }
}
