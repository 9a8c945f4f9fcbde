//! Property encoding/decoding.
//!
//! A property is its name, a data type byte, then the kind's payload:
//! STRING and ENUM as length-prefixed UTF-8, NUMBER as a signed varint,
//! LOCATION as two signed varints (latitude, longitude).

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_STRING_LEN;
use crate::model::{DataType, Location, Property, Value};

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a Value of the given data type.
pub fn decode_value(reader: &mut Reader<'_>, data_type: DataType) -> Result<Value, DecodeError> {
    match data_type {
        DataType::String => Ok(Value::String(reader.read_string(MAX_STRING_LEN, "string_value")?)),
        DataType::Enum => Ok(Value::Enum(reader.read_string(MAX_STRING_LEN, "enum_value")?)),
        DataType::Number => Ok(Value::Number(reader.read_signed_varint("number_value")?)),
        DataType::Location => {
            let latitude = reader.read_signed_varint("location.latitude")?;
            let longitude = reader.read_signed_varint("location.longitude")?;
            Ok(Value::Location(Location { latitude, longitude }))
        }
    }
}

/// Decodes a named property.
pub fn decode_property(reader: &mut Reader<'_>) -> Result<Property, DecodeError> {
    let name = reader.read_string(MAX_STRING_LEN, "property.name")?;
    let dt_byte = reader.read_byte("property.data_type")?;
    let data_type =
        DataType::from_u8(dt_byte).ok_or(DecodeError::InvalidDataType { data_type: dt_byte })?;
    let value = decode_value(reader, data_type)?;
    Ok(Property { name, value })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a Value (without its data type byte).
pub fn encode_value(writer: &mut Writer, value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::String(s) => write_bounded(writer, s, "string_value")?,
        Value::Enum(s) => write_bounded(writer, s, "enum_value")?,
        Value::Number(n) => writer.write_signed_varint(*n),
        Value::Location(Location { latitude, longitude }) => {
            writer.write_signed_varint(*latitude);
            writer.write_signed_varint(*longitude);
        }
    }
    Ok(())
}

/// Encodes a named property.
pub fn encode_property(writer: &mut Writer, property: &Property) -> Result<(), EncodeError> {
    write_bounded(writer, &property.name, "property.name")?;
    writer.write_byte(property.data_type() as u8);
    encode_value(writer, &property.value)
}

pub(crate) fn write_bounded(
    writer: &mut Writer,
    s: &str,
    field: &'static str,
) -> Result<(), EncodeError> {
    if s.len() > MAX_STRING_LEN {
        return Err(EncodeError::LengthExceedsLimit {
            field,
            len: s.len(),
            max: MAX_STRING_LEN,
        });
    }
    writer.write_string(s);
    Ok(())
}
