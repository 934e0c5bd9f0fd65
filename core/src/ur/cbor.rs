//! ur/cbor.rs
//! CBOR bodies: multi-part headers and byte-string message wrapping.

use bytes::Bytes;
use ciborium::value::{Integer, Value};

use crate::fountain::FountainPart;
use crate::ur::types::UrError;

pub fn to_cbor(value: &Value) -> Result<Vec<u8>, UrError> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(value, &mut out).map_err(|e| UrError::Cbor(e.to_string()))?;
    Ok(out)
}

pub fn from_cbor(bytes: &[u8]) -> Result<Value, UrError> {
    ciborium::de::from_reader(bytes).map_err(|e| UrError::Cbor(e.to_string()))
}

fn as_u32(value: &Value, field: &str) -> Result<u32, UrError> {
    value
        .as_integer()
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| UrError::Cbor(format!("{} is not a u32", field)))
}

/// Encode `[seqNum, seqLen, messageLen, checksum, data]`.
pub fn encode_part(part: &FountainPart) -> Result<Vec<u8>, UrError> {
    let value = Value::Array(vec![
        Value::Integer(Integer::from(part.seq_num)),
        Value::Integer(Integer::from(part.seq_len)),
        Value::Integer(Integer::from(part.message_len)),
        Value::Integer(Integer::from(part.checksum)),
        Value::Bytes(part.data.to_vec()),
    ]);
    to_cbor(&value)
}

pub fn decode_part(bytes: &[u8]) -> Result<FountainPart, UrError> {
    let value = from_cbor(bytes)?;
    let items = value
        .as_array()
        .ok_or_else(|| UrError::Cbor("part is not an array".into()))?;
    if items.len() != 5 {
        return Err(UrError::Cbor(format!("part has {} fields, expected 5", items.len())));
    }
    let data = items[4]
        .as_bytes()
        .ok_or_else(|| UrError::Cbor("fragment is not a byte string".into()))?;

    Ok(FountainPart {
        seq_num: as_u32(&items[0], "seqNum")?,
        seq_len: as_u32(&items[1], "seqLen")?,
        message_len: as_u32(&items[2], "messageLen")?,
        checksum: as_u32(&items[3], "checksum")?,
        data: Bytes::from(data.clone()),
    })
}

/// CBOR byte string around an opaque payload (`bytes`, `psbt`, `crypto-psbt`).
pub fn wrap_bytes(payload: &[u8]) -> Result<Vec<u8>, UrError> {
    to_cbor(&Value::Bytes(payload.to_vec()))
}

pub fn unwrap_bytes(message: &[u8]) -> Result<Vec<u8>, UrError> {
    match from_cbor(message)? {
        Value::Bytes(b) => Ok(b),
        _ => Err(UrError::Cbor("message is not a byte string".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_string_header_is_minimal() {
        assert_eq!(wrap_bytes(&[1, 2, 3]).unwrap(), vec![0x43, 1, 2, 3]);
        assert_eq!(unwrap_bytes(&[0x43, 1, 2, 3]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn part_header_layout() {
        let part = FountainPart {
            seq_num: 1,
            seq_len: 2,
            message_len: 3,
            checksum: 0x0102_0304,
            data: Bytes::from_static(&[0xAA, 0xBB]),
        };
        let cbor = encode_part(&part).unwrap();
        assert_eq!(
            cbor,
            vec![0x85, 0x01, 0x02, 0x03, 0x1A, 0x01, 0x02, 0x03, 0x04, 0x42, 0xAA, 0xBB]
        );
        assert_eq!(decode_part(&cbor).unwrap(), part);
    }

    #[test]
    fn non_array_part_is_rejected() {
        assert!(decode_part(&[0x43, 1, 2, 3]).is_err());
    }
}
