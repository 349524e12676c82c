//! Stack-driven canonical encoder.
//!
//! The value tree is walked with an explicit heap-backed stack. Map keys are
//! sorted into canonical order when their frame is pushed, so the insertion
//! order of the input tree never shows in the output bytes.
use std::slice;
use std::vec;

use byteorder::{BigEndian, ByteOrder};

use crate::alloc_util::{try_push, try_reserve, vec_with_capacity};
use crate::error::{Error, Result};
use crate::order;
use crate::token::{BYTES_KEY, LINK_KEY};
use crate::transcode;
use crate::value::{Link, Value, MAX_INTEGER, MIN_INTEGER};
use crate::varint::{write_head, MajorKind};

enum Frame<'a, L> {
    Array(slice::Iter<'a, Value<L>>),
    /// Entries pre-sorted into canonical key order.
    Map(vec::IntoIter<(&'a str, &'a Value<L>)>),
}

/// Encodes `value` into canonical bytes.
pub(crate) fn encode<L: Link>(value: &Value<L>, atjson: bool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    try_reserve(&mut out, 0x400)?;
    let mut stack: Vec<Frame<'_, L>> = Vec::new();
    // The root is walked as the sole element of a synthetic sequence.
    try_push(&mut stack, Frame::Array(slice::from_ref(value).iter()))?;

    while let Some(top) = stack.last_mut() {
        let next = match top {
            Frame::Array(items) => items.next(),
            Frame::Map(entries) => match entries.next() {
                Some((key, value)) => {
                    write_head(&mut out, MajorKind::TextString, key.len() as u64)?;
                    write_bytes(&mut out, key.as_bytes())?;
                    Some(value)
                }
                None => None,
            },
        };
        let Some(value) = next else {
            stack.pop();
            continue;
        };
        emit(value, &mut out, &mut stack, atjson)?;
    }
    Ok(out)
}

fn emit<'a, L: Link>(
    value: &'a Value<L>,
    out: &mut Vec<u8>,
    stack: &mut Vec<Frame<'a, L>>,
    atjson: bool,
) -> Result<()> {
    match value {
        Value::Null => write_byte(out, 0xf6),
        Value::Bool(true) => write_byte(out, 0xf5),
        Value::Bool(false) => write_byte(out, 0xf4),
        Value::Integer(num) => write_integer(out, *num),
        Value::Float(num) => write_float(out, *num),
        Value::String(text) => {
            write_head(out, MajorKind::TextString, text.len() as u64)?;
            write_bytes(out, text.as_bytes())
        }
        Value::Bytes(data) => {
            if atjson {
                return Err(Error::UnexpectedBytes);
            }
            write_head(out, MajorKind::ByteString, data.len() as u64)?;
            write_bytes(out, data)
        }
        Value::Link(link) => {
            if atjson {
                return Err(Error::UnexpectedLink);
            }
            write_link(out, &link.raw_bytes())
        }
        Value::List(items) => {
            write_head(out, MajorKind::Array, items.len() as u64)?;
            try_push(stack, Frame::Array(items.iter()))
        }
        Value::Map(map) => {
            if atjson && map.len() == 1 {
                if let Some(Value::String(text)) = map.get(LINK_KEY) {
                    return write_link(out, &transcode::base32_multibase_decode(text)?);
                }
                if let Some(Value::String(text)) = map.get(BYTES_KEY) {
                    let data = transcode::base64_decode(text)?;
                    write_head(out, MajorKind::ByteString, data.len() as u64)?;
                    return write_bytes(out, &data);
                }
            }
            let mut entries: Vec<(&str, &Value<L>)> = vec_with_capacity(map.len())?;
            entries.extend(map.iter().map(|(key, value)| (key.as_str(), value)));
            entries.sort_by(|a, b| order::cmp_keys(a.0, b.0));
            write_head(out, MajorKind::Map, entries.len() as u64)?;
            try_push(stack, Frame::Map(entries.into_iter()))
        }
    }
}

/// Tag 42 wrapping a byte string: the multibase identity prefix, then the
/// raw cid bytes.
fn write_link(out: &mut Vec<u8>, raw: &[u8]) -> Result<()> {
    write_head(out, MajorKind::Tag, 42)?;
    write_head(out, MajorKind::ByteString, raw.len() as u64 + 1)?;
    write_byte(out, 0x00)?;
    write_bytes(out, raw)
}

fn write_integer(out: &mut Vec<u8>, value: i128) -> Result<()> {
    if (0..=MAX_INTEGER).contains(&value) {
        write_head(out, MajorKind::UnsignedInt, value as u64)
    } else if (MIN_INTEGER..0).contains(&value) {
        write_head(out, MajorKind::NegativeInt, (-1 - value) as u64)
    } else {
        Err(Error::IntegerOutOfRange)
    }
}

fn write_float(out: &mut Vec<u8>, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::NonFiniteFloat);
    }
    let mut buf = [0xfb, 0, 0, 0, 0, 0, 0, 0, 0];
    BigEndian::write_f64(&mut buf[1..], value);
    write_bytes(out, &buf)
}

fn write_byte(out: &mut Vec<u8>, byte: u8) -> Result<()> {
    try_reserve(out, 1)?;
    out.push(byte);
    Ok(())
}

fn write_bytes(out: &mut Vec<u8>, data: &[u8]) -> Result<()> {
    try_reserve(out, data.len())?;
    out.extend_from_slice(data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use cid::Cid;

    use super::*;

    fn encode_plain(value: &Value<Cid>) -> Result<Vec<u8>> {
        encode(value, false)
    }

    #[test]
    fn integer_heads() {
        assert_eq!(encode_plain(&Value::Integer(0)).unwrap(), [0x00]);
        assert_eq!(encode_plain(&Value::Integer(23)).unwrap(), [0x17]);
        assert_eq!(encode_plain(&Value::Integer(24)).unwrap(), [0x18, 0x18]);
        assert_eq!(encode_plain(&Value::Integer(-1)).unwrap(), [0x20]);
        assert_eq!(
            encode_plain(&Value::Integer(-(1i128 << 64))).unwrap(),
            [0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
        assert_eq!(
            encode_plain(&Value::Integer((1i128 << 64) - 1)).unwrap(),
            [0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn out_of_range_integers() {
        assert_eq!(
            encode_plain(&Value::Integer(1i128 << 64)).unwrap_err(),
            Error::IntegerOutOfRange
        );
        assert_eq!(
            encode_plain(&Value::Integer(-(1i128 << 64) - 1)).unwrap_err(),
            Error::IntegerOutOfRange
        );
    }

    #[test]
    fn text() {
        assert_eq!(
            encode_plain(&Value::String("IETF".into())).unwrap(),
            [0x64, 0x49, 0x45, 0x54, 0x46]
        );
    }

    #[test]
    fn map_keys_sort_canonically() {
        let map = BTreeMap::from([
            ("b".to_string(), Value::Integer(1)),
            ("a".to_string(), Value::Integer(2)),
        ]);
        assert_eq!(
            encode_plain(&Value::Map(map)).unwrap(),
            [0xa2, 0x61, 0x61, 0x02, 0x61, 0x62, 0x01]
        );

        // Length beats lexicographic order: "b" sorts before "aa".
        let map = BTreeMap::from([
            ("aa".to_string(), Value::Integer(2)),
            ("b".to_string(), Value::Integer(1)),
        ]);
        assert_eq!(
            encode_plain(&Value::Map(map)).unwrap(),
            [0xa2, 0x61, 0x62, 0x01, 0x62, 0x61, 0x61, 0x02]
        );
    }

    #[test]
    fn floats_are_eight_bytes() {
        assert_eq!(
            encode_plain(&Value::Float(0.0)).unwrap(),
            [0xfb, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            encode_plain(&Value::Float(f64::NAN)).unwrap_err(),
            Error::NonFiniteFloat
        );
        assert_eq!(
            encode_plain(&Value::Float(f64::INFINITY)).unwrap_err(),
            Error::NonFiniteFloat
        );
        assert_eq!(
            encode_plain(&Value::Float(f64::NEG_INFINITY)).unwrap_err(),
            Error::NonFiniteFloat
        );
    }
}
