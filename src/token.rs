//! Single-token reader: one CBOR head plus any inline payload.
use std::collections::BTreeMap;

use byteorder::{BigEndian, ByteOrder};

use crate::alloc_util::{copy_bytes, copy_text};
use crate::error::{Error, Result};
use crate::transcode;
use crate::value::{Link, Value};
use crate::varint::{self, MajorKind};

/// Key wrapping base64 byte strings in atjson mode.
pub const BYTES_KEY: &str = "$bytes";
/// Key wrapping multibase links in atjson mode.
pub const LINK_KEY: &str = "$link";

/// Cursor over the input buffer.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub(crate) fn consumed(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Result<u8> {
        let byte = *self.data.get(self.pos).ok_or(Error::TruncatedInput)?;
        self.pos += 1;
        Ok(byte)
    }

    fn take(&mut self, len: u64) -> Result<&'a [u8]> {
        if len > self.remaining() as u64 {
            return Err(Error::TruncatedInput);
        }
        let start = self.pos;
        self.pos += len as usize;
        Ok(&self.data[start..self.pos])
    }

    fn read_argument(&mut self, info: u8) -> Result<u64> {
        let (value, used) = varint::read_argument(&self.data[self.pos..], info)?;
        self.pos += used;
        Ok(value)
    }

    /// Container guard: every child item consumes at least one byte, so a
    /// declared count beyond the remaining bytes can never complete.
    fn guard_count(&self, count: u64) -> Result<u64> {
        if count > self.remaining() as u64 {
            return Err(Error::TruncatedInput);
        }
        Ok(count)
    }
}

/// Outcome of reading one token: a finished value, or a container opened
/// with its declared child count.
pub(crate) enum Token<L> {
    Value(Value<L>),
    Array(u64),
    Map(u64),
}

/// Reads one head plus any inline payload.
pub(crate) fn read_token<L: Link>(r: &mut Reader<'_>, atjson: bool) -> Result<Token<L>> {
    let head = r.read_u8()?;
    let info = head & 0x1f;
    match MajorKind::from_head(head) {
        MajorKind::UnsignedInt => {
            let arg = r.read_argument(info)?;
            Ok(Token::Value(Value::Integer(i128::from(arg))))
        }
        MajorKind::NegativeInt => {
            let arg = r.read_argument(info)?;
            Ok(Token::Value(Value::Integer(-1 - i128::from(arg))))
        }
        MajorKind::ByteString => {
            let len = r.read_argument(info)?;
            let data = r.take(len)?;
            if atjson {
                Ok(Token::Value(wrap(
                    BYTES_KEY,
                    Value::String(transcode::base64_encode(data)),
                )))
            } else {
                Ok(Token::Value(Value::Bytes(copy_bytes(data)?)))
            }
        }
        MajorKind::TextString => {
            let len = r.read_argument(info)?;
            let data = r.take(len)?;
            let text = std::str::from_utf8(data).map_err(|_| Error::InvalidUtf8)?;
            Ok(Token::Value(Value::String(copy_text(text)?)))
        }
        MajorKind::Array => {
            let count = r.read_argument(info)?;
            Ok(Token::Array(r.guard_count(count)?))
        }
        MajorKind::Map => {
            let count = r.read_argument(info)?;
            Ok(Token::Map(r.guard_count(count)?))
        }
        MajorKind::Tag => {
            let tag = r.read_argument(info)?;
            read_link_body(r, tag, atjson)
        }
        MajorKind::Other => simple_or_float(r, info),
    }
}

/// Reads a head restricted to `expect` plus its body, returning the raw
/// body bytes. Used for map keys and the tag 42 payload.
pub(crate) fn read_raw_string<'a>(
    r: &mut Reader<'a>,
    expect: MajorKind,
    mismatch: Error,
) -> Result<&'a [u8]> {
    let head = r.read_u8()?;
    if MajorKind::from_head(head) != expect {
        return Err(mismatch);
    }
    let len = r.read_argument(head & 0x1f)?;
    r.take(len)
}

fn read_link_body<L: Link>(r: &mut Reader<'_>, tag: u64, atjson: bool) -> Result<Token<L>> {
    if tag != 42 {
        return Err(Error::UnsupportedTag(tag));
    }
    let payload = read_raw_string(r, MajorKind::ByteString, Error::InvalidCidFraming)?;
    let Some((&prefix, raw)) = payload.split_first() else {
        return Err(Error::InvalidCidFraming);
    };
    if prefix != 0 {
        return Err(Error::InvalidCidFraming);
    }
    if atjson {
        Ok(Token::Value(wrap(
            LINK_KEY,
            Value::String(transcode::base32_multibase_encode(raw)),
        )))
    } else {
        Ok(Token::Value(Value::Link(L::from_raw_bytes(raw)?)))
    }
}

fn simple_or_float<L>(r: &mut Reader<'_>, info: u8) -> Result<Token<L>> {
    match info {
        20 => Ok(Token::Value(Value::Bool(false))),
        21 => Ok(Token::Value(Value::Bool(true))),
        22 => Ok(Token::Value(Value::Null)),
        // 23 is "undefined", 24 announces a one-byte simple value.
        23 | 24 => Err(Error::InvalidSimpleValue(info)),
        25 | 26 => Err(Error::InvalidFloatWidth),
        27 => {
            let num = f64::from_bits(BigEndian::read_u64(r.take(8)?));
            if !num.is_finite() {
                return Err(Error::NonFiniteFloat);
            }
            Ok(Token::Value(Value::Float(num)))
        }
        info => Err(Error::InvalidArgument(info)),
    }
}

fn wrap<L>(key: &str, value: Value<L>) -> Value<L> {
    let mut map = BTreeMap::new();
    map.insert(key.to_string(), value);
    Value::Map(map)
}
