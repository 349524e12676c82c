//! The value tree produced and consumed by the codec.
use std::collections::BTreeMap;

use cid::Cid;

use crate::error::{Error, Result};

/// Smallest integer representable on the wire, `-2^64`.
pub const MIN_INTEGER: i128 = -(1i128 << 64);
/// Largest integer representable on the wire, `2^64 - 1`.
pub const MAX_INTEGER: i128 = (1i128 << 64) - 1;

/// Capability interface for the content identifiers carried by tag 42.
///
/// The codec never looks inside a link; it only moves raw cid bytes in and
/// out. `raw` excludes the multibase identity prefix (`0x00`) that frames
/// the cid on the wire.
pub trait Link: Sized {
    /// Builds a link from raw cid bytes.
    fn from_raw_bytes(raw: &[u8]) -> Result<Self>;
    /// Returns the raw cid bytes.
    fn raw_bytes(&self) -> Vec<u8>;
}

impl Link for Cid {
    fn from_raw_bytes(raw: &[u8]) -> Result<Self> {
        Cid::try_from(raw).map_err(|e| Error::InvalidCid(e.to_string()))
    }

    fn raw_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

/// A DAG-CBOR value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<L = Cid> {
    /// Represents the absence of a value.
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents an integer in `[-2^64, 2^64 - 1]`.
    Integer(i128),
    /// Represents a 64-bit floating point value.
    Float(f64),
    /// Represents an UTF-8 string.
    String(String),
    /// Represents a sequence of bytes.
    Bytes(Vec<u8>),
    /// Represents a list.
    List(Vec<Value<L>>),
    /// Represents a map with string keys.
    Map(BTreeMap<String, Value<L>>),
    /// Represents a link to another document.
    Link(L),
}

macro_rules! derive_into_value {
    ($variant:ident, $ty:ty, $($fn:ident),*) => {
        impl<L> From<$ty> for Value<L> {
            fn from(t: $ty) -> Self {
                Value::$variant(t$(.$fn())*)
            }
        }
    };
}

macro_rules! derive_into_value_prim {
    ($variant:ident, $ty:ty) => {
        impl<L> From<$ty> for Value<L> {
            fn from(t: $ty) -> Self {
                Value::$variant(t as _)
            }
        }
    };
}

derive_into_value!(Bool, bool, clone);
derive_into_value_prim!(Integer, i8);
derive_into_value_prim!(Integer, i16);
derive_into_value_prim!(Integer, i32);
derive_into_value_prim!(Integer, i64);
derive_into_value_prim!(Integer, i128);
derive_into_value_prim!(Integer, u8);
derive_into_value_prim!(Integer, u16);
derive_into_value_prim!(Integer, u32);
derive_into_value_prim!(Integer, u64);
derive_into_value_prim!(Float, f32);
derive_into_value_prim!(Float, f64);
derive_into_value!(String, String, into);
derive_into_value!(String, &str, to_string);
derive_into_value!(Bytes, Vec<u8>, into);
derive_into_value!(Bytes, &[u8], to_vec);

impl<L> From<Vec<Value<L>>> for Value<L> {
    fn from(list: Vec<Value<L>>) -> Self {
        Value::List(list)
    }
}

impl<L> From<BTreeMap<String, Value<L>>> for Value<L> {
    fn from(map: BTreeMap<String, Value<L>>) -> Self {
        Value::Map(map)
    }
}

impl From<Cid> for Value<Cid> {
    fn from(cid: Cid) -> Self {
        Value::Link(cid)
    }
}
