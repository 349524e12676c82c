//! Encoding and decoding of the CBOR head and its argument.
//!
//! The argument rides in the low five bits of the head byte when it is below
//! 24, and otherwise in 1, 2, 4 or 8 big-endian bytes that follow. Both
//! directions insist on the smallest width that can hold the value.
use byteorder::{BigEndian, ByteOrder};

use crate::alloc_util::try_reserve;
use crate::error::{Error, Result};

/// The three bits at the top of every head byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub(crate) enum MajorKind {
    UnsignedInt = 0,
    NegativeInt = 1,
    ByteString = 2,
    TextString = 3,
    Array = 4,
    Map = 5,
    Tag = 6,
    Other = 7,
}

impl MajorKind {
    pub(crate) const fn from_head(head: u8) -> Self {
        match head >> 5 {
            0 => MajorKind::UnsignedInt,
            1 => MajorKind::NegativeInt,
            2 => MajorKind::ByteString,
            3 => MajorKind::TextString,
            4 => MajorKind::Array,
            5 => MajorKind::Map,
            6 => MajorKind::Tag,
            _ => MajorKind::Other,
        }
    }
}

/// Appends a head carrying `value` in the smallest width that holds it.
pub(crate) fn write_head(out: &mut Vec<u8>, major: MajorKind, value: u64) -> Result<()> {
    let major = (major as u8) << 5;
    let mut buf = [0u8; 9];
    let len = if value < 24 {
        buf[0] = major | value as u8;
        1
    } else if value < 0x100 {
        buf[0] = major | 24;
        buf[1] = value as u8;
        2
    } else if value < 0x10000 {
        buf[0] = major | 25;
        BigEndian::write_u16(&mut buf[1..3], value as u16);
        3
    } else if value < 0x1_0000_0000 {
        buf[0] = major | 26;
        BigEndian::write_u32(&mut buf[1..5], value as u32);
        5
    } else {
        buf[0] = major | 27;
        BigEndian::write_u64(&mut buf[1..9], value);
        9
    };
    try_reserve(out, len)?;
    out.extend_from_slice(&buf[..len]);
    Ok(())
}

/// Resolves the argument announced by the low five bits of a head.
///
/// `buf` starts right after the head byte. Returns the argument and the
/// number of additional bytes consumed.
pub(crate) fn read_argument(buf: &[u8], info: u8) -> Result<(u64, usize)> {
    match info {
        0..=23 => Ok((u64::from(info), 0)),
        24 => {
            let value = u64::from(*buf.first().ok_or(Error::TruncatedInput)?);
            if value < 24 {
                return Err(Error::NonMinimalInteger);
            }
            Ok((value, 1))
        }
        25 => {
            if buf.len() < 2 {
                return Err(Error::TruncatedInput);
            }
            let value = u64::from(BigEndian::read_u16(buf));
            if value < 0x100 {
                return Err(Error::NonMinimalInteger);
            }
            Ok((value, 2))
        }
        26 => {
            if buf.len() < 4 {
                return Err(Error::TruncatedInput);
            }
            let value = u64::from(BigEndian::read_u32(buf));
            if value < 0x10000 {
                return Err(Error::NonMinimalInteger);
            }
            Ok((value, 4))
        }
        27 => {
            if buf.len() < 8 {
                return Err(Error::TruncatedInput);
            }
            let value = BigEndian::read_u64(buf);
            if value < 0x1_0000_0000 {
                return Err(Error::NonMinimalInteger);
            }
            Ok((value, 8))
        }
        31 => Err(Error::IndefiniteLengthUnsupported),
        info => Err(Error::InvalidArgument(info)),
    }
}
