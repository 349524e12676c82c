//! Stack-driven decoder.
//!
//! Containers are assembled on an explicit heap-backed stack instead of the
//! call stack, so adversarial nesting depth is bounded only by input size.
use std::collections::BTreeMap;

use crate::alloc_util::{copy_text, try_push, vec_with_capacity};
use crate::error::{Error, Result};
use crate::order;
use crate::token::{read_raw_string, read_token, Reader, Token};
use crate::value::{Link, Value};
use crate::varint::MajorKind;

enum Frame<'a, L> {
    Array {
        items: Vec<Value<L>>,
        remaining: u64,
    },
    Map {
        entries: BTreeMap<String, Value<L>>,
        remaining: u64,
        /// Raw bytes of the last key read, for the ordering check.
        prev_key: Option<&'a [u8]>,
        /// Key whose value is currently being read.
        pending_key: Option<String>,
    },
}

impl<L> Frame<'_, L> {
    fn new_array(count: u64) -> Result<Self> {
        Ok(Frame::Array {
            items: vec_with_capacity(count as usize)?,
            remaining: count,
        })
    }

    fn new_map(count: u64) -> Self {
        Frame::Map {
            entries: BTreeMap::new(),
            remaining: count,
            prev_key: None,
            pending_key: None,
        }
    }

    fn remaining(&self) -> u64 {
        match self {
            Frame::Array { remaining, .. } | Frame::Map { remaining, .. } => *remaining,
        }
    }

    /// Stores a completed child and consumes one slot of the declared count.
    fn attach(&mut self, value: Value<L>) {
        match self {
            Frame::Array { items, remaining } => {
                items.push(value);
                *remaining -= 1;
            }
            Frame::Map {
                entries,
                remaining,
                pending_key,
                ..
            } => {
                // The driver stores the key before any value can complete.
                if let Some(key) = pending_key.take() {
                    entries.insert(key, value);
                }
                *remaining -= 1;
            }
        }
    }

    fn finish(self) -> Value<L> {
        match self {
            Frame::Array { items, .. } => Value::List(items),
            Frame::Map { entries, .. } => Value::Map(entries),
        }
    }
}

/// Decodes exactly one item from the front of `data`.
///
/// Returns the value and the number of bytes it occupied. Trailing bytes are
/// not an error here; the caller decides whether they are acceptable.
pub(crate) fn decode<L: Link>(data: &[u8], atjson: bool) -> Result<(Value<L>, usize)> {
    let mut r = Reader::new(data);
    let mut stack: Vec<Frame<'_, L>> = Vec::new();
    // A value completed by the last step, waiting to be attached to the
    // innermost open container, or to be handed back as the result.
    let mut pending: Option<Value<L>> = None;

    loop {
        if let Some(value) = pending.take() {
            match stack.last_mut() {
                Some(top) => top.attach(value),
                None => return Ok((value, r.consumed())),
            }
        }

        if let Some(top) = stack.last() {
            if top.remaining() == 0 {
                if let Some(frame) = stack.pop() {
                    pending = Some(frame.finish());
                }
                continue;
            }
        }

        // Map children are keyed: read and validate the key first.
        if let Some(Frame::Map {
            prev_key,
            pending_key,
            ..
        }) = stack.last_mut()
        {
            let key_bytes = read_raw_string(&mut r, MajorKind::TextString, Error::InvalidMapKeyType)?;
            if let Some(prev) = *prev_key {
                if !order::strictly_increasing(prev, key_bytes) {
                    return Err(Error::NonCanonicalMapOrder);
                }
            }
            *prev_key = Some(key_bytes);
            let key = std::str::from_utf8(key_bytes).map_err(|_| Error::InvalidUtf8)?;
            *pending_key = Some(copy_text(key)?);
        }

        match read_token(&mut r, atjson)? {
            Token::Value(value) => pending = Some(value),
            Token::Array(count) => try_push(&mut stack, Frame::new_array(count)?)?,
            Token::Map(count) => try_push(&mut stack, Frame::new_map(count))?,
        }
    }
}
