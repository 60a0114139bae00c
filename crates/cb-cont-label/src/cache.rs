//! Binary cache codec for [`Label`].
//!
//! Layout (little-endian, no padding):
//!
//! ```text
//! count: u64
//! count × { action: u32, cost: f32, probability: f32, partial_prediction: f32 }
//! ```
//!
//! Every field is written individually so the format does not depend on the
//! in-memory layout of [`CostEntry`].

use std::io::{ErrorKind, Read, Write};

use crate::error::{LabelError, Result};
use crate::label::{CostEntry, Label};
use crate::obs;

/// Width of the record count prefix.
pub const COUNT_LEN: usize = 8;

/// Width of one cost record.
pub const RECORD_LEN: usize = 16;

/// Width of the declared-action prefix of an evaluation label.
pub const ACTION_LEN: usize = 4;

/// Upper bound on a decoded record count. Larger counts are treated as a
/// corrupt record rather than allocated.
pub const MAX_CACHED_ENTRIES: u64 = 1 << 24;

/// Encoded size of `label` in bytes.
pub fn encoded_len(label: &Label) -> usize {
    COUNT_LEN + RECORD_LEN * label.len()
}

/// Encode `label` into a fresh buffer.
pub fn encode_label(label: &Label) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(label));
    encode_label_into(&mut out, label);
    out
}

/// Append the encoding of `label` to `out`.
pub fn encode_label_into(out: &mut Vec<u8>, label: &Label) {
    out.reserve(encoded_len(label));
    out.extend_from_slice(&(label.len() as u64).to_le_bytes());
    for entry in &label.costs {
        out.extend_from_slice(&entry.action.to_le_bytes());
        out.extend_from_slice(&entry.cost.to_le_bytes());
        out.extend_from_slice(&entry.probability.to_le_bytes());
        out.extend_from_slice(&entry.partial_prediction.to_le_bytes());
    }
}

/// Write `label` to `w`, returning the number of bytes written.
pub fn write_label<W: Write>(w: &mut W, label: &Label) -> Result<usize> {
    let buf = encode_label(label);
    w.write_all(&buf)?;
    obs::emit_label_written(label.len(), buf.len());
    Ok(buf.len())
}

/// Read one label record from `r` into `label`, returning the bytes consumed.
///
/// The label is cleared first and stays empty if the record is short.
pub fn read_label<R: Read>(r: &mut R, label: &mut Label) -> Result<usize> {
    label.reset();

    let mut count_bytes = [0u8; COUNT_LEN];
    let got = read_full(r, &mut count_bytes)?;
    if got < COUNT_LEN {
        return Err(truncated(COUNT_LEN, got));
    }
    let count = checked_count(u64::from_le_bytes(count_bytes))?;

    let body_len = count * RECORD_LEN;
    let mut body = vec![0u8; body_len];
    let got = read_full(r, &mut body)?;
    if got < body_len {
        return Err(truncated(COUNT_LEN + body_len, COUNT_LEN + got));
    }

    let mut c = Cursor::new(&body);
    label.costs.reserve(count);
    for _ in 0..count {
        label.costs.push(c.read_entry()?);
    }

    let consumed = COUNT_LEN + body_len;
    obs::emit_label_read(count, consumed);
    Ok(consumed)
}

/// Decode one label record from the front of `bytes`.
///
/// Returns the label and the number of bytes consumed.
pub fn decode_label(bytes: &[u8]) -> Result<(Label, usize)> {
    let mut c = Cursor::new(bytes);
    let label = c.read_label()?;
    Ok((label, c.off))
}

pub(crate) fn write_action<W: Write>(w: &mut W, action: u32) -> Result<usize> {
    w.write_all(&action.to_le_bytes())?;
    Ok(ACTION_LEN)
}

pub(crate) fn read_action<R: Read>(r: &mut R) -> Result<u32> {
    let mut b = [0u8; ACTION_LEN];
    let got = read_full(r, &mut b)?;
    if got < ACTION_LEN {
        return Err(truncated(ACTION_LEN, got));
    }
    Ok(u32::from_le_bytes(b))
}

fn checked_count(count: u64) -> Result<usize> {
    if count > MAX_CACHED_ENTRIES {
        // Not positioned on a record; no stream could satisfy this count.
        let needed = usize::try_from(count)
            .ok()
            .and_then(|c| c.checked_mul(RECORD_LEN))
            .and_then(|b| b.checked_add(COUNT_LEN))
            .unwrap_or(usize::MAX);
        return Err(truncated(needed, COUNT_LEN));
    }
    Ok(count as usize)
}

fn truncated(needed: usize, got: usize) -> LabelError {
    obs::emit_cache_truncated(needed, got);
    LabelError::TruncatedCache { needed, got }
}

/// Fill `buf` from `r`, stopping early only at EOF. Returns the bytes read.
fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut off = 0usize;
    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(off)
}

pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pub(crate) off: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, off: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.off + n > self.bytes.len() {
            return Err(truncated(self.off + n, self.bytes.len()));
        }
        let s = &self.bytes[self.off..self.off + n];
        self.off += n;
        Ok(s)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn read_f32(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_entry(&mut self) -> Result<CostEntry> {
        Ok(CostEntry {
            action: self.read_u32()?,
            cost: self.read_f32()?,
            probability: self.read_f32()?,
            partial_prediction: self.read_f32()?,
        })
    }

    pub(crate) fn read_label(&mut self) -> Result<Label> {
        let count = checked_count(self.read_u64()?)?;
        let remaining = self.bytes.len() - self.off;
        if remaining < count * RECORD_LEN {
            return Err(truncated(self.off + count * RECORD_LEN, self.bytes.len()));
        }
        let mut costs = Vec::with_capacity(count);
        for _ in 0..count {
            costs.push(self.read_entry()?);
        }
        Ok(Label { costs })
    }
}
