//! Binary property list (`bplist00`) decoder.
//!
//! ## Layout
//!
//! ```text
//! [magic "bplist00"] [objects...] [offset table] [trailer: 32 bytes]
//! ```
//!
//! The trailer holds, big-endian:
//! - byte 6: width of an offset table entry
//! - byte 7: width of an object reference
//! - bytes 8..16: object count
//! - bytes 16..24: index of the top object
//! - bytes 24..32: position of the offset table
//!
//! Each object starts with a marker byte whose high nibble is the type and
//! whose low nibble is a size, with `0xF` meaning "an integer object follows
//! holding the real size":
//! - 0x00: null, 0x08: false, 0x09: true, 0x0F: fill
//! - 0x1n: integer of 2^n bytes
//! - 0x2n: real of 2^n bytes
//! - 0x33: date (8-byte real, seconds since 2001-01-01)
//! - 0x4n: data, 0x5n: ASCII string, 0x6n: UTF-16BE string, 0x7n: UTF-8 string
//! - 0x8n: UID
//! - 0xAn: array, 0xBn: ordered set, 0xCn: set (n object references)
//! - 0xDn: dict (n key references, then n value references)
//!
//! UIDs and sets have no counterpart in the value model and decode to `Null`.

use crate::MAX_NESTING;
use plistab_core::{Error, PlistMap, Result, Value};

/// Leading bytes of every binary property list.
pub const MAGIC: &[u8] = b"bplist00";

const FORMAT: &str = "binary";
const TRAILER_LEN: usize = 32;

#[derive(Debug)]
struct Trailer {
    offset_size: usize,
    ref_size: usize,
    num_objects: usize,
    top_object: usize,
    offset_table: usize,
}

/// Decodes a binary property list into a value tree.
///
/// Objects referenced more than once are decoded once and shared.
pub fn parse(data: &[u8]) -> Result<Value> {
    let trailer = read_trailer(data)?;
    let top = trailer.top_object;
    let mut decoder = Decoder {
        data,
        cache: vec![None; trailer.num_objects],
        active: vec![false; trailer.num_objects],
        depth: 0,
        trailer,
    };
    decoder.object(top)
}

fn invalid(message: impl Into<String>) -> Error {
    Error::parse(FORMAT, message)
}

/// Reads a big-endian unsigned integer of up to 8 bytes.
fn be_uint(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

fn to_usize(value: u64, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| invalid(format!("{} {} out of range", what, value)))
}

fn read_trailer(data: &[u8]) -> Result<Trailer> {
    if data.len() < MAGIC.len() + TRAILER_LEN || !data.starts_with(MAGIC) {
        return Err(invalid("missing bplist00 header or trailer"));
    }
    let objects_end = data.len() - TRAILER_LEN;
    let raw = &data[objects_end..];

    let offset_size = raw[6] as usize;
    let ref_size = raw[7] as usize;
    if !(1..=8).contains(&offset_size) || !(1..=8).contains(&ref_size) {
        return Err(invalid(format!(
            "unsupported offset size {} or reference size {}",
            offset_size, ref_size
        )));
    }

    let num_objects = to_usize(be_uint(&raw[8..16]), "object count")?;
    let top_object = to_usize(be_uint(&raw[16..24]), "top object")?;
    let offset_table = to_usize(be_uint(&raw[24..32]), "offset table position")?;

    let table_end = num_objects
        .checked_mul(offset_size)
        .and_then(|len| len.checked_add(offset_table));
    match table_end {
        Some(end) if offset_table >= MAGIC.len() && end <= objects_end => {}
        _ => return Err(invalid("offset table out of bounds")),
    }
    if top_object >= num_objects {
        return Err(invalid(format!(
            "top object {} out of {} objects",
            top_object, num_objects
        )));
    }

    Ok(Trailer {
        offset_size,
        ref_size,
        num_objects,
        top_object,
        offset_table,
    })
}

struct Decoder<'a> {
    data: &'a [u8],
    trailer: Trailer,
    /// Objects already decoded, by index.
    cache: Vec<Option<Value>>,
    /// Objects on the current decoding path, for cycle detection.
    active: Vec<bool>,
    /// Arrays and dictionaries on the current decoding path.
    depth: usize,
}

impl<'a> Decoder<'a> {
    fn object(&mut self, index: usize) -> Result<Value> {
        if index >= self.trailer.num_objects {
            return Err(invalid(format!("object reference {} out of range", index)));
        }
        if let Some(value) = &self.cache[index] {
            return Ok(value.clone());
        }
        if self.active[index] {
            return Err(invalid(format!("object {} references itself", index)));
        }

        self.active[index] = true;
        let value = self.decode_object(index)?;
        self.active[index] = false;
        self.cache[index] = Some(value.clone());
        Ok(value)
    }

    fn decode_object(&mut self, index: usize) -> Result<Value> {
        let offset = self.offset_of(index)?;
        let marker = self.slice(offset, 1)?[0];
        let info = (marker & 0x0F) as usize;

        match marker >> 4 {
            0x0 => match marker {
                0x00 | 0x0F => Ok(Value::Null),
                0x08 => Ok(Value::boolean(false)),
                0x09 => Ok(Value::boolean(true)),
                _ => Err(invalid(format!("unknown marker {:#04x}", marker))),
            },
            0x1 if info <= 4 => {
                let bytes = self.slice(offset + 1, 1 << info)?;
                Ok(Value::integer(read_int(bytes)))
            }
            0x2 => {
                let raw = match info {
                    2 => f32::from_bits(be_uint(self.slice(offset + 1, 4)?) as u32) as f64,
                    3 => f64::from_bits(be_uint(self.slice(offset + 1, 8)?)),
                    _ => return Err(invalid(format!("unsupported real width {}", 1 << info))),
                };
                Ok(Value::real(raw))
            }
            0x3 if marker == 0x33 => {
                let bytes = self.slice(offset + 1, 8)?;
                Ok(Value::real(f64::from_bits(be_uint(bytes))))
            }
            0x4 => {
                let (start, len) = self.length(offset, info)?;
                Ok(Value::blob(self.slice(start, len)?.to_vec()))
            }
            0x5 | 0x7 => {
                let (start, len) = self.length(offset, info)?;
                Ok(Value::text(decode_utf8(self.slice(start, len)?)))
            }
            0x6 => {
                let (start, units) = self.length(offset, info)?;
                let len = units
                    .checked_mul(2)
                    .ok_or_else(|| invalid("UTF-16 string length overflow"))?;
                Ok(Value::text(decode_utf16(self.slice(start, len)?)))
            }
            0x8 | 0xB | 0xC => Ok(Value::Null),
            0xA => {
                let (start, count) = self.length(offset, info)?;
                let refs = self.refs(start, count)?;
                self.descend()?;
                let items = refs
                    .into_iter()
                    .map(|r| self.object(r))
                    .collect::<Result<Vec<_>>>()?;
                self.depth -= 1;
                Ok(Value::list(items))
            }
            0xD => {
                let (start, count) = self.length(offset, info)?;
                let total = count
                    .checked_mul(2)
                    .ok_or_else(|| invalid("dictionary size overflow"))?;
                let refs = self.refs(start, total)?;
                let (keys, values) = refs.split_at(count);
                self.descend()?;

                let mut map = PlistMap::with_capacity(count);
                for (&key_ref, &value_ref) in keys.iter().zip(values) {
                    let key = self.object(key_ref)?;
                    let Some(key) = key.as_text() else {
                        return Err(invalid(format!(
                            "dictionary key of kind {} is not a string",
                            key.kind().name()
                        )));
                    };
                    let value = self.object(value_ref)?;
                    map.insert(key, value);
                }
                self.depth -= 1;
                Ok(Value::map(map))
            }
            _ => Err(invalid(format!("unknown marker {:#04x}", marker))),
        }
    }

    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING {
            return Err(invalid("nesting too deep"));
        }
        self.depth += 1;
        Ok(())
    }

    /// Returns the position of object `index` from the offset table.
    fn offset_of(&self, index: usize) -> Result<usize> {
        let size = self.trailer.offset_size;
        let entry = self.slice(self.trailer.offset_table + index * size, size)?;
        let offset = to_usize(be_uint(entry), "object offset")?;
        if offset < MAGIC.len() || offset >= self.trailer.offset_table {
            return Err(invalid(format!("object {} at invalid offset {}", index, offset)));
        }
        Ok(offset)
    }

    /// Returns the payload start and element count of a sized object.
    fn length(&self, offset: usize, info: usize) -> Result<(usize, usize)> {
        if info != 0x0F {
            return Ok((offset + 1, info));
        }
        let marker = self.slice(offset + 1, 1)?[0];
        let width_log = (marker & 0x0F) as usize;
        if marker >> 4 != 0x1 || width_log > 3 {
            return Err(invalid(format!("invalid length marker {:#04x}", marker)));
        }
        let width = 1 << width_log;
        let len = to_usize(be_uint(self.slice(offset + 2, width)?), "length")?;
        Ok((offset + 2 + width, len))
    }

    fn refs(&self, start: usize, count: usize) -> Result<Vec<usize>> {
        let size = self.trailer.ref_size;
        let len = count
            .checked_mul(size)
            .ok_or_else(|| invalid("reference list overflow"))?;
        self.slice(start, len)?
            .chunks_exact(size)
            .map(|chunk| to_usize(be_uint(chunk), "object reference"))
            .collect()
    }

    fn slice(&self, start: usize, len: usize) -> Result<&'a [u8]> {
        let data: &'a [u8] = self.data;
        start
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .map(|end| &data[start..end])
            .ok_or_else(|| invalid(format!("{} bytes at {} past end of data", len, start)))
    }
}

/// 1, 2 and 4-byte integers are unsigned; 8 and 16-byte integers are signed
/// and the low 8 bytes are kept.
fn read_int(bytes: &[u8]) -> i64 {
    let low = &bytes[bytes.len().saturating_sub(8)..];
    be_uint(low) as i64
}

fn decode_utf8(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Invalid UTF-16 decodes to an empty string.
fn decode_utf16(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).unwrap_or_default()
}
