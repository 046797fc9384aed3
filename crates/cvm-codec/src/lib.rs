// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! the tagged value & codec component: encode/decode,
//! size/len, human-readable formatting, and the per-tag zero/empty value.

use cvm_types::{Tag, VmError, I32_VALUE_SIZE_IN_BYTES};

pub mod instruction;

pub use instruction::Instruction;

/// an owned tagged value: a [`Tag`] plus its tag-specific payload.
///
/// values are immutable byte sequences;
/// "mutating" a list/struct always produces a new `Value`, never edits one
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    tag: Tag,
    payload: Vec<u8>,
}

impl Value {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// `bytes(value) → byte sequence`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.payload.len());
        out.push(self.tag as u8);
        out.extend_from_slice(&self.payload);
        out
    }

    /// `create(tag, payload) → value`, the exact inverse of [`Value::to_bytes`]
    /// split at the tag byte: `payload` already carries any length header,
    /// since the header is part of the tag's payload layout.
    pub fn create(tag: Tag, payload: &[u8]) -> Result<Value, VmError> {
        let value = Value {
            tag,
            payload: payload.to_vec(),
        };
        // validate by recomputing the declared size against what was given
        let declared = value.size()?;
        if declared != 1 + payload.len() {
            return Err(VmError::Decode(format!(
                "{} payload length {} does not match its own length header (expected {})",
                tag.name(),
                payload.len(),
                declared - 1
            )));
        }
        Ok(value)
    }

    /// decode one value out of a byte stream that begins with its tag byte,
    /// returning the value and the number of bytes consumed. used to scan
    /// list/struct elements and to parse instruction operands.
    pub fn decode(bytes: &[u8]) -> Result<(Value, usize), VmError> {
        let total = scan_size(bytes)?;
        if bytes.len() < total {
            return Err(VmError::Decode(format!(
                "truncated value: need {} bytes, have {}",
                total,
                bytes.len()
            )));
        }
        let tag = Tag::try_from(bytes[0])?;
        let value = Value::create(tag, &bytes[1..total])?;
        Ok((value, total))
    }

    // --- typed constructors ---

    pub fn from_i32(v: i32) -> Value {
        Value {
            tag: Tag::i32,
            payload: v.to_le_bytes().to_vec(),
        }
    }

    pub fn from_bool(v: bool) -> Value {
        Value {
            tag: Tag::bool,
            payload: vec![if v { 1 } else { 0 }],
        }
    }

    pub fn from_f32(v: f32) -> Value {
        Value {
            tag: Tag::f32,
            payload: v.to_le_bytes().to_vec(),
        }
    }

    pub fn from_string(s: &str) -> Value {
        let mut payload = Value::from_i32(s.len() as i32).to_bytes();
        payload.extend_from_slice(s.as_bytes());
        Value {
            tag: Tag::string,
            payload,
        }
    }

    /// an empty list of the given homogeneous element tag
    pub fn list_new(elem_tag: Tag) -> Value {
        let mut payload = vec![elem_tag as u8];
        payload.extend_from_slice(&Value::from_i32(0).to_bytes());
        Value {
            tag: Tag::list,
            payload,
        }
    }

    /// a struct with the given field tags, each field initialized to its
    /// [`Value::default_for`]
    pub fn struct_new(field_tags: &[Tag]) -> Result<Value, VmError> {
        let mut payload = Value::from_i32(field_tags.len() as i32).to_bytes();
        payload.extend(field_tags.iter().map(|t| *t as u8));
        for tag in field_tags {
            payload.extend(Value::default_for(*tag)?.to_bytes());
        }
        Ok(Value {
            tag: Tag::strct,
            payload,
        })
    }

    // --- primitive accessors (codec-internal; arithmetic/logic live in cvm-ops) ---

    pub fn as_i32(&self) -> Result<i32, VmError> {
        if self.tag != Tag::i32 {
            return Err(VmError::TypeMismatch(format!(
                "expected i32, got {}",
                self.tag.name()
            )));
        }
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.payload[0..4]);
        Ok(i32::from_le_bytes(buf))
    }

    pub fn as_bool_raw(&self) -> Result<bool, VmError> {
        if self.tag != Tag::bool {
            return Err(VmError::TypeMismatch(format!(
                "expected bool, got {}",
                self.tag.name()
            )));
        }
        Ok(self.payload[0] != 0)
    }

    pub fn as_f32_raw(&self) -> Result<f32, VmError> {
        if self.tag != Tag::f32 {
            return Err(VmError::TypeMismatch(format!(
                "expected f32, got {}",
                self.tag.name()
            )));
        }
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.payload[0..4]);
        Ok(f32::from_le_bytes(buf))
    }

    pub fn as_str(&self) -> Result<&str, VmError> {
        if self.tag != Tag::string {
            return Err(VmError::TypeMismatch(format!(
                "expected string, got {}",
                self.tag.name()
            )));
        }
        let len = read_i32_header(&self.payload[0..I32_VALUE_SIZE_IN_BYTES])? as usize;
        std::str::from_utf8(&self.payload[I32_VALUE_SIZE_IN_BYTES..I32_VALUE_SIZE_IN_BYTES + len])
            .map_err(|e| VmError::Decode(format!("invalid utf-8 in string value: {}", e)))
    }

    /// element tag of a list value
    pub fn elem_tag(&self) -> Result<Tag, VmError> {
        if self.tag != Tag::list {
            return Err(VmError::TypeMismatch(format!(
                "expected list, got {}",
                self.tag.name()
            )));
        }
        Tag::try_from(self.payload[0])
    }

    /// `len(value) → integer`: element count for list, character count for
    /// string, field count for struct; fails for primitives.
    pub fn len(&self) -> Result<usize, VmError> {
        match self.tag {
            Tag::list => {
                let n = read_i32_header(&self.payload[1..1 + I32_VALUE_SIZE_IN_BYTES])?;
                Ok(n as usize)
            }
            Tag::string => {
                let n = read_i32_header(&self.payload[0..I32_VALUE_SIZE_IN_BYTES])?;
                Ok(n as usize)
            }
            Tag::strct => {
                let n = read_i32_header(&self.payload[0..I32_VALUE_SIZE_IN_BYTES])?;
                Ok(n as usize)
            }
            other => Err(VmError::Domain(format!("{} has no length", other.name()))),
        }
    }

    /// `size(value) → integer`: total serialized byte length, tag included.
    pub fn size(&self) -> Result<usize, VmError> {
        let mut full = vec![self.tag as u8];
        full.extend_from_slice(&self.payload);
        scan_size(&full)
    }

    /// the field tags declared on a struct value, in order
    pub fn field_tags(&self) -> Result<Vec<Tag>, VmError> {
        if self.tag != Tag::strct {
            return Err(VmError::TypeMismatch(format!(
                "expected struct, got {}",
                self.tag.name()
            )));
        }
        let count = self.len()?;
        self.payload[I32_VALUE_SIZE_IN_BYTES..I32_VALUE_SIZE_IN_BYTES + count]
            .iter()
            .map(|b| Tag::try_from(*b))
            .collect()
    }

    /// `defaultFor(tag) → value`: the zero/empty value of a primitive or
    /// string tag; fails for aggregate tags (lists need an element tag,
    /// structs need their field tags — see [`Value::list_new`]/[`Value::struct_new`]).
    pub fn default_for(tag: Tag) -> Result<Value, VmError> {
        match tag {
            Tag::i32 => Ok(Value::from_i32(0)),
            Tag::bool => Ok(Value::from_bool(false)),
            Tag::f32 => Ok(Value::from_f32(0.0)),
            Tag::string => Ok(Value::from_string("")),
            Tag::list | Tag::strct => Err(VmError::Domain(format!(
                "{} has no context-free default value",
                tag.name()
            ))),
        }
    }

    /// the zero/empty value with the same shape as `self`: `default_for`
    /// for primitives and strings, and an empty list / field-defaulted
    /// struct with `self`'s own element tag / field tags for aggregates.
    /// used by `FREE` to zero a heap slot without losing its tag.
    pub fn zeroed_like(&self) -> Result<Value, VmError> {
        match self.tag {
            Tag::list => Ok(Value::list_new(self.elem_tag()?)),
            Tag::strct => Value::struct_new(&self.field_tags()?),
            _ => Value::default_for(self.tag),
        }
    }

    /// `format(value) → text`: human-readable rendering used by `print`/`trace`.
    pub fn format(&self) -> Result<String, VmError> {
        match self.tag {
            Tag::i32 => Ok(format!("(i32){}", self.as_i32()?)),
            Tag::bool => Ok(format!("(bool){}", self.as_bool_raw()?)),
            Tag::f32 => Ok(format!("(f32){}", self.as_f32_raw()?)),
            Tag::string => Ok(format!("(string)\"{}\"", self.as_str()?)),
            Tag::list => {
                let elem_tag = self.elem_tag()?;
                let n = self.len()?;
                let mut parts = Vec::with_capacity(n);
                for i in 0..n {
                    parts.push(self.list_element(i)?.format()?);
                }
                Ok(format!(
                    "(list.{})[{}]{{ {} }}",
                    elem_tag.name(),
                    n,
                    parts.join(" ")
                ))
            }
            Tag::strct => {
                let tags = self.field_tags()?;
                let mut parts = Vec::with_capacity(tags.len());
                for i in 0..tags.len() {
                    parts.push(self.struct_field(i)?.format()?);
                }
                Ok(format!("(struct){{ {} }}", parts.join(" ")))
            }
        }
    }

    // --- element access shared by cvm-ops and `format` ---

    /// absolute byte offsets of the i-th list element within `payload`
    /// (start, end), scanning linearly for variable-width element tags.
    pub fn list_element_range(&self, index: usize) -> Result<(usize, usize), VmError> {
        let elem_tag = self.elem_tag()?;
        let n = self.len()?;
        if index >= n {
            return Err(VmError::Domain(format!(
                "index {} out of range for list of length {}",
                index, n
            )));
        }
        const HEADER: usize = 1 + I32_VALUE_SIZE_IN_BYTES; // elemTag + len header
        if let Some(fixed) = fixed_size_for_tag(elem_tag) {
            let start = HEADER + index * fixed;
            Ok((start, start + fixed))
        } else {
            let mut offset = HEADER;
            for _ in 0..index {
                offset += scan_size(&self.payload[offset..])?;
            }
            let size = scan_size(&self.payload[offset..])?;
            Ok((offset, offset + size))
        }
    }

    pub fn list_element(&self, index: usize) -> Result<Value, VmError> {
        let (start, end) = self.list_element_range(index)?;
        let (value, _) = Value::decode(&self.payload[start..end])?;
        Ok(value)
    }

    /// the byte range of the list header (element tag + length), i.e. the
    /// prefix before the first element
    pub fn list_header_len(&self) -> usize {
        1 + I32_VALUE_SIZE_IN_BYTES
    }

    /// the byte range of the struct header (field count + field tags), i.e.
    /// the prefix before the first field
    pub fn struct_header_len(&self) -> Result<usize, VmError> {
        Ok(I32_VALUE_SIZE_IN_BYTES + self.field_tags()?.len())
    }

    /// rebuilds a list value from its element tag, new element count, and
    /// the raw concatenated bytes of its elements (each element's own tag
    /// byte included) — used by the list mutation ops in `cvm-ops`.
    pub fn list_from_raw(elem_tag: Tag, length: usize, elements: Vec<u8>) -> Value {
        let mut payload = vec![elem_tag as u8];
        payload.extend(Value::from_i32(length as i32).to_bytes());
        payload.extend(elements);
        Value {
            tag: Tag::list,
            payload,
        }
    }

    /// rebuilds a struct value from its field tags and the raw concatenated
    /// bytes of its fields (each field's own tag byte included) — used by
    /// the struct mutation ops in `cvm-ops`.
    pub fn struct_from_raw(field_tags: &[Tag], fields: Vec<u8>) -> Value {
        let mut payload = Value::from_i32(field_tags.len() as i32).to_bytes();
        payload.extend(field_tags.iter().map(|t| *t as u8));
        payload.extend(fields);
        Value {
            tag: Tag::strct,
            payload,
        }
    }

    /// absolute byte offsets of the i-th struct field within `payload`
    pub fn struct_field_range(&self, index: usize) -> Result<(usize, usize), VmError> {
        let tags = self.field_tags()?;
        if index >= tags.len() {
            return Err(VmError::Domain(format!(
                "field index {} out of range for struct of {} fields",
                index,
                tags.len()
            )));
        }
        let mut offset = I32_VALUE_SIZE_IN_BYTES + tags.len();
        for i in 0..index {
            offset += fixed_size_for_tag(tags[i])
                .map(Ok)
                .unwrap_or_else(|| scan_size(&self.payload[offset..]))?;
            // the line above re-scans for variable width fields below
        }
        let size = fixed_size_for_tag(tags[index])
            .map(Ok)
            .unwrap_or_else(|| scan_size(&self.payload[offset..]))?;
        Ok((offset, offset + size))
    }

    pub fn struct_field(&self, index: usize) -> Result<Value, VmError> {
        let (start, end) = self.struct_field_range(index)?;
        let (value, _) = Value::decode(&self.payload[start..end])?;
        Ok(value)
    }
}

/// serialized size (fixed) of a fixed-width primitive tag, or `None` for
/// the three variable-width tags.
pub fn fixed_size_for_tag(tag: Tag) -> Option<usize> {
    match tag {
        Tag::i32 | Tag::f32 => Some(5),
        Tag::bool => Some(2),
        Tag::list | Tag::string | Tag::strct => None,
    }
}

/// reads a tagged i32 (5 bytes: tag byte + 4 LE bytes) from the front of
/// `bytes` and returns its value.
pub fn read_i32_header(bytes: &[u8]) -> Result<i32, VmError> {
    if bytes.len() < I32_VALUE_SIZE_IN_BYTES {
        return Err(VmError::Decode("truncated i32 length header".to_string()));
    }
    let tag = Tag::try_from(bytes[0])?;
    if tag != Tag::i32 {
        return Err(VmError::Decode(format!(
            "expected an i32-encoded length header, found tag {}",
            tag.name()
        )));
    }
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[1..5]);
    Ok(i32::from_le_bytes(buf))
}

/// computes the total serialized size (tag byte included) of the value
/// that begins at `bytes[0]`, without requiring the full value to be
/// sliced in advance — mirrors the recursive `Size`/offset-scanning used
/// throughout the original object model for variable-width aggregates.
pub fn scan_size(bytes: &[u8]) -> Result<usize, VmError> {
    if bytes.is_empty() {
        return Err(VmError::Decode("empty value".to_string()));
    }
    let tag = Tag::try_from(bytes[0])?;
    match tag {
        Tag::i32 | Tag::f32 => Ok(5),
        Tag::bool => Ok(2),
        Tag::string => {
            let len = read_i32_header(bytes.get(1..).unwrap_or_default())? as usize;
            Ok(1 + I32_VALUE_SIZE_IN_BYTES + len)
        }
        Tag::list => {
            if bytes.len() < 2 {
                return Err(VmError::Decode("truncated list header".to_string()));
            }
            let elem_tag = Tag::try_from(bytes[1])?;
            let len = read_i32_header(&bytes[2..])? as usize;
            const HEADER: usize = 1 + 1 + I32_VALUE_SIZE_IN_BYTES;
            if let Some(fixed) = fixed_size_for_tag(elem_tag) {
                Ok(HEADER + len * fixed)
            } else {
                let mut offset = HEADER;
                for _ in 0..len {
                    offset += scan_size(&bytes[offset..])?;
                }
                Ok(offset)
            }
        }
        Tag::strct => {
            let count = read_i32_header(bytes.get(1..).unwrap_or_default())? as usize;
            let tags_start = 1 + I32_VALUE_SIZE_IN_BYTES;
            if bytes.len() < tags_start + count {
                return Err(VmError::Decode("truncated struct field tags".to_string()));
            }
            let mut offset = tags_start + count;
            for i in 0..count {
                let field_tag = Tag::try_from(bytes[tags_start + i])?;
                offset += fixed_size_for_tag(field_tag)
                    .map(Ok)
                    .unwrap_or_else(|| scan_size(&bytes[offset..]))?;
            }
            Ok(offset)
        }
    }
}


#[cfg(test)]
mod test_support {
    use super::*;

    /// test-only helper that appends an i32 element to the end of a list,
    /// used to build fixtures without depending on cvm-ops from this crate.
    pub(crate) fn append_i32(list: Value, v: i32) -> Value {
        let n = list.len().unwrap();
        let mut payload = list.payload.clone();
        payload.extend(Value::from_i32(v).to_bytes());
        let new_len = Value::from_i32((n + 1) as i32).to_bytes();
        payload[1..1 + I32_VALUE_SIZE_IN_BYTES].copy_from_slice(&new_len);
        Value {
            tag: Tag::list,
            payload,
        }
    }
}
