// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use cvm_codec::Value;
use cvm_types::{Tag, VmError};

pub fn struct_new(field_tags: &[Tag]) -> Result<Value, VmError> {
    Value::struct_new(field_tags)
}

pub fn struct_get(strct: &Value, index: i32) -> Result<Value, VmError> {
    let index = non_negative(index)?;
    strct.struct_field(index)
}

/// unlike a no-op stub that returns the struct unchanged, this actually
/// replaces the field.
pub fn struct_set(strct: &Value, index: i32, value: &Value) -> Result<Value, VmError> {
    let index = non_negative(index)?;
    let field_tags = strct.field_tags()?;
    let declared = *field_tags
        .get(index)
        .ok_or_else(|| VmError::Domain(format!("field index {} out of range", index)))?;
    if value.tag() != declared {
        return Err(VmError::TypeMismatch(format!(
            "field {} is declared {}, can't store a {}",
            index,
            declared.name(),
            value.tag().name()
        )));
    }

    let (start, end) = strct.struct_field_range(index)?;
    let header = strct.struct_header_len()?;
    let payload = strct.payload();

    let mut fields = payload[header..start].to_vec();
    fields.extend(value.to_bytes());
    fields.extend_from_slice(&payload[end..]);
    Ok(Value::struct_from_raw(&field_tags, fields))
}

fn non_negative(index: i32) -> Result<usize, VmError> {
    usize::try_from(index).map_err(|_| VmError::Domain(format!("negative index {}", index)))
}
