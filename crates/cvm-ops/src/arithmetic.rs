// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use cvm_codec::Value;
use cvm_types::VmError;

pub fn i32_neg(a: &Value) -> Result<Value, VmError> {
    Ok(Value::from_i32(-a.as_i32()?))
}

pub fn i32_add(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_i32(a.as_i32()?.wrapping_add(b.as_i32()?)))
}

pub fn i32_sub(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_i32(a.as_i32()?.wrapping_sub(b.as_i32()?)))
}

pub fn i32_mul(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_i32(a.as_i32()?.wrapping_mul(b.as_i32()?)))
}

pub fn i32_div(a: &Value, b: &Value) -> Result<Value, VmError> {
    let divisor = b.as_i32()?;
    if divisor == 0 {
        return Err(VmError::Domain("division by zero".to_string()));
    }
    Ok(Value::from_i32(a.as_i32()?.wrapping_div(divisor)))
}

pub fn f32_neg(a: &Value) -> Result<Value, VmError> {
    Ok(Value::from_f32(-a.as_f32_raw()?))
}

pub fn f32_add(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_f32(a.as_f32_raw()? + b.as_f32_raw()?))
}

pub fn f32_sub(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_f32(a.as_f32_raw()? - b.as_f32_raw()?))
}

pub fn f32_mul(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_f32(a.as_f32_raw()? * b.as_f32_raw()?))
}

/// division by 0.0 yields the platform IEEE result (infinity/NaN); callers
/// that want to refuse it do so in the dispatch loop, not here.
pub fn f32_div(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_f32(a.as_f32_raw()? / b.as_f32_raw()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn adds_two_i32_values() {
        let result = i32_add(&Value::from_i32(10), &Value::from_i32(20)).unwrap();
        assert_eq!(result.as_i32().unwrap(), 30);
    }

    #[test]
    fn rejects_division_by_zero() {
        assert!(i32_div(&Value::from_i32(1), &Value::from_i32(0)).is_err());
    }

    #[test]
    fn f32_div_by_zero_yields_infinity() {
        let result = f32_div(&Value::from_f32(1.0), &Value::from_f32(0.0)).unwrap();
        assert!(result.as_f32_raw().unwrap().is_infinite());
    }
}
