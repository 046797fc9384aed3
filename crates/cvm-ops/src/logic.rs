// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use cvm_codec::Value;
use cvm_types::VmError;

pub fn bool_not(a: &Value) -> Result<Value, VmError> {
    Ok(Value::from_bool(!a.as_bool_raw()?))
}

pub fn bool_and(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_bool(a.as_bool_raw()? && b.as_bool_raw()?))
}

pub fn bool_or(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_bool(a.as_bool_raw()? || b.as_bool_raw()?))
}

pub fn bool_nand(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_bool(!(a.as_bool_raw()? && b.as_bool_raw()?)))
}

pub fn bool_nor(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_bool(!(a.as_bool_raw()? || b.as_bool_raw()?)))
}

pub fn bool_xor(a: &Value, b: &Value) -> Result<Value, VmError> {
    Ok(Value::from_bool(a.as_bool_raw()? != b.as_bool_raw()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nand_is_negated_and() {
        let result = bool_nand(&Value::from_bool(true), &Value::from_bool(true)).unwrap();
        assert_eq!(result.as_bool_raw().unwrap(), false);
    }
}
