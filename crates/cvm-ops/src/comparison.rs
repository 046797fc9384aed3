// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use cvm_codec::Value;
use cvm_types::VmError;

macro_rules! i32_cmp {
    ($name:ident, $op:tt) => {
        pub fn $name(a: &Value, b: &Value) -> Result<Value, VmError> {
            Ok(Value::from_bool(a.as_i32()? $op b.as_i32()?))
        }
    };
}

macro_rules! f32_cmp {
    ($name:ident, $op:tt) => {
        pub fn $name(a: &Value, b: &Value) -> Result<Value, VmError> {
            Ok(Value::from_bool(a.as_f32_raw()? $op b.as_f32_raw()?))
        }
    };
}

i32_cmp!(i32_lt, <);
i32_cmp!(i32_gt, >);
i32_cmp!(i32_leq, <=);
i32_cmp!(i32_geq, >=);
i32_cmp!(i32_eq, ==);
i32_cmp!(i32_neq, !=);

f32_cmp!(f32_lt, <);
f32_cmp!(f32_gt, >);
f32_cmp!(f32_leq, <=);
f32_cmp!(f32_geq, >=);
f32_cmp!(f32_eq, ==);
f32_cmp!(f32_neq, !=);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn twenty_is_not_less_than_ten() {
        let result = i32_lt(&Value::from_i32(20), &Value::from_i32(10)).unwrap();
        assert_eq!(result.as_bool_raw().unwrap(), false);
    }
}
