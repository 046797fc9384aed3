// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! in-memory instruction encoding: an instruction is an opcode
//! byte plus an operand byte sequence. only the in-memory contract is
//! normative — there is no on-disk format.

use cvm_types::{Opcode, Tag, VmError};

use crate::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operands: Vec<u8>,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Vec<u8>) -> Self {
        Self { opcode, operands }
    }

    /// reads a single tagged i32 operand (an address, index, or count)
    pub fn operand_as_i32(&self) -> Result<i32, VmError> {
        let (value, _) = Value::decode(&self.operands)?;
        value.as_i32()
    }

    /// reads two concatenated tagged i32 operands, as carried by `FUNC_CALL`
    /// (address, argument count)
    pub fn operand_as_two_i32(&self) -> Result<(i32, i32), VmError> {
        let (first, used) = Value::decode(&self.operands)?;
        let (second, _) = Value::decode(&self.operands[used..])?;
        Ok((first.as_i32()?, second.as_i32()?))
    }

    /// reads a single tagged value operand, as carried by the `*_load`
    /// literal instructions
    pub fn operand_as_value(&self) -> Result<Value, VmError> {
        let (value, _) = Value::decode(&self.operands)?;
        Ok(value)
    }

    /// reads a single element/field tag byte operand, as carried by `list_new`
    pub fn operand_as_tag(&self) -> Result<Tag, VmError> {
        let byte = self
            .operands
            .first()
            .ok_or_else(|| VmError::Decode("missing tag operand".to_string()))?;
        Tag::try_from(*byte)
    }

    /// reads a variadic list of field tag bytes, as carried by `struct_new`
    pub fn operand_as_tags(&self) -> Result<Vec<Tag>, VmError> {
        self.operands.iter().map(|b| Tag::try_from(*b)).collect()
    }
}

/// encodes an address/index/count as a tagged i32 operand (5 bytes)
pub fn encode_i32_operand(value: i32) -> Vec<u8> {
    Value::from_i32(value).to_bytes()
}

/// encodes the two tagged-i32 operands carried by `FUNC_CALL`
pub fn encode_two_i32_operands(a: i32, b: i32) -> Vec<u8> {
    let mut bytes = Value::from_i32(a).to_bytes();
    bytes.extend(Value::from_i32(b).to_bytes());
    bytes
}
