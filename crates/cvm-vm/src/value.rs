// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! dispatch for arithmetic/comparison/logic/conversion and aggregate
//! (list/string/struct) opcodes. These opcodes never touch frames or
//! the instruction pointer, only the operand stack, so they share one
//! arity-based pop-apply-push pattern.

use cvm_codec::{Instruction, Value};
use cvm_machine::Stack;
use cvm_ops::{arithmetic, comparison, conversion, list, logic, string, struct_ops};
use cvm_types::{Opcode, VmError};

type UnaryOp = fn(&Value) -> Result<Value, VmError>;
type BinaryOp = fn(&Value, &Value) -> Result<Value, VmError>;

fn unary(stack: &mut Stack, op: UnaryOp) -> Result<(), VmError> {
    let a = stack.pop()?;
    stack.push(op(&a)?)
}

/// binary ops pop the right operand first, then the left.
fn binary(stack: &mut Stack, op: BinaryOp) -> Result<(), VmError> {
    let right = stack.pop()?;
    let left = stack.pop()?;
    stack.push(op(&left, &right)?)
}

fn list_index_op(
    stack: &mut Stack,
    op: fn(&Value, i32) -> Result<Value, VmError>,
) -> Result<(), VmError> {
    let index = stack.pop()?;
    let target = stack.pop()?;
    stack.push(op(&target, index.as_i32()?)?)
}

/// ternary ops (list/struct insert-like) pop value, then index, then
/// the aggregate; applied as `op(aggregate, index, value)`.
fn ternary_insert(
    stack: &mut Stack,
    op: fn(&Value, i32, &Value) -> Result<Value, VmError>,
) -> Result<(), VmError> {
    let value = stack.pop()?;
    let index = stack.pop()?;
    let target = stack.pop()?;
    stack.push(op(&target, index.as_i32()?, &value)?)
}

/// shared by `PRINTF` and `string.format`: pop the argument count, then
/// that many arguments (topmost first), then the template. The popped
/// argument vector is reversed before use since it comes off the stack
/// in the opposite order the template's `%.` tokens are filled in.
pub(crate) fn pop_format_args(stack: &mut Stack) -> Result<(Value, Vec<Value>), VmError> {
    let n = stack.pop()?.as_i32()?;
    let n = usize::try_from(n).map_err(|_| VmError::Domain(format!("negative argument count {}", n)))?;
    let mut args = Vec::with_capacity(n);
    for _ in 0..n {
        args.push(stack.pop()?);
    }
    args.reverse();
    let template = stack.pop()?;
    Ok((template, args))
}

pub(crate) fn apply(opcode: Opcode, instr: &Instruction, stack: &mut Stack) -> Result<(), VmError> {
    use Opcode::*;
    match opcode {
        i32_neg => unary(stack, arithmetic::i32_neg),
        i32_add => binary(stack, arithmetic::i32_add),
        i32_sub => binary(stack, arithmetic::i32_sub),
        i32_mul => binary(stack, arithmetic::i32_mul),
        i32_div => binary(stack, arithmetic::i32_div),
        i32_lt => binary(stack, comparison::i32_lt),
        i32_gt => binary(stack, comparison::i32_gt),
        i32_leq => binary(stack, comparison::i32_leq),
        i32_geq => binary(stack, comparison::i32_geq),
        i32_eq => binary(stack, comparison::i32_eq),
        i32_neq => binary(stack, comparison::i32_neq),

        f32_neg => unary(stack, arithmetic::f32_neg),
        f32_add => binary(stack, arithmetic::f32_add),
        f32_sub => binary(stack, arithmetic::f32_sub),
        f32_mul => binary(stack, arithmetic::f32_mul),
        f32_div => binary(stack, arithmetic::f32_div),
        f32_lt => binary(stack, comparison::f32_lt),
        f32_gt => binary(stack, comparison::f32_gt),
        f32_leq => binary(stack, comparison::f32_leq),
        f32_geq => binary(stack, comparison::f32_geq),
        f32_eq => binary(stack, comparison::f32_eq),
        f32_neq => binary(stack, comparison::f32_neq),

        bool_not => unary(stack, logic::bool_not),
        bool_and => binary(stack, logic::bool_and),
        bool_or => binary(stack, logic::bool_or),
        bool_nand => binary(stack, logic::bool_nand),
        bool_nor => binary(stack, logic::bool_nor),
        bool_xor => binary(stack, logic::bool_xor),

        as_i32 => unary(stack, conversion::as_i32),
        as_f32 => unary(stack, conversion::as_f32),
        as_bool => unary(stack, conversion::as_bool),
        as_string => unary(stack, conversion::as_string),

        list_new => {
            let tag = instr.operand_as_tag()?;
            stack.push(list::list_new(tag))
        }
        list_len => unary(stack, list::list_len),
        list_get => list_index_op(stack, list::list_get),
        list_insert => ternary_insert(stack, list::list_insert),
        list_remove => list_index_op(stack, list::list_remove),
        list_replace => ternary_insert(stack, list::list_replace),

        string_concat => binary(stack, string::concat),
        string_split => binary(stack, string::split),
        string_format => {
            let (template, args) = pop_format_args(stack)?;
            stack.push(string::format(&template, &args)?)
        }

        struct_new => {
            let field_tags = instr.operand_as_tags()?;
            stack.push(struct_ops::struct_new(&field_tags)?)
        }
        struct_get => list_index_op(stack, struct_ops::struct_get),
        struct_set => ternary_insert(stack, struct_ops::struct_set),

        other => unreachable!("{:?} is not a value opcode", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvm_codec::instruction::encode_i32_operand;
    use cvm_types::Tag;
    use pretty_assertions::assert_eq;

    #[test]
    fn binary_pops_right_before_left() {
        let mut stack = Stack::new(8);
        stack.push(Value::from_i32(10)).unwrap();
        stack.push(Value::from_i32(3)).unwrap();
        apply(
            Opcode::i32_sub,
            &Instruction::new(Opcode::i32_sub, vec![]),
            &mut stack,
        )
        .unwrap();
        assert_eq!(stack.pop().unwrap().as_i32().unwrap(), 7);
    }

    #[test]
    fn list_new_pushes_an_empty_list_from_the_operand_tag() {
        let mut stack = Stack::new(8);
        let instr = Instruction::new(Opcode::list_new, vec![Tag::i32 as u8]);
        apply(Opcode::list_new, &instr, &mut stack).unwrap();
        let list = stack.pop().unwrap();
        assert_eq!(list.len().unwrap(), 0);
    }

    #[test]
    fn list_insert_applies_aggregate_index_value_order() {
        let mut stack = Stack::new(8);
        let list = list::list_new(Tag::i32);
        stack.push(list).unwrap();
        stack.push(Value::from_i32(0)).unwrap(); // index
        stack.push(Value::from_i32(42)).unwrap(); // value
        apply(
            Opcode::list_insert,
            &Instruction::new(Opcode::list_insert, vec![]),
            &mut stack,
        )
        .unwrap();
        let result = stack.pop().unwrap();
        assert_eq!(list::list_get(&result, 0).unwrap().as_i32().unwrap(), 42);
    }

    #[test]
    fn struct_new_reads_variadic_field_tags_from_operand() {
        let mut stack = Stack::new(8);
        let instr = Instruction::new(Opcode::struct_new, vec![Tag::i32 as u8, Tag::string as u8]);
        apply(Opcode::struct_new, &instr, &mut stack).unwrap();
        let s = stack.pop().unwrap();
        assert_eq!(
            struct_ops::struct_get(&s, 1).unwrap().as_str().unwrap(),
            ""
        );
    }

    #[test]
    fn pop_format_args_restores_left_to_right_order() {
        let mut stack = Stack::new(8);
        stack.push(Value::from_string("%.+%.")).unwrap();
        stack.push(Value::from_i32(1)).unwrap();
        stack.push(Value::from_i32(2)).unwrap();
        stack.push(Value::from_i32(2)).unwrap(); // n
        let (template, args) = pop_format_args(&mut stack).unwrap();
        assert_eq!(template.as_str().unwrap(), "%.+%.");
        assert_eq!(args[0].as_i32().unwrap(), 1);
        assert_eq!(args[1].as_i32().unwrap(), 2);
    }

    #[test]
    fn jump_address_operand_round_trips_through_encode() {
        let instr = Instruction::new(Opcode::jump, encode_i32_operand(9));
        assert_eq!(instr.operand_as_i32().unwrap(), 9);
    }
}
