// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! a chain-call instruction builder, one method per opcode, in the
//! style of `BytecodeWriter::append_opcode_*`. Unlike on-disk byte-offset
//! addresses, `append_*` here returns the instruction's position in the
//! in-memory vector, since that is the unit `JUMP`/`FUNC_CALL`/
//! `BLOCK_START` addresses are expressed in — there is no on-disk format
//! to align writes to.

use cvm_codec::instruction::{encode_i32_operand, encode_two_i32_operands};
use cvm_codec::{Instruction, Value};
use cvm_types::{Opcode, Tag};

pub struct InstructionBuilder {
    instructions: Vec<Instruction>,
}

impl Default for InstructionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! niladic {
    ($name:ident, $opcode:ident) => {
        pub fn $name(&mut self) -> &mut Self {
            self.push(Opcode::$opcode, vec![])
        }
    };
}

macro_rules! i32_operand {
    ($name:ident, $opcode:ident) => {
        pub fn $name(&mut self, operand: i32) -> &mut Self {
            self.push(Opcode::$opcode, encode_i32_operand(operand))
        }
    };
}

impl InstructionBuilder {
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
        }
    }

    /// the address the next appended instruction will receive.
    pub fn next_address(&self) -> usize {
        self.instructions.len()
    }

    fn push(&mut self, opcode: Opcode, operands: Vec<u8>) -> &mut Self {
        self.instructions.push(Instruction::new(opcode, operands));
        self
    }

    pub fn finish(self) -> Vec<Instruction> {
        self.instructions
    }

    // --- control ---
    niladic!(append_null, null);
    niladic!(append_halt, halt);
    i32_operand!(append_jump, jump);
    i32_operand!(append_jumpc, jumpc);
    i32_operand!(append_jumpnc, jumpnc);

    // --- blocks ---
    i32_operand!(append_block_start, block_start);
    niladic!(append_block_end, block_end);
    niladic!(append_block_br, block_br);
    i32_operand!(append_block_load, block_load);
    i32_operand!(append_block_save, block_save);

    // --- calls ---
    pub fn append_func_call(&mut self, addr: i32, arg_count: i32) -> &mut Self {
        self.push(Opcode::func_call, encode_two_i32_operands(addr, arg_count))
    }
    i32_operand!(append_func_ret, func_ret);
    i32_operand!(append_local_load, local_load);
    i32_operand!(append_local_save, local_save);

    // --- heap ---
    niladic!(append_new, new);
    niladic!(append_pop, pop);
    i32_operand!(append_free, free);
    i32_operand!(append_load, load);
    i32_operand!(append_save, save);

    // --- literal loads ---
    pub fn append_i32_load(&mut self, value: i32) -> &mut Self {
        self.push(Opcode::i32_load, Value::from_i32(value).to_bytes())
    }
    pub fn append_bool_load(&mut self, value: bool) -> &mut Self {
        self.push(Opcode::bool_load, Value::from_bool(value).to_bytes())
    }
    pub fn append_f32_load(&mut self, value: f32) -> &mut Self {
        self.push(Opcode::f32_load, Value::from_f32(value).to_bytes())
    }
    pub fn append_string_load(&mut self, value: &str) -> &mut Self {
        self.push(Opcode::string_load, Value::from_string(value).to_bytes())
    }

    // --- i32 arithmetic / comparison ---
    niladic!(append_i32_neg, i32_neg);
    niladic!(append_i32_add, i32_add);
    niladic!(append_i32_sub, i32_sub);
    niladic!(append_i32_mul, i32_mul);
    niladic!(append_i32_div, i32_div);
    niladic!(append_i32_lt, i32_lt);
    niladic!(append_i32_gt, i32_gt);
    niladic!(append_i32_leq, i32_leq);
    niladic!(append_i32_geq, i32_geq);
    niladic!(append_i32_eq, i32_eq);
    niladic!(append_i32_neq, i32_neq);

    // --- f32 arithmetic / comparison ---
    niladic!(append_f32_neg, f32_neg);
    niladic!(append_f32_add, f32_add);
    niladic!(append_f32_sub, f32_sub);
    niladic!(append_f32_mul, f32_mul);
    niladic!(append_f32_div, f32_div);
    niladic!(append_f32_lt, f32_lt);
    niladic!(append_f32_gt, f32_gt);
    niladic!(append_f32_leq, f32_leq);
    niladic!(append_f32_geq, f32_geq);
    niladic!(append_f32_eq, f32_eq);
    niladic!(append_f32_neq, f32_neq);

    // --- bool logic ---
    niladic!(append_bool_not, bool_not);
    niladic!(append_bool_and, bool_and);
    niladic!(append_bool_or, bool_or);
    niladic!(append_bool_nand, bool_nand);
    niladic!(append_bool_nor, bool_nor);
    niladic!(append_bool_xor, bool_xor);

    // --- conversions ---
    niladic!(append_as_i32, as_i32);
    niladic!(append_as_f32, as_f32);
    niladic!(append_as_bool, as_bool);
    niladic!(append_as_string, as_string);

    // --- list ops ---
    pub fn append_list_new(&mut self, elem_tag: Tag) -> &mut Self {
        self.push(Opcode::list_new, vec![elem_tag as u8])
    }
    niladic!(append_list_len, list_len);
    niladic!(append_list_get, list_get);
    niladic!(append_list_insert, list_insert);
    niladic!(append_list_remove, list_remove);
    niladic!(append_list_replace, list_replace);

    // --- string ops ---
    niladic!(append_string_concat, string_concat);
    niladic!(append_string_split, string_split);
    niladic!(append_string_format, string_format);

    // --- struct ops ---
    pub fn append_struct_new(&mut self, field_tags: &[Tag]) -> &mut Self {
        self.push(
            Opcode::struct_new,
            field_tags.iter().map(|t| *t as u8).collect(),
        )
    }
    niladic!(append_struct_get, struct_get);
    niladic!(append_struct_set, struct_set);

    // --- I/O ---
    niladic!(append_print, print);
    niladic!(append_printf, printf);
    niladic!(append_println, println);
    niladic!(append_read, read);
}
