// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use crate::VmError;

/// the CVM instruction set, grouped by concern: control, blocks, calls,
/// heap, value ops, I/O.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[allow(non_camel_case_types)]
pub enum Opcode {
    // --- control ---
    null = 0x00, // no-op, advances ip
    halt,
    jump,   // (addr: tagged i32)
    jumpc,  // pop bool, branch if true (addr: tagged i32)
    jumpnc, // pop bool, branch if false (addr: tagged i32)

    // --- blocks ---
    block_start = 0x10, // (ret_addr: tagged i32)
    block_end,
    block_br,
    block_load, // (i: tagged i32)
    block_save, // (i: tagged i32)

    // --- calls ---
    func_call = 0x20, // (addr: tagged i32, arg_count: tagged i32)
    func_ret,         // (ret_count: tagged i32)
    local_load,       // (i: tagged i32)
    local_save,       // (i: tagged i32)

    // --- heap ---
    new = 0x30,
    pop,
    free, // (i: tagged i32)
    load, // (i: tagged i32)
    save, // (i: tagged i32)

    // --- literal loads ---
    i32_load = 0x40, // (value: tagged i32)
    bool_load,       // (value: tagged bool)
    f32_load,        // (value: tagged f32)
    string_load,     // (value: tagged string)

    // --- i32 arithmetic / logic / comparison ---
    i32_neg = 0x50,
    i32_add,
    i32_sub,
    i32_mul,
    i32_div,
    i32_lt,
    i32_gt,
    i32_leq,
    i32_geq,
    i32_eq,
    i32_neq,

    // --- f32 arithmetic / comparison ---
    f32_neg = 0x60,
    f32_add,
    f32_sub,
    f32_mul,
    f32_div,
    f32_lt,
    f32_gt,
    f32_leq,
    f32_geq,
    f32_eq,
    f32_neq,

    // --- bool logic ---
    bool_not = 0x70,
    bool_and,
    bool_or,
    bool_nand,
    bool_nor,
    bool_xor,

    // --- conversions ---
    as_i32 = 0x80,
    as_f32,
    as_bool,
    as_string,

    // --- list ops ---
    list_new = 0x90, // (elem_tag: u8 operand)
    list_len,
    list_get,
    list_insert,
    list_remove,
    list_replace,

    // --- string ops ---
    string_concat = 0xA0,
    string_split,
    string_format,

    // --- struct ops ---
    struct_new = 0xB0, // (field_tags: variadic u8 operands, count-prefixed)
    struct_get,
    struct_set,

    // --- I/O ---
    print = 0xC0,
    printf,
    println,
    read,
}

pub const MAX_OPCODE_NUMBER: usize = 0xC4;

impl TryFrom<u8> for Opcode {
    type Error = VmError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use Opcode::*;
        Ok(match value {
            0x00 => null,
            0x01 => halt,
            0x02 => jump,
            0x03 => jumpc,
            0x04 => jumpnc,
            0x10 => block_start,
            0x11 => block_end,
            0x12 => block_br,
            0x13 => block_load,
            0x14 => block_save,
            0x20 => func_call,
            0x21 => func_ret,
            0x22 => local_load,
            0x23 => local_save,
            0x30 => new,
            0x31 => pop,
            0x32 => free,
            0x33 => load,
            0x34 => save,
            0x40 => i32_load,
            0x41 => bool_load,
            0x42 => f32_load,
            0x43 => string_load,
            0x50 => i32_neg,
            0x51 => i32_add,
            0x52 => i32_sub,
            0x53 => i32_mul,
            0x54 => i32_div,
            0x55 => i32_lt,
            0x56 => i32_gt,
            0x57 => i32_leq,
            0x58 => i32_geq,
            0x59 => i32_eq,
            0x5A => i32_neq,
            0x60 => f32_neg,
            0x61 => f32_add,
            0x62 => f32_sub,
            0x63 => f32_mul,
            0x64 => f32_div,
            0x65 => f32_lt,
            0x66 => f32_gt,
            0x67 => f32_leq,
            0x68 => f32_geq,
            0x69 => f32_eq,
            0x6A => f32_neq,
            0x70 => bool_not,
            0x71 => bool_and,
            0x72 => bool_or,
            0x73 => bool_nand,
            0x74 => bool_nor,
            0x75 => bool_xor,
            0x80 => as_i32,
            0x81 => as_f32,
            0x82 => as_bool,
            0x83 => as_string,
            0x90 => list_new,
            0x91 => list_len,
            0x92 => list_get,
            0x93 => list_insert,
            0x94 => list_remove,
            0x95 => list_replace,
            0xA0 => string_concat,
            0xA1 => string_split,
            0xA2 => string_format,
            0xB0 => struct_new,
            0xB1 => struct_get,
            0xB2 => struct_set,
            0xC0 => print,
            0xC1 => printf,
            0xC2 => println,
            0xC3 => read,
            other => return Err(VmError::UnknownOpcode(other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_every_opcode_byte_value() {
        for op in [
            Opcode::null,
            Opcode::halt,
            Opcode::jump,
            Opcode::func_call,
            Opcode::func_ret,
            Opcode::list_insert,
            Opcode::struct_get,
            Opcode::printf,
            Opcode::read,
        ] {
            let byte = op as u8;
            assert_eq!(Opcode::try_from(byte).unwrap(), op);
        }
    }

    #[test]
    fn rejects_unknown_opcode_byte() {
        assert_eq!(Opcode::try_from(0xFF), Err(VmError::UnknownOpcode(0xFF)));
    }
}
