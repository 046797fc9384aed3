// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! the dispatch loop: fetch-decode-execute over a pre-assembled
//! instruction vector, routing each opcode to the machine-state
//! primitives in [`cvm_machine`] or the pure value operations in
//! [`cvm_ops`].

mod control;
mod io;
mod value;

pub mod cancellation;
pub mod trace;

pub use cancellation::CancellationToken;
pub use trace::trace;

use std::io::{BufRead, Write};

use cvm_codec::Instruction;
use cvm_machine::Machine;
use cvm_types::{Opcode, VmError};

/// why [`execute`] stopped. Kept distinct from [`VmError`] because
/// neither normal termination nor a cooperative cancellation is a
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Halted,
    Cancelled,
}

fn is_value_opcode(opcode: Opcode) -> bool {
    use Opcode::*;
    matches!(
        opcode,
        i32_neg
            | i32_add
            | i32_sub
            | i32_mul
            | i32_div
            | i32_lt
            | i32_gt
            | i32_leq
            | i32_geq
            | i32_eq
            | i32_neq
            | f32_neg
            | f32_add
            | f32_sub
            | f32_mul
            | f32_div
            | f32_lt
            | f32_gt
            | f32_leq
            | f32_geq
            | f32_eq
            | f32_neq
            | bool_not
            | bool_and
            | bool_or
            | bool_nand
            | bool_nor
            | bool_xor
            | as_i32
            | as_f32
            | as_bool
            | as_string
            | list_new
            | list_len
            | list_get
            | list_insert
            | list_remove
            | list_replace
            | string_concat
            | string_split
            | string_format
            | struct_new
            | struct_get
            | struct_set
    )
}

fn is_io_opcode(opcode: Opcode) -> bool {
    matches!(
        opcode,
        Opcode::print | Opcode::printf | Opcode::println | Opcode::read
    )
}

/// runs `instructions` against `machine` from instruction `0` until
/// `HALT`, the end of the instruction vector, cancellation through
/// `token`, or a [`VmError`].
pub fn execute(
    machine: &mut Machine,
    instructions: &[Instruction],
    token: &CancellationToken,
    stdout: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<StopReason, VmError> {
    let mut ip: usize = 0;

    loop {
        if token.is_cancelled() {
            return Ok(StopReason::Cancelled);
        }
        let Some(instr) = instructions.get(ip) else {
            return Ok(StopReason::Halted);
        };

        if is_value_opcode(instr.opcode) {
            value::apply(instr.opcode, instr, &mut machine.stack)?;
            ip += 1;
        } else if is_io_opcode(instr.opcode) {
            io::apply(instr.opcode, &mut machine.stack, stdout, stdin)?;
            ip += 1;
        } else {
            match control::apply(instr.opcode, instr, machine, ip)? {
                control::Step::Continue => ip += 1,
                control::Step::Jump(addr) => ip = addr,
                control::Step::Halt => return Ok(StopReason::Halted),
            }
        }
    }
}
