// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! shared scenario builders and driver for the `src/bin/scenario_*`
//! binaries: each one hand-assembles a single end-to-end scenario and
//! runs it through the dispatch loop. There is no source-language
//! compiler here and no persisted bytecode format: a real caller builds
//! an instruction vector with `cvm_asm::InstructionBuilder` the same way
//! these demos do, and feeds it straight to `cvm_vm::execute`.

use std::io::{self, Write};

use cvm_asm::InstructionBuilder;
use cvm_codec::Instruction;
use cvm_machine::Machine;
use cvm_types::Tag;
use cvm_vm::{trace, CancellationToken};

pub fn scenario_a() -> Vec<Instruction> {
    InstructionBuilder::new()
        .append_i32_load(10)
        .append_i32_load(20)
        .append_i32_add()
        .append_halt()
        .finish()
}

pub fn scenario_b() -> Vec<Instruction> {
    InstructionBuilder::new()
        .append_i32_load(20)
        .append_i32_load(10)
        .append_i32_lt()
        .append_halt()
        .finish()
}

pub fn scenario_c() -> Vec<Instruction> {
    InstructionBuilder::new()
        .append_list_new(Tag::i32)
        .append_i32_load(0)
        .append_i32_load(7)
        .append_list_insert()
        .append_i32_load(0)
        .append_i32_load(5)
        .append_list_insert()
        .append_i32_load(0)
        .append_list_get()
        .append_halt()
        .finish()
}

/// a recursive Fibonacci driven by `FUNC_CALL`/`FUNC_RET` and a
/// tail-recursion-shaped `BLOCK_START`/`BLOCK_END`.
pub fn scenario_d() -> Vec<Instruction> {
    let mut b = InstructionBuilder::new();
    b.append_i32_load(20); // 0
    b.append_func_call(4, 1); // 1
    b.append_new(); // 2
    b.append_halt(); // 3

    b.append_new(); // 4: local 0 = n
    b.append_block_start(13); // 5
    b.append_local_load(0); // 6
    b.append_i32_load(2); // 7
    b.append_i32_lt(); // 8
    b.append_jumpnc(13); // 9
    b.append_local_load(0); // 10
    b.append_func_ret(1); // 11: base case, n < 2
    b.append_block_br(); // 12
    b.append_block_end(); // 13
    b.append_local_load(0); // 14
    b.append_i32_load(1); // 15
    b.append_i32_sub(); // 16
    b.append_func_call(4, 1); // 17: fib(n - 1)
    b.append_local_load(0); // 18
    b.append_i32_load(2); // 19
    b.append_i32_sub(); // 20
    b.append_func_call(4, 1); // 21: fib(n - 2)
    b.append_i32_add(); // 22
    b.append_func_ret(1); // 23
    b.finish()
}

pub fn scenario_e() -> Vec<Instruction> {
    InstructionBuilder::new()
        .append_string_load("%.+%.=%.\n")
        .append_i32_load(12)
        .append_i32_load(20)
        .append_i32_load(32)
        .append_i32_load(3)
        .append_printf()
        .append_halt()
        .finish()
}

pub fn scenario_f() -> Vec<Instruction> {
    InstructionBuilder::new()
        .append_struct_new(&[Tag::i32, Tag::string])
        .append_i32_load(1)
        .append_struct_get()
        .append_halt()
        .finish()
}

/// runs `instructions` to completion against a fresh [`Machine`], printing
/// the stop reason and a final [`trace`] of machine state to stdout.
pub fn run_scenario(name: &str, instructions: &[Instruction]) {
    let mut machine = Machine::default();
    let token = CancellationToken::new();
    let stdout = io::stdout();
    let stdin = io::stdin();
    let mut out = stdout.lock();
    let mut input = stdin.lock();

    println!("--- scenario {} ---", name);
    match cvm_vm::execute(&mut machine, instructions, &token, &mut out, &mut input) {
        Ok(reason) => {
            out.flush().ok();
            println!("stopped: {:?}", reason);
            println!("{}", trace(&machine));
        }
        Err(err) => eprintln!("scenario {} failed: {}", name, err),
    }
}
