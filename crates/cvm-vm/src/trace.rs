// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use std::fmt::Write as _;

use cvm_machine::Machine;

/// a human-readable dump of the final machine state: heap slots, frame
/// stack, and operand stack, bottom to top. The section prefixes
/// (including the `StackFrace` misspelling) are load-bearing — callers
/// match on them, so they are not "typos" to tidy up.
pub fn trace(machine: &Machine) -> String {
    let mut out = String::new();

    writeln!(out, "=== Heap:").unwrap();
    for (index, value) in machine.heap.slots().iter().enumerate() {
        writeln!(
            out,
            "[{}] {}",
            index,
            value.format().unwrap_or_else(|e| format!("<{}>", e))
        )
        .unwrap();
    }

    writeln!(out, "=== StackFrace:").unwrap();
    for (depth, frame) in machine.frames.iter().enumerate() {
        writeln!(
            out,
            "[{}] sp={} hp={} returnIP={} {}",
            depth,
            frame.sp,
            frame.hp,
            frame.return_ip,
            match frame.heap_offset {
                Some(offset) => format!("call(heapOffset={})", offset),
                None => "block".to_string(),
            }
        )
        .unwrap();
    }

    writeln!(out, "=== Stack:").unwrap();
    for (depth, value) in machine.stack.iter().enumerate() {
        writeln!(
            out,
            "[{}] {}",
            depth,
            value.format().unwrap_or_else(|e| format!("<{}>", e))
        )
        .unwrap();
    }

    out
}
