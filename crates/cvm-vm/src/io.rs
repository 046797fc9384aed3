// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! `PRINT`/`PRINTF`/`PRINTLN`/`READ`: standard output and
//! input, routed through trait objects so tests can swap in buffers.

use std::io::{BufRead, Write};

use cvm_codec::Value;
use cvm_machine::Stack;
use cvm_ops::string;
use cvm_types::{Opcode, VmError};

fn write_str(stdout: &mut dyn Write, s: &str) -> Result<(), VmError> {
    stdout
        .write_all(s.as_bytes())
        .map_err(|e| VmError::Domain(format!("write to stdout failed: {}", e)))
}

pub(crate) fn apply(
    opcode: Opcode,
    stack: &mut Stack,
    stdout: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), VmError> {
    match opcode {
        Opcode::print => {
            let v = stack.pop()?;
            let text = string::format(&Value::from_string("%."), &[v])?;
            write_str(stdout, text.as_str()?)
        }
        Opcode::println => {
            let v = stack.pop()?;
            let text = string::format(&Value::from_string("%.\n"), &[v])?;
            write_str(stdout, text.as_str()?)
        }
        Opcode::printf => {
            let (template, args) = crate::value::pop_format_args(stack)?;
            let text = string::format(&template, &args)?;
            write_str(stdout, text.as_str()?)
        }
        Opcode::read => {
            let mut line = String::new();
            stdin
                .read_line(&mut line)
                .map_err(|e| VmError::Domain(format!("read from stdin failed: {}", e)))?;
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            stack.push(Value::from_string(&line))
        }
        other => unreachable!("{:?} is not an I/O opcode", other),
    }
}
