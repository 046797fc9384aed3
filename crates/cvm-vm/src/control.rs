// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

//! dispatch for the control, block, call, and heap opcode groups —
//! everything that touches the instruction pointer or the frame stack
//! rather than just the operand stack.

use cvm_codec::Instruction;
use cvm_machine::{Frame, Machine};
use cvm_types::{Opcode, VmError};

pub(crate) enum Step {
    Continue,
    Jump(usize),
    Halt,
}

fn addr_operand(instr: &Instruction) -> Result<usize, VmError> {
    let addr = instr.operand_as_i32()?;
    usize::try_from(addr).map_err(|_| VmError::Domain(format!("negative address {}", addr)))
}

pub(crate) fn apply(opcode: Opcode, instr: &Instruction, machine: &mut Machine, ip: usize) -> Result<Step, VmError> {
    use Opcode::*;
    match opcode {
        null => Ok(Step::Continue),
        halt => Ok(Step::Halt),
        jump => Ok(Step::Jump(addr_operand(instr)?)),
        jumpc => {
            let cond = machine.stack.pop()?.as_bool_raw()?;
            if cond {
                Ok(Step::Jump(addr_operand(instr)?))
            } else {
                Ok(Step::Continue)
            }
        }
        jumpnc => {
            let cond = machine.stack.pop()?.as_bool_raw()?;
            if !cond {
                Ok(Step::Jump(addr_operand(instr)?))
            } else {
                Ok(Step::Continue)
            }
        }

        block_start => {
            let ret_addr = addr_operand(instr)?;
            let frame = Frame::block(machine.stack.len(), machine.heap.hp(), ret_addr);
            machine.frames.push(frame)?;
            Ok(Step::Continue)
        }
        block_end => {
            machine.frames.pop()?;
            Ok(Step::Continue)
        }
        block_br => {
            let frame = machine
                .frames
                .last_frame()
                .ok_or_else(|| VmError::OutOfBounds("BLOCK_BR with no open block".to_string()))?;
            Ok(Step::Jump(frame.return_ip))
        }
        block_load => {
            let i = addr_operand(instr)?;
            let base = machine
                .frames
                .last_frame()
                .ok_or_else(|| VmError::OutOfBounds("BLOCK_LOAD with no open frame".to_string()))?
                .hp;
            let value = machine.heap.load(base + i)?;
            machine.stack.push(value)?;
            Ok(Step::Continue)
        }
        block_save => {
            let i = addr_operand(instr)?;
            let base = machine
                .frames
                .last_frame()
                .ok_or_else(|| VmError::OutOfBounds("BLOCK_SAVE with no open frame".to_string()))?
                .hp;
            let value = machine.stack.pop()?;
            machine.heap.save(base + i, value)?;
            Ok(Step::Continue)
        }

        func_call => {
            let (addr, arg_count) = instr.operand_as_two_i32()?;
            let addr = usize::try_from(addr)
                .map_err(|_| VmError::Domain(format!("negative address {}", addr)))?;
            let arg_count = usize::try_from(arg_count)
                .map_err(|_| VmError::Domain(format!("negative arg count {}", arg_count)))?;
            let sp = machine.stack.len().checked_sub(arg_count).ok_or_else(|| {
                VmError::OutOfBounds(format!(
                    "FUNC_CALL needs {} args, stack only has {}",
                    arg_count,
                    machine.stack.len()
                ))
            })?;
            let hp = machine.heap.hp();
            let frame = Frame::call(sp, hp, ip + 1, hp);
            machine.frames.push(frame)?;
            Ok(Step::Jump(addr))
        }
        func_ret => {
            let ret_count = addr_operand(instr)?;
            // a return can happen from inside still-open blocks (e.g. a
            // base-case return before the enclosing block's BLOCK_END
            // runs); discard those block frames on the way to the
            // nearest call frame, whose snapshot already covers them.
            let mut frame = machine.frames.pop()?;
            while !frame.is_call_frame() {
                frame = machine.frames.pop()?;
            }
            let mut results = Vec::with_capacity(ret_count);
            for _ in 0..ret_count {
                results.push(machine.stack.pop()?);
            }
            machine.stack.truncate(frame.sp);
            machine.heap.truncate(frame.hp);
            for value in results.into_iter().rev() {
                machine.stack.push(value)?;
            }
            Ok(Step::Jump(frame.return_ip))
        }
        local_load => {
            let i = addr_operand(instr)?;
            let base = machine
                .frames
                .last_func_frame()
                .ok_or_else(|| VmError::OutOfBounds("LOCAL_LOAD outside a function".to_string()))?
                .heap_offset
                .expect("last_func_frame always returns a call frame");
            let value = machine.heap.load(base + i)?;
            machine.stack.push(value)?;
            Ok(Step::Continue)
        }
        local_save => {
            let i = addr_operand(instr)?;
            let base = machine
                .frames
                .last_func_frame()
                .ok_or_else(|| VmError::OutOfBounds("LOCAL_SAVE outside a function".to_string()))?
                .heap_offset
                .expect("last_func_frame always returns a call frame");
            let value = machine.stack.pop()?;
            machine.heap.save(base + i, value)?;
            Ok(Step::Continue)
        }

        new => {
            let value = machine.stack.pop()?;
            machine.heap.new_slot(value)?;
            Ok(Step::Continue)
        }
        pop => {
            machine.stack.pop()?;
            Ok(Step::Continue)
        }
        free => {
            let i = addr_operand(instr)?;
            machine.heap.free(i)?;
            Ok(Step::Continue)
        }
        load => {
            let i = addr_operand(instr)?;
            let value = machine.heap.load(i)?;
            machine.stack.push(value)?;
            Ok(Step::Continue)
        }
        save => {
            let i = addr_operand(instr)?;
            let value = machine.stack.pop()?;
            machine.heap.save(i, value)?;
            Ok(Step::Continue)
        }

        i32_load | bool_load | f32_load | string_load => {
            let value = instr.operand_as_value()?;
            machine.stack.push(value)?;
            Ok(Step::Continue)
        }

        other => unreachable!("{:?} is handled by the value/io dispatchers", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cvm_codec::instruction::{encode_i32_operand, encode_two_i32_operands};
    use cvm_codec::Value;
    use pretty_assertions::assert_eq;

    fn machine() -> Machine {
        Machine::new(64, 64, 16)
    }

    #[test]
    fn jumpc_branches_only_when_the_condition_is_true() {
        let mut m = machine();
        m.stack.push(Value::from_bool(true)).unwrap();
        let instr = Instruction::new(Opcode::jumpc, encode_i32_operand(5));
        match apply(Opcode::jumpc, &instr, &mut m, 0).unwrap() {
            Step::Jump(addr) => assert_eq!(addr, 5),
            _ => panic!("expected a jump"),
        }
    }

    #[test]
    fn func_call_then_func_ret_restores_stack_and_heap_and_returns_results() {
        let mut m = machine();
        m.stack.push(Value::from_i32(99)).unwrap(); // pre-existing operand
        let call_instr = Instruction::new(Opcode::func_call, encode_two_i32_operands(10, 0));
        let step = apply(Opcode::func_call, &call_instr, &mut m, 3).unwrap();
        match step {
            Step::Jump(addr) => assert_eq!(addr, 10),
            _ => panic!("expected a jump to the callee"),
        }
        assert_eq!(m.frames.len(), 1);

        // the callee allocates one local and leaves one result on the stack
        m.heap.new_slot(Value::from_i32(1)).unwrap();
        m.stack.push(Value::from_i32(42)).unwrap();

        let ret_instr = Instruction::new(Opcode::func_ret, encode_i32_operand(1));
        let step = apply(Opcode::func_ret, &ret_instr, &mut m, 20).unwrap();
        match step {
            Step::Jump(addr) => assert_eq!(addr, 4), // return_ip was call_ip + 1
            _ => panic!("expected a jump back to the caller"),
        }
        assert_eq!(m.frames.len(), 0);
        assert_eq!(m.heap.hp(), 0);
        assert_eq!(m.stack.len(), 2); // the pre-existing operand plus the one result
        assert_eq!(m.stack.pop().unwrap().as_i32().unwrap(), 42);
        assert_eq!(m.stack.pop().unwrap().as_i32().unwrap(), 99);
    }

    #[test]
    fn func_call_stack_offset_is_sp_minus_arg_count_not_raw_sp() {
        let mut m = machine();
        m.stack.push(Value::from_i32(55)).unwrap(); // caller's own base operand
        m.stack.push(Value::from_i32(1)).unwrap(); // arg 1
        m.stack.push(Value::from_i32(2)).unwrap(); // arg 2

        let call_instr = Instruction::new(Opcode::func_call, encode_two_i32_operands(10, 2));
        apply(Opcode::func_call, &call_instr, &mut m, 3).unwrap();
        assert_eq!(
            m.frames.last_frame().unwrap().sp,
            1,
            "frame.sp must be SP - argCount (3 - 2), not the raw SP (3)"
        );

        // the callee leaves both args untouched and pushes one more result,
        // so FUNC_RET must discard the stale args on unwind
        m.stack.push(Value::from_i32(42)).unwrap();
        let ret_instr = Instruction::new(Opcode::func_ret, encode_i32_operand(1));
        apply(Opcode::func_ret, &ret_instr, &mut m, 20).unwrap();

        assert_eq!(m.stack.len(), 2); // the caller's base operand plus the one result
        assert_eq!(m.stack.pop().unwrap().as_i32().unwrap(), 42);
        assert_eq!(m.stack.pop().unwrap().as_i32().unwrap(), 55);
    }

    #[test]
    fn local_load_addresses_the_nearest_call_frame_through_block_frames() {
        let mut m = machine();
        let call_instr = Instruction::new(Opcode::func_call, encode_two_i32_operands(0, 0));
        apply(Opcode::func_call, &call_instr, &mut m, 0).unwrap();
        m.heap.new_slot(Value::from_i32(7)).unwrap(); // local 0

        let block_instr = Instruction::new(Opcode::block_start, encode_i32_operand(99));
        apply(Opcode::block_start, &block_instr, &mut m, 1).unwrap();

        let load_instr = Instruction::new(Opcode::local_load, encode_i32_operand(0));
        apply(Opcode::local_load, &load_instr, &mut m, 2).unwrap();
        assert_eq!(m.stack.pop().unwrap().as_i32().unwrap(), 7);
    }

    #[test]
    fn block_br_jumps_to_the_frames_return_address_without_popping() {
        let mut m = machine();
        let block_instr = Instruction::new(Opcode::block_start, encode_i32_operand(42));
        apply(Opcode::block_start, &block_instr, &mut m, 0).unwrap();
        let step = apply(Opcode::block_br, &Instruction::new(Opcode::block_br, vec![]), &mut m, 1)
            .unwrap();
        match step {
            Step::Jump(addr) => assert_eq!(addr, 42),
            _ => panic!("expected a jump"),
        }
        assert_eq!(m.frames.len(), 1); // block_end, not block_br, pops the frame
    }
}
