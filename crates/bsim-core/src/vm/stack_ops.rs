//! Stack manipulation handlers
//!
//! Positions count from the top (0 = top). The interpreter has already
//! checked each opcode's declared depth, except for the element PICK and
//! ROLL address, which depends on the popped index.

use crate::bytecode::instruction::Instruction;
use crate::bytecode::opcode::Opcode;
use crate::error::ScriptFailure;

use super::stack::Stack;

pub fn execute(op: Opcode, stack: &mut Stack) -> Result<String, ScriptFailure> {
    let performed = format!("Performed {}; ", op.operation());

    let detail = match op {
        Opcode::Depth => {
            let depth = stack.len() as i64;
            stack.push(Instruction::int(depth));
            format!("Pushed <{}> to stack", depth)
        }
        Opcode::Dup => {
            let first = stack.operand_at(0, op)?;
            stack.push(first.clone());
            format!("Duplicated <{}>, and pushed it to stack", first)
        }
        Opcode::Drop => {
            let first = stack.pop_operand(op)?;
            format!("Popped <{}> from stack", first)
        }
        Opcode::Op2Drop => {
            let first = stack.pop_operand(op)?;
            let second = stack.pop_operand(op)?;
            format!("Popped <{}> and <{}> from stack", first, second)
        }
        Opcode::Op2Dup => {
            let first = stack.operand_at(0, op)?;
            let second = stack.operand_at(1, op)?;
            stack.push(second.clone());
            stack.push(first.clone());
            format!("Duplicated <{}> and <{}> and pushed them to stack", first, second)
        }
        Opcode::Op3Dup => {
            let first = stack.operand_at(0, op)?;
            let second = stack.operand_at(1, op)?;
            let third = stack.operand_at(2, op)?;
            stack.push(third.clone());
            stack.push(second.clone());
            stack.push(first.clone());
            format!(
                "Duplicated <{}>, <{}>, <{}>, and pushed them to stack",
                first, second, third
            )
        }
        Opcode::Op2Over => {
            let third = stack.operand_at(2, op)?;
            let fourth = stack.operand_at(3, op)?;
            stack.push(fourth.clone());
            stack.push(third.clone());
            format!("Duplicated <{}> and <{}> and pushed them to stack", third, fourth)
        }
        Opcode::Op2Rot => {
            let fifth = stack.remove(4).ok_or(ScriptFailure::StackUnderflow(op))?;
            let sixth = stack.remove(4).ok_or(ScriptFailure::StackUnderflow(op))?;
            stack.push(sixth.clone());
            stack.push(fifth.clone());
            format!("Moved <{}> and <{}> to top of stack", fifth, sixth)
        }
        Opcode::Op2Swap => {
            let first = stack.operand_at(0, op)?;
            let second = stack.operand_at(1, op)?;
            let third = stack.operand_at(2, op)?;
            let fourth = stack.operand_at(3, op)?;
            stack.swap(0, 2);
            stack.swap(1, 3);
            format!(
                "Swapped <{}> and <{}> with <{}> and <{}>",
                first, second, third, fourth
            )
        }
        Opcode::IfDup => {
            let top = stack.operand_at(0, op)?;
            if top.is_truthy() {
                stack.push(top.clone());
                format!("<{}> is true; Duplicated <{}>, and pushed it to stack", top, top)
            } else {
                format!("<{}> is false; Stack is left the same", top)
            }
        }
        Opcode::Nip => {
            let second = stack.remove(1).ok_or(ScriptFailure::StackUnderflow(op))?;
            format!("Popped <{}> from stack", second)
        }
        Opcode::Over => {
            let second = stack.operand_at(1, op)?;
            stack.push(second.clone());
            format!("Duplicated <{}>, and pushed it to stack", second)
        }
        Opcode::Pick | Opcode::Roll => {
            let n = stack.pop_number(op)?;
            let depth = match usize::try_from(n) {
                Ok(depth) if depth < stack.len() => depth,
                _ => {
                    return Err(ScriptFailure::IndexOutOfBounds {
                        operation: op.operation(),
                        index: n,
                        size: stack.len(),
                    })
                }
            };

            let moved = if op == Opcode::Roll {
                stack.remove(depth).ok_or(ScriptFailure::StackUnderflow(op))?
            } else {
                stack.operand_at(depth, op)?
            };
            let action = if op == Opcode::Roll { "Popped" } else { "Duplicated" };
            stack.push(moved.clone());
            format!(
                "{} element at position {}; Pushed <{}> to stack",
                action, depth, moved
            )
        }
        Opcode::Rot => {
            let third = stack.remove(2).ok_or(ScriptFailure::StackUnderflow(op))?;
            stack.push(third.clone());
            format!("Moved <{}> to top of stack", third)
        }
        Opcode::Swap => {
            let first = stack.operand_at(0, op)?;
            let second = stack.operand_at(1, op)?;
            stack.swap(0, 1);
            format!("Swapped <{}> and <{}>", first, second)
        }
        Opcode::Tuck => {
            let top = stack.operand_at(0, op)?;
            if !stack.insert(2, top.clone()) {
                return Err(ScriptFailure::StackUnderflow(op));
            }
            format!("Duplicated <{}> and inserted it after the second element", top)
        }
        _ => unreachable!("{} is not a stack manipulation opcode", op),
    };

    Ok(performed + &detail)
}
