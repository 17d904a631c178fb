//! Arithmetic handlers
//!
//! Operands are popped top first: for a binary opcode `a` is the element
//! that was on top and `b` the one beneath it.

use tracing::trace;

use crate::bytecode::instruction::Instruction;
use crate::bytecode::opcode::Opcode;
use crate::error::ScriptFailure;

use super::stack::Stack;

fn flag(b: bool) -> i64 {
    b as i64
}

/// Pop one number, push one number
pub fn unary(op: Opcode, stack: &mut Stack) -> Result<String, ScriptFailure> {
    let x = stack.pop_number(op)?;

    let result = match op {
        Opcode::Op1Add => x.checked_add(1),
        Opcode::Op1Sub => x.checked_sub(1),
        Opcode::Negate => x.checked_neg(),
        Opcode::Abs => x.checked_abs(),
        Opcode::Not => Some(flag(x == 0)),
        Opcode::Op0NotEqual => Some(flag(x != 0)),
        _ => unreachable!("{} is not a unary arithmetic opcode", op),
    }
    .ok_or(ScriptFailure::NumericOverflow { opcode: op })?;

    trace!(%op, x, result, "unary");
    stack.push(Instruction::int(result));
    Ok(format!(
        "Performed {} on <{}>; Pushed <{}> to stack",
        op.operation(),
        x,
        result
    ))
}

/// Pop two numbers, push one number
pub fn binary(op: Opcode, stack: &mut Stack) -> Result<String, ScriptFailure> {
    let a = stack.pop_number(op)?;
    let b = stack.pop_number(op)?;
    let performed = format!("Performed {} on <{}> and <{}>", op.operation(), a, b);

    let result = match op {
        Opcode::Add => a.checked_add(b),
        Opcode::Sub => a.checked_sub(b),
        Opcode::BoolAnd => Some(flag(a != 0 && b != 0)),
        Opcode::BoolOr => Some(flag(a != 0 || b != 0)),
        Opcode::NumEqual | Opcode::NumEqualVerify => Some(flag(a == b)),
        Opcode::NumNotEqual => Some(flag(a != b)),
        Opcode::LessThan => Some(flag(a < b)),
        Opcode::GreaterThan => Some(flag(a > b)),
        Opcode::LessThanOrEqual => Some(flag(a <= b)),
        Opcode::GreaterThanOrEqual => Some(flag(a >= b)),
        Opcode::Min => Some(a.min(b)),
        Opcode::Max => Some(a.max(b)),
        _ => unreachable!("{} is not a binary arithmetic opcode", op),
    }
    .ok_or(ScriptFailure::NumericOverflow { opcode: op })?;

    trace!(%op, a, b, result, "binary");

    if op == Opcode::NumEqualVerify {
        if result == 0 {
            return Err(ScriptFailure::VerifyFailed { detail: performed });
        }
        stack.push(Instruction::int(result));
        return Ok(format!("{}; Verify passed; Pushed <{}> to stack", performed, result));
    }

    stack.push(Instruction::int(result));
    Ok(format!("{}; Pushed <{}> to stack", performed, result))
}

/// Pop `hi`, `lo`, `x`; push whether `lo <= x < hi`
pub fn within(op: Opcode, stack: &mut Stack) -> Result<String, ScriptFailure> {
    let hi = stack.pop_number(op)?;
    let lo = stack.pop_number(op)?;
    let x = stack.pop_number(op)?;

    if lo <= x && x < hi {
        stack.push(Instruction::int(1));
        Ok(format!("<{}> is within range [{}, {}); Pushed <1> to stack", x, lo, hi))
    } else {
        stack.push(Instruction::int(0));
        Ok(format!("<{}> is NOT within range [{}, {}); Pushed <0> to stack", x, lo, hi))
    }
}
